// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持韩语（默认）和英语
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"ko" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use roster_engine::i18n::t;
/// let msg = t("reason.new_member");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use roster_engine::i18n::t_with_args;
/// let msg = t_with_args("reason.weeks_since_role", &[("weeks", "4"), ("role", "SW")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    fill_args(rust_i18n::t!(key).to_string(), args)
}

/// 按指定语言翻译（不改变全局语言）
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 按指定语言翻译（带参数）
pub fn t_with_args_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    fill_args(rust_i18n::t!(key, locale = locale).to_string(), args)
}

fn fill_args(mut result: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    // 全局 locale 在并行测试间共享, 这里只用显式语言的接口

    #[test]
    fn test_translate_simple() {
        assert_eq!(t_in("ko", "reason.new_member"), "신규 멤버");
        assert_eq!(t_in("en", "reason.new_member"), "New member");
        assert_eq!(t_in("ko", "role.subtitle"), "자막");
    }

    #[test]
    fn test_translate_with_args() {
        let msg = t_with_args_in("ko", "reason.weeks_since_role", &[("weeks", "4"), ("role", "SW")]);
        assert_eq!(msg, "4주 전 마지막 SW");

        let msg = t_with_args_in("en", "warning.weeks_ago", &[("weeks", "2")]);
        assert!(msg.contains('2'));
        assert!(!msg.contains("%{"));
    }

    #[test]
    fn test_every_key_exists_in_both_locales() {
        let keys = [
            "part.part1",
            "role.sw",
            "reason.technical_on_subtitle",
            "plan.no_candidate",
            "evaluation.feedback.good",
            "evaluation.summary.optimal",
            "warning.continuous",
            "warning.rotation",
            "fairness.no_data",
            "fairness.insight.streak",
            "fairness.insight.positive.consecutive",
        ];
        for key in keys {
            for locale in ["ko", "en"] {
                let msg = t_in(locale, key);
                assert_ne!(msg, key, "{} 缺少 {}", locale, key);
                assert!(!msg.ends_with(key), "{} 缺少 {}", locale, key);
            }
        }
    }
}
