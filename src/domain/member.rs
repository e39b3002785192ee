// ==========================================
// 周排班推荐引擎 - 成员名册
// ==========================================
// 身份即姓名, 无代理主键
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// 期数（仅用于展示/排序）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<u32>,
    /// 备注, 引擎不解读, 快照原样回写
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Member {
    pub fn new(name: &str, active: bool) -> Self {
        Self {
            name: name.trim().to_string(),
            active,
            generation: None,
            notes: None,
        }
    }

    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }

    /// 期数: 显式字段优先, 否则取名字前缀
    pub fn resolved_generation(&self) -> Option<u32> {
        self.generation.or_else(|| generation_prefix(&self.name))
    }
}

/// 拆分 "20 솔빈" → (期数文本, 显示名); 无合法前缀返回 None
fn split_generation(name: &str) -> Option<(&str, &str)> {
    let trimmed = name.trim();
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    let rest = &trimmed[digits..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let rest = rest.trim_start();
    if rest.is_empty() {
        None
    } else {
        Some((&trimmed[..digits], rest))
    }
}

/// 去掉名字前缀的期数, 例如 "20 솔빈" → "솔빈"
pub fn display_name(name: &str) -> String {
    match split_generation(name) {
        Some((_, rest)) => rest.to_string(),
        None => name.trim().to_string(),
    }
}

/// 名字前缀中的期数, 例如 "20 솔빈" → 20
pub fn generation_prefix(name: &str) -> Option<u32> {
    split_generation(name).and_then(|(digits, _)| digits.parse().ok())
}

/// 在岗成员按期数升序（展示顺序）
///
/// 无期数的成员排在最后; 同期保持名册顺序, 同名只保留首个
pub fn active_by_generation(roster: &[Member]) -> Vec<&Member> {
    let mut members: Vec<&Member> = Vec::new();
    for member in roster.iter().filter(|m| m.active) {
        let name = member.name.trim();
        if name.is_empty() || members.iter().any(|m| m.name.trim() == name) {
            continue;
        }
        members.push(member);
    }
    members.sort_by_key(|m| m.resolved_generation().unwrap_or(u32::MAX));
    members
}

/// 名册中的在岗成员姓名（保持名册顺序, 同名只保留首个）
pub fn active_member_names(roster: &[Member]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for member in roster.iter().filter(|m| m.active) {
        let name = member.name.trim();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}
