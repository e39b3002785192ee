// ==========================================
// 周排班推荐引擎 - 引擎参数
// ==========================================
// 职责: 评分权重 / 方案生成 / 草案评估 / 规则告警 / 公平性 参数集中定义
// 说明: 所有字段都有 serde 默认值, 部分 JSON 也能加载
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::types::{LevelThresholds, Role};
use serde::{Deserialize, Serialize};

// ==========================================
// ScoringWeights - 候选评分权重
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringWeights {
    pub base: f64,                    // 基础分
    pub recency_per_week: f64,        // 每间隔一周加分
    pub recency_cap: f64,             // 间隔加分上限
    pub never_held_weeks: u32,        // 从未担任/新成员视同间隔周数
    pub recency_reason_weeks: u32,    // 间隔 >= N 周才输出原因
    pub opportunity_multiplier: f64,  // 分配率差距系数
    pub opportunity_cap: f64,         // 分配率差距加分上限
    pub opportunity_reason_gap: f64,  // 差距 > 该值才输出原因
    pub diversity_bonus: f64,         // 岗位多样性满分
    pub consecutive_penalty: f64,     // 上周同岗扣分
    pub same_day_penalty: f64,        // 当日重复扣分
    pub technical_on_subtitle_penalty: f64, // SW 资格者排字幕
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 100.0,
            recency_per_week: 5.0,
            recency_cap: 30.0,
            never_held_weeks: 6,
            recency_reason_weeks: 3,
            opportunity_multiplier: 50.0,
            opportunity_cap: 25.0,
            opportunity_reason_gap: 0.1,
            diversity_bonus: 20.0,
            consecutive_penalty: 30.0,
            same_day_penalty: 15.0,
            technical_on_subtitle_penalty: 9999.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    pub alternatives_limit: usize,
    /// 连续担任同岗 >= N 周的成员被排除（排除后无人则放宽）
    pub streak_exclusion_threshold: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            alternatives_limit: 5,
            streak_exclusion_threshold: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvaluatorConfig {
    /// 与最优分差 <= 该值视为"最优"
    pub optimal_tolerance: i32,
    pub levels: LevelThresholds,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            optimal_tolerance: 30,
            levels: LevelThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleConfig {
    pub continuous_window: usize,
    pub rotation_window: usize,
    pub rotation_candidate_limit: usize,
    pub rotation_roles: Vec<Role>,
    pub side_shortage_check: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            continuous_window: 3,
            rotation_window: 12,
            rotation_candidate_limit: 8,
            rotation_roles: Role::ALL.to_vec(),
            side_shortage_check: true,
        }
    }
}

// ==========================================
// FairnessConfig - 公平性参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FairnessWeights {
    pub opportunity: f64,
    pub diversity: f64,
    pub workload: f64,
    pub consecutive: f64,
}

impl Default for FairnessWeights {
    fn default() -> Self {
        Self {
            opportunity: 0.4,
            diversity: 0.3,
            workload: 0.2,
            consecutive: 0.1,
        }
    }
}

impl FairnessWeights {
    pub fn sum(&self) -> f64 {
        self.opportunity + self.diversity + self.workload + self.consecutive
    }
}

/// 岗位难度权重（负荷均衡用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoleDifficulty {
    pub technical: f64,
    pub subtitle: f64,
    pub fixed_camera: f64,
    pub side: f64,
    pub sketch: f64,
}

impl Default for RoleDifficulty {
    fn default() -> Self {
        Self {
            technical: 1.5,
            subtitle: 1.2,
            fixed_camera: 1.0,
            side: 1.3,
            sketch: 0.8,
        }
    }
}

impl RoleDifficulty {
    pub fn weight(&self, role: Role) -> f64 {
        match role {
            Role::Technical => self.technical,
            Role::Subtitle => self.subtitle,
            Role::FixedCamera => self.fixed_camera,
            Role::Side => self.side,
            Role::Sketch => self.sketch,
        }
    }
}

/// 洞察阈值（比例相对于全员均值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsightThresholds {
    pub opportunity_low_ratio: f64,
    pub opportunity_high_ratio: f64,
    pub diversity_low_score: f64,
    pub workload_high_ratio: f64,
    pub workload_low_ratio: f64,
    pub positive_min_score: u32,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            opportunity_low_ratio: 0.7,
            opportunity_high_ratio: 1.3,
            diversity_low_score: 40.0,
            workload_high_ratio: 1.4,
            workload_low_ratio: 0.6,
            positive_min_score: 85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FairnessConfig {
    pub weights: FairnessWeights,
    pub opportunity_cv_multiplier: f64,
    pub workload_cv_multiplier: f64,
    pub consecutive_rate_multiplier: f64,
    pub both_parts_multiplier: f64,
    pub role_difficulty: RoleDifficulty,
    pub insights: InsightThresholds,
    pub levels: LevelThresholds,
}

impl Default for FairnessConfig {
    fn default() -> Self {
        Self {
            weights: FairnessWeights::default(),
            opportunity_cv_multiplier: 150.0,
            workload_cv_multiplier: 120.0,
            consecutive_rate_multiplier: 150.0,
            both_parts_multiplier: 1.3,
            role_difficulty: RoleDifficulty::default(),
            insights: InsightThresholds::default(),
            levels: LevelThresholds::default(),
        }
    }
}

// ==========================================
// EngineConfig - 全部参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub scoring: ScoringWeights,
    pub planner: PlannerConfig,
    pub evaluator: EvaluatorConfig,
    pub rules: RuleConfig,
    pub fairness: FairnessConfig,
    pub locale: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringWeights::default(),
            planner: PlannerConfig::default(),
            evaluator: EvaluatorConfig::default(),
            rules: RuleConfig::default(),
            fairness: FairnessConfig::default(),
            locale: "ko".to_string(),
        }
    }
}

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["ko", "en"];

impl EngineConfig {
    /// 参数校验
    ///
    /// # 返回
    /// - Err(Invalid): 窗口为 0 / 权重为负 / 公平性权重和不为 1 / 等级阈值非降序 / 语言不支持
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        let non_negative = [
            ("scoring.base", s.base),
            ("scoring.recencyPerWeek", s.recency_per_week),
            ("scoring.recencyCap", s.recency_cap),
            ("scoring.opportunityMultiplier", s.opportunity_multiplier),
            ("scoring.opportunityCap", s.opportunity_cap),
            ("scoring.diversityBonus", s.diversity_bonus),
            ("scoring.consecutivePenalty", s.consecutive_penalty),
            ("scoring.sameDayPenalty", s.same_day_penalty),
            ("scoring.technicalOnSubtitlePenalty", s.technical_on_subtitle_penalty),
            ("fairness.opportunityCvMultiplier", self.fairness.opportunity_cv_multiplier),
            ("fairness.workloadCvMultiplier", self.fairness.workload_cv_multiplier),
            ("fairness.consecutiveRateMultiplier", self.fairness.consecutive_rate_multiplier),
            ("fairness.bothPartsMultiplier", self.fairness.both_parts_multiplier),
            ("fairness.weights.opportunity", self.fairness.weights.opportunity),
            ("fairness.weights.diversity", self.fairness.weights.diversity),
            ("fairness.weights.workload", self.fairness.weights.workload),
            ("fairness.weights.consecutive", self.fairness.weights.consecutive),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{} 不能为负: {}", key, value)));
            }
        }

        let weight_sum = self.fairness.weights.sum();
        if (weight_sum - 1.0).abs() > 1e-3 {
            return Err(ConfigError::Invalid(format!(
                "公平性权重之和必须为 1, 实际为 {:.3}",
                weight_sum
            )));
        }

        for role in Role::ALL {
            let w = self.fairness.role_difficulty.weight(role);
            if !w.is_finite() || w <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "岗位难度权重必须为正: {}={}",
                    role, w
                )));
            }
        }

        if self.rules.continuous_window == 0 {
            return Err(ConfigError::Invalid("rules.continuousWindow 必须 >= 1".to_string()));
        }
        if self.rules.rotation_window == 0 {
            return Err(ConfigError::Invalid("rules.rotationWindow 必须 >= 1".to_string()));
        }
        if self.evaluator.optimal_tolerance < 0 {
            return Err(ConfigError::Invalid(
                "evaluator.optimalTolerance 不能为负".to_string(),
            ));
        }

        for (key, levels) in [
            ("evaluator.levels", &self.evaluator.levels),
            ("fairness.levels", &self.fairness.levels),
        ] {
            if !(levels.excellent >= levels.good && levels.good >= levels.fair) {
                return Err(ConfigError::Invalid(format!("{} 阈值必须降序", key)));
            }
        }

        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            return Err(ConfigError::Invalid(format!("不支持的语言: {}", self.locale)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.planner.alternatives_limit, 5);
        assert_eq!(config.rules.rotation_roles.len(), 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"rules": {"continuousWindow": 4}, "scoring": {"samedayPenalty": 1}}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rules.continuous_window, 4);
        assert_eq!(config.rules.rotation_window, 12);
        assert_eq!(config.scoring.same_day_penalty, 15.0);
        assert_eq!(config.locale, "ko");
    }

    #[test]
    fn test_validate_rejects_bad_weights() {
        let mut config = EngineConfig::default();
        config.fairness.weights.opportunity = 0.9;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.rules.continuous_window = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.locale = "zh-CN".to_string();
        assert!(config.validate().is_err());
    }
}
