// ==========================================
// 周排班推荐引擎 - 配置层
// ==========================================
// 职责: 引擎参数定义与加载
// 存储: JSON 文件（可选）, 缺省时使用内置默认值
// ==========================================

pub mod config_manager;
pub mod engine_config;
pub mod error;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use engine_config::{
    EngineConfig, EvaluatorConfig, FairnessConfig, FairnessWeights, InsightThresholds,
    PlannerConfig, RoleDifficulty, RuleConfig, ScoringWeights, SUPPORTED_LOCALES,
};
pub use error::ConfigError;
