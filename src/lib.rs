// ==========================================
// 周排班推荐引擎 - 核心库
// ==========================================
// 职责: 周岗位分配推荐 / 草案评估 / 告警 / 公平性评分
// 系统定位: 决策支持系统 (人工最终控制权)
// 红线: 纯计算, 不做存储与传输
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ko");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 推荐与评分规则
pub mod engine;

// 配置层 - 引擎参数
pub mod config;

// 应用快照 - CLI 输入
pub mod snapshot;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    InsightCategory, InsightType, Part, QualityLevel, Role, WarningLevel,
};

// 领域实体
pub use domain::{
    CandidateScore, DomainError, Draft, DraftEvaluation, DraftSlotScore, FairnessReport, History,
    Member, Plan, RoleSlot, SlotRecommendation, Warning, WeekRecord,
};

// 引擎
pub use engine::{
    AssignmentAdvisor, CandidateScorer, DraftEvaluator, FairnessScorer, PlanGenerator,
    StatsAggregator, WarningGenerator,
};

// 配置
pub use config::{ConfigError, ConfigManager, EngineConfig};

// 快照
pub use snapshot::{AppSnapshot, SnapshotError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "주간 역할 배정 추천 엔진";
