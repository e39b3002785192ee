// ==========================================
// 周排班推荐引擎 - 领域模型层
// ==========================================
// 职责: 定义成员、槽位、周记录、方案、告警、公平性报告
// 红线: 不含引擎逻辑, 不含任何 I/O
// ==========================================

pub mod error;
pub mod evaluation;
pub mod fairness;
pub mod member;
pub mod plan;
pub mod slot;
pub mod types;
pub mod warning;
pub mod week;

// 重导出核心类型
pub use error::DomainError;
pub use evaluation::{DraftEvaluation, DraftSlotScore};
pub use fairness::{FairnessBreakdown, FairnessInsight, FairnessReport, SubScore};
pub use member::{active_by_generation, active_member_names, display_name, generation_prefix, Member};
pub use plan::{CandidateScore, Plan, PlanSummary, SlotRecommendation};
pub use slot::{list_slots, RoleSlot, SLOT_ORDER, TOTAL_SLOTS};
pub use types::{
    InsightCategory, InsightType, LevelThresholds, Part, PerRole, QualityLevel, Role,
    WarningLevel,
};
pub use warning::{RotationCandidate, Warning, WarningTarget};
pub use week::{is_sunday, prior_weeks, Absence, Draft, DraftAnalysis, History, RoleAssignments, WeekRecord};
