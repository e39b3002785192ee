// ==========================================
// 周排班推荐引擎 - 引擎层
// ==========================================
// 职责: 统计聚合、候选打分、方案生成、草案评估、告警、公平性
// 红线: 引擎只读输入, 不做 I/O, 所有分数必须输出 reason
// ==========================================

pub mod evaluator;
pub mod fairness;
pub mod orchestrator;
pub mod planner;
pub mod scoring;
pub mod stats;
pub mod warnings;

// 重导出核心引擎
pub use evaluator::DraftEvaluator;
pub use fairness::{FairnessScorer, MemberFairness};
pub use orchestrator::AssignmentAdvisor;
pub use planner::PlanGenerator;
pub use scoring::{round_half_up, CandidateScorer};
pub use stats::{
    qualified_for_technical, AbsenceRank, AssignmentRank, HistoryStats, HistorySummary, MemberStats,
    RoleContribution, RoleShare, StatsAggregator,
};
pub use warnings::{detect_continuous, ContinuousHit, WarningGenerator};
