// ==========================================
// 周排班推荐引擎 - 引擎编排器
// ==========================================
// 用途: 以同一份 EngineConfig 组装五个核心引擎, 向调用方提供统一入口
// 引擎: StatsAggregator / PlanGenerator / DraftEvaluator / WarningGenerator / FairnessScorer
// 红线: 引擎之间不共享可变状态, 每次调用独立重算
// ==========================================

use crate::config::{ConfigManager, EngineConfig};
use crate::domain::error::DomainError;
use crate::domain::evaluation::DraftEvaluation;
use crate::domain::fairness::FairnessReport;
use crate::domain::member::Member;
use crate::domain::plan::{CandidateScore, Plan};
use crate::domain::slot::RoleSlot;
use crate::domain::warning::Warning;
use crate::domain::week::{Draft, History};
use crate::engine::{
    AbsenceRank, AssignmentRank, DraftEvaluator, FairnessScorer, HistorySummary, PlanGenerator,
    RoleContribution, StatsAggregator, WarningGenerator,
};
use chrono::NaiveDate;
use tracing::info;

// ==========================================
// AssignmentAdvisor - 引擎编排器
// ==========================================

#[derive(Debug, Clone)]
pub struct AssignmentAdvisor {
    config: EngineConfig,
    aggregator: StatsAggregator,
    planner: PlanGenerator,
    evaluator: DraftEvaluator,
    warnings: WarningGenerator,
    fairness: FairnessScorer,
}

impl AssignmentAdvisor {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 已校验的引擎参数
    pub fn new(config: EngineConfig) -> Self {
        Self {
            aggregator: StatsAggregator::new(),
            planner: PlanGenerator::new(config.scoring.clone(), config.planner.clone()),
            evaluator: DraftEvaluator::new(config.scoring.clone(), config.evaluator.clone()),
            warnings: WarningGenerator::new(config.rules.clone()),
            fairness: FairnessScorer::new(config.fairness.clone(), config.rules.clone()),
            config,
        }
    }

    /// 从配置管理器创建
    pub fn from_manager(manager: &ConfigManager) -> Self {
        Self::new(manager.config().clone())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 生成整周推荐方案
    ///
    /// # 参数
    /// - absentees: 本周请假名单
    /// - prefilled: 已有草稿（只填空槽位）
    pub fn generate_plan(
        &self,
        history: &History,
        roster: &[Member],
        absentees: &[String],
        prefilled: Option<&Draft>,
    ) -> Plan {
        let plan = self.planner.generate(history, roster, absentees, prefilled);
        info!(
            filled = plan.summary.filled_count,
            warnings = plan.summary.warnings.len(),
            "推荐方案生成完成"
        );
        plan
    }

    /// 单槽位候选排名（交互式）
    pub fn rank_slot_candidates(
        &self,
        history: &History,
        roster: &[Member],
        slot: &RoleSlot,
        absentees: &[String],
        already_assigned: &[String],
    ) -> Result<Vec<CandidateScore>, DomainError> {
        self.planner
            .rank_slot_candidates(history, roster, slot, absentees, already_assigned)
    }

    /// 评估人工草稿
    pub fn evaluate_draft(
        &self,
        history: &History,
        roster: &[Member],
        draft: &Draft,
        absentees: &[String],
    ) -> DraftEvaluation {
        self.evaluator.evaluate(history, roster, draft, absentees)
    }

    /// 计算草稿告警（连续分配 / 侧机位不足 / 轮换提示）
    ///
    /// # 参数
    /// - date: 草稿所属周日（仅严格早于该日期的周参与比较）
    pub fn compute_warnings(
        &self,
        date: NaiveDate,
        draft: &Draft,
        history: &History,
        roster: &[Member],
    ) -> Vec<Warning> {
        self.warnings.compute(date, draft, history, roster)
    }

    /// 全量历史公平性报告
    pub fn fairness_report(&self, history: &History, roster: &[Member]) -> FairnessReport {
        self.fairness.report(history, roster)
    }

    /// 历史概况（总周数、在岗人数、总分配次数）
    pub fn history_summary(&self, history: &History, roster: &[Member]) -> HistorySummary {
        self.aggregator.summarize(history, roster)
    }

    /// 各岗位成员份额
    pub fn role_contributions(&self, history: &History, roster: &[Member]) -> Vec<RoleContribution> {
        self.aggregator.role_contributions(history, roster)
    }

    /// 缺勤率 TOP N
    pub fn absence_ranking(&self, history: &History, roster: &[Member], top_n: usize) -> Vec<AbsenceRank> {
        self.aggregator.absence_ranking(history, roster, top_n)
    }

    /// 分配次数 TOP N
    pub fn assignment_ranking(&self, history: &History, roster: &[Member], top_n: usize) -> Vec<AssignmentRank> {
        self.aggregator.assignment_ranking(history, roster, top_n)
    }

    /// 出勤但分配率最低的 TOP N
    pub fn underassigned_members(&self, history: &History, roster: &[Member], top_n: usize) -> Vec<AssignmentRank> {
        self.aggregator.underassigned_members(history, roster, top_n)
    }
}

impl Default for AssignmentAdvisor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Part, Role};
    use crate::domain::week::WeekRecord;

    fn members(names: &[&str]) -> Vec<Member> {
        names.iter().map(|n| Member::new(n, true)).collect()
    }

    #[test]
    fn test_facade_uses_configured_limits() {
        let mut config = EngineConfig::default();
        config.planner.alternatives_limit = 1;
        let advisor = AssignmentAdvisor::new(config);

        let mut week = WeekRecord::default();
        week.part_mut(Part::Part1).set(Role::Sketch, 0, "A");
        let mut history = History::new();
        history.insert(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(), week);

        let plan = advisor.generate_plan(&history, &members(&["A", "B", "C", "D"]), &[], None);
        assert!(plan.slots.iter().all(|s| s.alternatives.len() <= 1));
        assert_eq!(advisor.config().planner.alternatives_limit, 1);
    }

    #[test]
    fn test_empty_inputs_are_degenerate_not_errors() {
        let advisor = AssignmentAdvisor::default();
        let history = History::new();
        let roster = members(&["A"]);

        let plan = advisor.generate_plan(&history, &roster, &[], None);
        assert_eq!(plan.summary.filled_count, 0);

        let report = advisor.fairness_report(&history, &roster);
        assert_eq!(report.overall_score, 100);

        let summary = advisor.history_summary(&history, &roster);
        assert_eq!(summary.total_weeks, 0);
    }

    #[test]
    fn test_member_rankings_through_facade() {
        let advisor = AssignmentAdvisor::default();
        let mut week = WeekRecord::default();
        week.part_mut(Part::Part1).set(Role::Technical, 0, "20 A");
        week.part_mut(Part::Part2).set(Role::Technical, 0, "20 A");
        let mut history = History::new();
        history.insert(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(), week);
        let roster = members(&["B", "20 A"]);

        let contributions = advisor.role_contributions(&history, &roster);
        assert_eq!(contributions[0].role, Role::Technical);
        assert_eq!(contributions[0].total_count, 2);

        let top = advisor.assignment_ranking(&history, &roster, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].display_name, "A");
        assert_eq!(top[0].assignment_count, 2);

        let under = advisor.underassigned_members(&history, &roster, 3);
        assert_eq!(under[0].name, "B");

        assert_eq!(advisor.absence_ranking(&history, &roster, 3).len(), 2);
        assert!(advisor.absence_ranking(&History::new(), &roster, 3).is_empty());
    }

    #[test]
    fn test_facade_leaves_global_locale_alone() {
        let before = crate::i18n::current_locale();
        let mut config = EngineConfig::default();
        config.locale = "en".to_string();
        let advisor = AssignmentAdvisor::new(config);

        let roster = members(&["A"]);
        let plan = advisor.generate_plan(&History::new(), &roster, &[], None);
        advisor.fairness_report(&History::new(), &roster);

        assert!(!plan.summary.warnings.is_empty());
        assert_eq!(crate::i18n::current_locale(), before);
    }

    #[test]
    fn test_invalid_slot_is_rejected() {
        let advisor = AssignmentAdvisor::default();
        let slot = RoleSlot {
            part: Part::Part1,
            role: Role::Side,
            index: None,
        };
        let result = advisor.rank_slot_candidates(&History::new(), &members(&["A"]), &slot, &[], &[]);
        assert!(matches!(result, Err(DomainError::InvalidSlot { .. })));
    }
}
