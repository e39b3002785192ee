// ==========================================
// 周排班推荐引擎 - 草案实时评估
// ==========================================
// 职责: 对照每个槽位的最高可达分, 给已编辑草案打分
// 输入: 历史 + 名册 + 草案 + 请假名单
// 输出: DraftEvaluation（0-100 总分 + 等级 + 逐槽反馈）
// 说明: 不做硬互斥, 不做连续排除; 当日重复只按已评估槽位累计
// ==========================================

use crate::config::{EvaluatorConfig, ScoringWeights};
use crate::domain::evaluation::{DraftEvaluation, DraftSlotScore};
use crate::domain::member::Member;
use crate::domain::slot::{SLOT_ORDER, TOTAL_SLOTS};
use crate::domain::types::{QualityLevel, Role};
use crate::domain::week::{Draft, History};
use crate::engine::scoring::{round_half_up, CandidateScorer};
use crate::engine::stats::StatsAggregator;
use crate::i18n;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

// ==========================================
// DraftEvaluator - 草案评估器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DraftEvaluator {
    scorer: CandidateScorer,
    config: EvaluatorConfig,
    aggregator: StatsAggregator,
}

impl DraftEvaluator {
    pub fn new(weights: ScoringWeights, config: EvaluatorConfig) -> Self {
        Self {
            scorer: CandidateScorer::new(weights),
            config,
            aggregator: StatsAggregator::new(),
        }
    }

    /// 评估草案
    ///
    /// 逐槽（固定顺序）:
    /// 1) 可选候选人排名 → 最高可达分 + 最优人选
    /// 2) 已填: 以前序槽位为当日集合给分配人打分
    /// 3) 与最优人选相同或分差 <= 容差 → 视为最优
    ///
    /// 总分 = round(Σ max(0, 槽位分) / Σ 最高可达分 × 100)
    #[instrument(skip_all, fields(weeks = history.len(), roster = roster.len()))]
    pub fn evaluate(
        &self,
        history: &History,
        roster: &[Member],
        draft: &Draft,
        absentees: &[String],
    ) -> DraftEvaluation {
        let stats = self.aggregator.aggregate(history, roster);
        if stats.active_members().is_empty() {
            return DraftEvaluation {
                overall_score: 0,
                level: QualityLevel::Poor,
                filled_slots: 0,
                total_slots: TOTAL_SLOTS,
                slot_scores: Vec::new(),
                summary: i18n::t("evaluation.summary.no_data"),
            };
        }

        let absent: HashSet<&str> = absentees.iter().map(|n| n.trim()).collect();
        let available: Vec<&String> = stats
            .active_members()
            .iter()
            .filter(|name| !absent.contains(name.as_str()))
            .collect();

        let mut assigned_today: HashSet<String> = HashSet::new();
        let mut slot_scores = Vec::with_capacity(TOTAL_SLOTS);
        let mut total_score: i64 = 0;
        let mut total_max: i64 = 0;
        let mut filled_slots = 0usize;

        for slot in SLOT_ORDER.iter() {
            let pool = available
                .iter()
                .copied()
                .filter(|name| slot.role != Role::Technical || stats.is_technical_qualified(name));
            let ranked = self.scorer.rank(pool, slot, &stats, &assigned_today);
            let optimal = ranked.first();
            let max_possible_score = optimal.map(|c| c.score).unwrap_or(0);
            total_max += max_possible_score as i64;

            let assigned = draft.name_at(slot);
            if assigned.is_empty() {
                slot_scores.push(DraftSlotScore {
                    slot: *slot,
                    assigned_name: None,
                    score: None,
                    max_possible_score,
                    optimal_name: optimal.map(|c| c.name.clone()),
                    is_optimal: false,
                    feedback: i18n::t("evaluation.feedback.unassigned"),
                });
                continue;
            }

            filled_slots += 1;
            let scored = self.scorer.score(assigned, slot, &stats, &assigned_today);
            assigned_today.insert(assigned.to_string());

            let diff = max_possible_score - scored.score;
            let is_optimal = optimal.map(|c| c.name == assigned).unwrap_or(false)
                || diff <= self.config.optimal_tolerance;

            let feedback = if is_optimal {
                i18n::t("evaluation.feedback.good")
            } else if scored.score < 0 {
                i18n::t("evaluation.feedback.not_recommended")
            } else {
                let name = optimal
                    .map(|c| c.display_name.clone())
                    .unwrap_or_else(|| "?".to_string());
                i18n::t_with_args(
                    "evaluation.feedback.suggest",
                    &[("name", &name), ("diff", &diff.to_string())],
                )
            };

            debug!(slot = %slot, name = assigned, score = scored.score, max = max_possible_score, is_optimal, "槽位评估");

            total_score += scored.score.max(0) as i64;
            slot_scores.push(DraftSlotScore {
                slot: *slot,
                assigned_name: Some(assigned.to_string()),
                score: Some(scored.score),
                max_possible_score,
                optimal_name: optimal.map(|c| c.name.clone()),
                is_optimal,
                feedback,
            });
        }

        let overall_score = if total_max > 0 {
            round_half_up(total_score as f64 / total_max as f64 * 100.0).clamp(0, 100) as u32
        } else {
            0
        };
        let level = QualityLevel::classify(overall_score, &self.config.levels);

        let mut evaluation = DraftEvaluation {
            overall_score,
            level,
            filled_slots,
            total_slots: TOTAL_SLOTS,
            slot_scores,
            summary: String::new(),
        };
        evaluation.summary = self.summarize(&evaluation);

        info!(score = overall_score, level = %level, filled = filled_slots, "草案评估完成");
        evaluation
    }

    fn summarize(&self, evaluation: &DraftEvaluation) -> String {
        let levels = &self.config.levels;
        if evaluation.filled_slots == 0 {
            i18n::t("evaluation.summary.start")
        } else if evaluation.overall_score >= levels.excellent {
            i18n::t_with_args(
                "evaluation.summary.optimal",
                &[
                    ("optimal", &evaluation.optimal_count().to_string()),
                    ("filled", &evaluation.filled_slots.to_string()),
                ],
            )
        } else if evaluation.overall_score >= levels.good {
            i18n::t("evaluation.summary.good")
        } else {
            let suboptimal = evaluation.suboptimal_count();
            if suboptimal > 0 {
                i18n::t_with_args(
                    "evaluation.summary.improvable",
                    &[("count", &suboptimal.to_string())],
                )
            } else {
                i18n::t("evaluation.summary.review")
            }
        }
    }
}
