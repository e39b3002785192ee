// ==========================================
// 周排班推荐引擎 - 整周方案生成
// ==========================================
// 职责: 按固定顺序贪心填满 12 个槽位
// 输入: 历史 + 名册 + 本周请假名单 + 可选草案（已填槽位保留）
// 输出: Plan（推荐人 + 最多 5 个备选 + 汇总告警）
// 红线: 一人一槽（硬互斥）, 单次遍历不回溯
// ==========================================

use crate::config::{PlannerConfig, ScoringWeights};
use crate::domain::error::DomainError;
use crate::domain::member::Member;
use crate::domain::plan::{CandidateScore, Plan, PlanSummary, SlotRecommendation};
use crate::domain::slot::{RoleSlot, SLOT_ORDER, TOTAL_SLOTS};
use crate::domain::types::Role;
use crate::domain::week::{Draft, History};
use crate::engine::scoring::CandidateScorer;
use crate::engine::stats::{HistoryStats, StatsAggregator};
use crate::i18n;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

// ==========================================
// PlanGenerator - 方案生成器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PlanGenerator {
    scorer: CandidateScorer,
    config: PlannerConfig,
    aggregator: StatsAggregator,
}

impl PlanGenerator {
    pub fn new(weights: ScoringWeights, config: PlannerConfig) -> Self {
        Self {
            scorer: CandidateScorer::new(weights),
            config,
            aggregator: StatsAggregator::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成整周方案
    ///
    /// 规则:
    /// 1) 候选 = 在岗 ∧ 未请假 ∧ 本周未占用; SW 需资格
    /// 2) 连续 >= 阈值周担任该岗位者排除（排除后无人则放宽）
    /// 3) 得分降序稳定排序, 首位推荐, 其后最多 5 位备选
    /// 4) 草案已填槽位保留原成员, 该成员提前计入互斥集合
    ///
    /// # 参数
    /// - history: 历史记录
    /// - roster: 名册
    /// - absentees: 本周请假名单
    /// - prefilled: 可选草案（只补空位）
    ///
    /// # 返回
    /// 12 个槽位的方案; 历史为空或无可用成员时退化为全空方案
    #[instrument(skip(self, history, roster, absentees, prefilled), fields(
        weeks = history.len(),
        roster = roster.len(),
        absentees = absentees.len()
    ))]
    pub fn generate(
        &self,
        history: &History,
        roster: &[Member],
        absentees: &[String],
        prefilled: Option<&Draft>,
    ) -> Plan {
        let stats = self.aggregator.aggregate(history, roster);
        let available = available_members(&stats, absentees);
        let degenerate = history.is_empty() || available.is_empty();
        if degenerate {
            warn!(
                weeks = history.len(),
                available = available.len(),
                "历史为空或无可用成员, 输出退化方案"
            );
        }

        // 草案已填成员提前占位
        let mut used: HashSet<String> = HashSet::new();
        if let Some(draft) = prefilled {
            for slot in SLOT_ORDER.iter() {
                let name = draft.name_at(slot);
                if !name.is_empty() {
                    used.insert(name.to_string());
                }
            }
        }

        let mut assigned_today: HashSet<String> = HashSet::new();
        let mut recommendations = Vec::with_capacity(TOTAL_SLOTS);
        let mut warnings = Vec::new();

        for slot in SLOT_ORDER.iter() {
            let fixed = prefilled.map(|d| d.name_at(slot)).unwrap_or("");

            if !fixed.is_empty() {
                let assigned = self.scorer.score(fixed, slot, &stats, &assigned_today);
                let alternatives = if degenerate {
                    Vec::new()
                } else {
                    let ranked = self.rank_open_slot(slot, &stats, &available, &used, &assigned_today);
                    ranked.into_iter().take(self.config.alternatives_limit).collect()
                };
                debug!(slot = %slot, name = fixed, score = assigned.score, "保留草案分配");
                assigned_today.insert(fixed.to_string());
                recommendations.push(SlotRecommendation {
                    slot: *slot,
                    recommended: Some(assigned),
                    alternatives,
                    prefilled: true,
                });
                continue;
            }

            let mut ranked = if degenerate {
                Vec::new()
            } else {
                self.rank_open_slot(slot, &stats, &available, &used, &assigned_today)
            };

            let recommended = if ranked.is_empty() {
                None
            } else {
                Some(ranked.remove(0))
            };
            ranked.truncate(self.config.alternatives_limit);

            match &recommended {
                Some(winner) => {
                    debug!(slot = %slot, name = %winner.name, score = winner.score, "槽位已推荐");
                    used.insert(winner.name.clone());
                    assigned_today.insert(winner.name.clone());
                }
                None => {
                    warn!(slot = %slot, "槽位无候选人");
                    warnings.push(no_candidate_message(slot));
                }
            }

            recommendations.push(SlotRecommendation {
                slot: *slot,
                recommended,
                alternatives: ranked,
                prefilled: false,
            });
        }

        let filled_count = recommendations
            .iter()
            .filter(|r| r.recommended.is_some())
            .count();

        info!(filled = filled_count, total = TOTAL_SLOTS, warnings = warnings.len(), "方案生成完成");

        Plan {
            slots: recommendations,
            summary: PlanSummary {
                filled_count,
                total_slots: TOTAL_SLOTS,
                warnings,
            },
        }
    }

    /// 单槽交互式候选排名
    ///
    /// 与整周方案不同: 已分配到其他槽位的成员仍在列表中, 只扣当日重复分
    ///
    /// # 参数
    /// - slot: 目标槽位（非法描述返回 InvalidSlot）
    /// - absentees: 本周请假名单
    /// - already_assigned: 本周已分配到其他槽位的成员
    #[instrument(skip(self, history, roster, slot, absentees, already_assigned), fields(slot = %slot))]
    pub fn rank_slot_candidates(
        &self,
        history: &History,
        roster: &[Member],
        slot: &RoleSlot,
        absentees: &[String],
        already_assigned: &[String],
    ) -> Result<Vec<CandidateScore>, DomainError> {
        slot.validate()?;

        let stats = self.aggregator.aggregate(history, roster);
        let same_day: HashSet<String> = already_assigned
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        let candidates: Vec<String> = available_members(&stats, absentees)
            .into_iter()
            .filter(|name| slot.role != Role::Technical || stats.is_technical_qualified(name))
            .collect();

        let ranked = self.scorer.rank(candidates.iter(), slot, &stats, &same_day);
        debug!(candidates = ranked.len(), "单槽候选排名完成");
        Ok(ranked)
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 对一个空槽位计算可选候选人排名
    fn rank_open_slot(
        &self,
        slot: &RoleSlot,
        stats: &HistoryStats,
        available: &[String],
        used: &HashSet<String>,
        assigned_today: &HashSet<String>,
    ) -> Vec<CandidateScore> {
        let eligible: Vec<&String> = available
            .iter()
            .filter(|name| !used.contains(name.as_str()))
            .filter(|name| slot.role != Role::Technical || stats.is_technical_qualified(name))
            .collect();

        let threshold = self.config.streak_exclusion_threshold;
        let fresh: Vec<&String> = eligible
            .iter()
            .copied()
            .filter(|name| stats.consecutive_count(name, slot.role) < threshold)
            .collect();

        // 排除连续者后无人可选时放宽
        let pool = if fresh.is_empty() { eligible } else { fresh };

        self.scorer.rank(pool, slot, stats, assigned_today)
    }
}

/// 在岗且未请假的成员（名册顺序）
fn available_members(stats: &HistoryStats, absentees: &[String]) -> Vec<String> {
    let absent: HashSet<&str> = absentees.iter().map(|n| n.trim()).collect();
    stats
        .active_members()
        .iter()
        .filter(|name| !absent.contains(name.as_str()))
        .cloned()
        .collect()
}

fn no_candidate_message(slot: &RoleSlot) -> String {
    let seat = match slot.index {
        Some(i) => format!(" #{}", i + 1),
        None => String::new(),
    };
    i18n::t_with_args(
        "plan.no_candidate",
        &[
            ("part", &slot.part.label()),
            ("role", &slot.role.label()),
            ("seat", &seat),
        ],
    )
}
