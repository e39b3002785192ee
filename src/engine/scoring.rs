// ==========================================
// 周排班推荐引擎 - 候选人评分
// ==========================================
// 职责: (成员, 槽位, 统计, 当日已分配集合) → 分数 + 原因
// 红线: 纯函数, 不读写任何外部状态
// ==========================================
// 评分项（基础分 100）:
// 1) 岗位间隔加分   min(有效周数 × 5, 30)
// 2) 机会均等加分   min(差距 × 50, 25)
// 3) 岗位多样性加分 (1 - 该岗次数/分配周数) × 20
// 4) 上周同岗       -30
// 5) 当日重复       -15
// 6) SW 资格者排字幕 -9999
// ==========================================

use crate::config::ScoringWeights;
use crate::domain::member::display_name;
use crate::domain::plan::CandidateScore;
use crate::domain::slot::RoleSlot;
use crate::domain::types::Role;
use crate::engine::stats::HistoryStats;
use crate::i18n;
use std::cmp::Ordering;
use std::collections::HashSet;

// ==========================================
// CandidateScorer - 候选评分器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CandidateScorer {
    weights: ScoringWeights,
}

impl CandidateScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// 计算单个成员在某槽位上的得分
    ///
    /// # 参数
    /// - name: 成员名
    /// - slot: 目标槽位
    /// - stats: 历史统计
    /// - same_day: 本周已分配到其他槽位的成员
    ///
    /// # 返回
    /// 四舍五入后的整数分 + 有信息量的原因
    pub fn score(
        &self,
        name: &str,
        slot: &RoleSlot,
        stats: &HistoryStats,
        same_day: &HashSet<String>,
    ) -> CandidateScore {
        let w = &self.weights;
        let role = slot.role;
        let role_label = role.label();
        let mut reasons = Vec::new();
        let mut score = w.base;

        // 1. 岗位间隔
        let weeks_since = stats.weeks_since_role(name, role);
        let is_new = stats.is_new_member(name);
        let effective_weeks = match weeks_since {
            Some(weeks) if !is_new => weeks,
            _ => w.never_held_weeks,
        };
        score += (effective_weeks as f64 * w.recency_per_week).min(w.recency_cap);

        if is_new {
            reasons.push(i18n::t("reason.new_member"));
        } else {
            match weeks_since {
                None => reasons.push(i18n::t_with_args(
                    "reason.first_in_role",
                    &[("role", &role_label)],
                )),
                Some(weeks) if weeks >= w.recency_reason_weeks => {
                    reasons.push(i18n::t_with_args(
                        "reason.weeks_since_role",
                        &[("weeks", &weeks.to_string()), ("role", &role_label)],
                    ))
                }
                Some(_) => {}
            }
        }

        // 2. 机会均等
        let gap = stats.average_assignment_rate() - stats.assignment_rate(name);
        if gap > 0.0 {
            score += (gap * w.opportunity_multiplier).min(w.opportunity_cap);
            if gap > w.opportunity_reason_gap {
                reasons.push(i18n::t("reason.low_rate"));
            }
        }

        // 3. 岗位多样性
        let total = stats.total_assignments(name);
        if total > 0 {
            let ratio = stats.role_count(name, role) as f64 / total as f64;
            score += (1.0 - ratio) * w.diversity_bonus;
        } else {
            score += w.diversity_bonus;
        }

        // 4. 上周同岗
        if stats.was_assigned_last_week(name, role) {
            score -= w.consecutive_penalty;
            reasons.push(i18n::t("reason.last_week_same_role"));
        }

        // 5. 当日重复
        if same_day.contains(name) {
            score -= w.same_day_penalty;
            reasons.push(i18n::t("reason.same_day"));
        }

        // 6. SW 资格者不排字幕
        if role == Role::Subtitle && stats.is_technical_qualified(name) {
            score -= w.technical_on_subtitle_penalty;
            reasons.push(i18n::t("reason.technical_on_subtitle"));
        }

        CandidateScore {
            name: name.to_string(),
            display_name: display_name(name),
            score: round_half_up(score),
            reasons,
        }
    }

    /// 批量评分并按分数降序排列（稳定排序, 同分保持输入顺序）
    pub fn rank<'a, I>(
        &self,
        names: I,
        slot: &RoleSlot,
        stats: &HistoryStats,
        same_day: &HashSet<String>,
    ) -> Vec<CandidateScore>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut scored: Vec<CandidateScore> = names
            .into_iter()
            .map(|name| self.score(name, slot, stats, same_day))
            .collect();
        scored.sort_by(compare_desc);
        scored
    }
}

fn compare_desc(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    b.score.cmp(&a.score)
}

/// 四舍五入（.5 向上）
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
