use super::core::{MemberFairness, RawScores};
use crate::config::{FairnessConfig, RuleConfig};
use crate::domain::fairness::{FairnessBreakdown, FairnessInsight};
use crate::domain::member::display_name;
use crate::domain::types::{InsightCategory, InsightType, Role};
use crate::domain::week::{History, WeekRecord};
use crate::engine::warnings::detect_continuous;
use crate::i18n;
use chrono::NaiveDate;

// ==========================================
// InsightBuilder - 公平性洞察
// ==========================================
// 机会: 低于均值 70% → issue, 高于 130% → suggestion
// 多样性: 个人分 < 40 → suggestion（按主岗位分组）
// 负荷: 高于均值 140% → issue, 低于 60% → suggestion
// 连续: 最新一周仍在持续的连续分配 → issue
// 某类无 issue 且子分 >= 85 → positive
pub(super) struct InsightBuilder<'a> {
    config: &'a FairnessConfig,
    rules: &'a RuleConfig,
}

impl<'a> InsightBuilder<'a> {
    pub(super) fn new(config: &'a FairnessConfig, rules: &'a RuleConfig) -> Self {
        Self { config, rules }
    }

    pub(super) fn build(
        &self,
        history: &History,
        members: &[MemberFairness],
        raw: &RawScores,
        breakdown: &FairnessBreakdown,
    ) -> Vec<FairnessInsight> {
        let attended: Vec<&MemberFairness> = members.iter().filter(|m| m.attended_weeks > 0).collect();

        let mut insights = Vec::new();
        insights.extend(self.opportunity(&attended, raw.mean_rate));
        insights.extend(self.diversity(&attended));
        insights.extend(self.workload(&attended, raw.mean_load));
        insights.extend(self.streaks(history, members));

        let scores = [
            (InsightCategory::Opportunity, breakdown.opportunity.score),
            (InsightCategory::Diversity, breakdown.diversity.score),
            (InsightCategory::Workload, breakdown.workload.score),
            (InsightCategory::Consecutive, breakdown.consecutive.score),
        ];
        for (category, score) in scores {
            let has_issue = insights
                .iter()
                .any(|i| i.category == category && i.insight_type == InsightType::Issue);
            if !has_issue && score >= self.config.insights.positive_min_score {
                insights.push(FairnessInsight {
                    insight_type: InsightType::Positive,
                    category,
                    message: i18n::t(&format!("fairness.insight.positive.{}", category_key(category))),
                    members: Vec::new(),
                });
            }
        }

        // issue → suggestion → positive（稳定排序保持类别顺序）
        insights.sort_by_key(|i| i.insight_type.rank());
        insights
    }

    fn opportunity(&self, attended: &[&MemberFairness], mean_rate: f64) -> Vec<FairnessInsight> {
        if mean_rate <= 0.0 {
            return Vec::new();
        }
        let t = &self.config.insights;

        let low = names_where(attended, |m| m.assignment_rate() < mean_rate * t.opportunity_low_ratio);
        let high = names_where(attended, |m| m.assignment_rate() > mean_rate * t.opportunity_high_ratio);

        let mut out = Vec::new();
        if !low.is_empty() {
            out.push(insight(InsightType::Issue, InsightCategory::Opportunity, "fairness.insight.opportunity_low", low));
        }
        if !high.is_empty() {
            out.push(insight(
                InsightType::Suggestion,
                InsightCategory::Opportunity,
                "fairness.insight.opportunity_high",
                high,
            ));
        }
        out
    }

    fn diversity(&self, attended: &[&MemberFairness]) -> Vec<FairnessInsight> {
        let threshold = self.config.insights.diversity_low_score;
        let mut groups: Vec<(Role, Vec<String>)> = Vec::new();

        for member in attended.iter().filter(|m| !m.technical_qualified) {
            let Some(score) = member.diversity_score() else {
                continue;
            };
            if score >= threshold {
                continue;
            }
            let Some(role) = member.dominant_role() else {
                continue;
            };
            match groups.iter_mut().find(|(r, _)| *r == role) {
                Some((_, names)) => names.push(member.name.clone()),
                None => groups.push((role, vec![member.name.clone()])),
            }
        }

        groups.sort_by_key(|(role, _)| role.index());
        groups
            .into_iter()
            .map(|(role, names)| FairnessInsight {
                insight_type: InsightType::Suggestion,
                category: InsightCategory::Diversity,
                message: i18n::t_with_args(
                    "fairness.insight.diversity_low",
                    &[("role", &role.label()), ("names", &join_display(&names))],
                ),
                members: names,
            })
            .collect()
    }

    fn workload(&self, attended: &[&MemberFairness], mean_load: f64) -> Vec<FairnessInsight> {
        if mean_load <= 0.0 {
            return Vec::new();
        }
        let t = &self.config.insights;

        let heavy = names_where(attended, |m| m.load_rate() > mean_load * t.workload_high_ratio);
        let light = names_where(attended, |m| m.load_rate() < mean_load * t.workload_low_ratio);

        let mut out = Vec::new();
        if !heavy.is_empty() {
            out.push(insight(InsightType::Issue, InsightCategory::Workload, "fairness.insight.workload_high", heavy));
        }
        if !light.is_empty() {
            out.push(insight(
                InsightType::Suggestion,
                InsightCategory::Workload,
                "fairness.insight.workload_low",
                light,
            ));
        }
        out
    }

    /// 最新一周仍在持续的连续分配
    fn streaks(&self, history: &History, members: &[MemberFairness]) -> Vec<FairnessInsight> {
        let Some((latest_date, latest)) = history.iter().next_back() else {
            return Vec::new();
        };
        let prior: Vec<(NaiveDate, &WeekRecord)> = history
            .range(..*latest_date)
            .rev()
            .take(self.rules.continuous_window)
            .map(|(d, w)| (*d, w))
            .collect();

        detect_continuous((&latest.part1, &latest.part2), &prior)
            .into_iter()
            .filter(|hit| hit.min_offset() == 1)
            .filter(|hit| members.iter().any(|m| m.name == hit.name))
            .map(|hit| {
                // 从 1 开始的连续偏移个数 + 最新一周
                let run = hit
                    .offsets
                    .iter()
                    .enumerate()
                    .take_while(|(i, o)| **o == (*i as u32) + 1)
                    .count()
                    + 1;
                FairnessInsight {
                    insight_type: InsightType::Issue,
                    category: InsightCategory::Consecutive,
                    message: i18n::t_with_args(
                        "fairness.insight.streak",
                        &[
                            ("name", &display_name(&hit.name)),
                            ("part", &hit.part.label()),
                            ("role", &hit.role.label()),
                            ("weeks", &run.to_string()),
                        ],
                    ),
                    members: vec![hit.name],
                }
            })
            .collect()
    }
}

fn names_where<F>(members: &[&MemberFairness], predicate: F) -> Vec<String>
where
    F: Fn(&MemberFairness) -> bool,
{
    members
        .iter()
        .filter(|m| predicate(**m))
        .map(|m| m.name.clone())
        .collect()
}

fn insight(
    insight_type: InsightType,
    category: InsightCategory,
    key: &str,
    members: Vec<String>,
) -> FairnessInsight {
    FairnessInsight {
        insight_type,
        category,
        message: i18n::t_with_args(key, &[("names", &join_display(&members))]),
        members,
    }
}

fn join_display(names: &[String]) -> String {
    names
        .iter()
        .map(|n| display_name(n))
        .collect::<Vec<_>>()
        .join(", ")
}

fn category_key(category: InsightCategory) -> &'static str {
    match category {
        InsightCategory::Opportunity => "opportunity",
        InsightCategory::Diversity => "diversity",
        InsightCategory::Workload => "workload",
        InsightCategory::Consecutive => "consecutive",
    }
}
