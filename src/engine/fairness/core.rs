use super::insights::InsightBuilder;
use crate::config::{FairnessConfig, RuleConfig};
use crate::domain::fairness::{FairnessBreakdown, FairnessReport, SubScore};
use crate::domain::member::{active_member_names, Member};
use crate::domain::types::{Part, PerRole, QualityLevel, Role};
use crate::domain::week::History;
use crate::engine::scoring::round_half_up;
use crate::engine::stats::qualified_for_technical;
use crate::i18n;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument};

/// 单个成员的公平性原始数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberFairness {
    pub name: String,
    pub attended_weeks: u32,
    pub assigned_weeks: u32,
    pub role_counts: PerRole<u32>,
    pub load: f64,
    pub technical_qualified: bool,
}

impl MemberFairness {
    pub fn assignment_rate(&self) -> f64 {
        if self.attended_weeks == 0 {
            0.0
        } else {
            self.assigned_weeks as f64 / self.attended_weeks as f64
        }
    }

    /// 出勤周均负荷
    pub fn load_rate(&self) -> f64 {
        if self.attended_weeks == 0 {
            0.0
        } else {
            self.load / self.attended_weeks as f64
        }
    }

    /// 非技术岗位分布的归一化香农熵 (0-100)
    ///
    /// # 返回
    /// - None: 没有任何非技术岗位分配
    pub fn diversity_score(&self) -> Option<f64> {
        let total: u32 = Role::NON_TECHNICAL.iter().map(|r| self.role_counts[*r]).sum();
        if total == 0 {
            return None;
        }

        let entropy: f64 = Role::NON_TECHNICAL
            .iter()
            .map(|r| self.role_counts[*r])
            .filter(|c| *c > 0)
            .map(|c| {
                let p = c as f64 / total as f64;
                -p * p.log2()
            })
            .sum();
        let max_entropy = (Role::NON_TECHNICAL.len() as f64).log2();
        Some(entropy / max_entropy * 100.0)
    }

    /// 次数最多的非技术岗位（同数取岗位顺序靠前者）
    pub fn dominant_role(&self) -> Option<Role> {
        let mut best: Option<(Role, u32)> = None;
        for role in Role::NON_TECHNICAL {
            let count = self.role_counts[role];
            if count == 0 {
                continue;
            }
            if best.map(|(_, c)| count > c).unwrap_or(true) {
                best = Some((role, count));
            }
        }
        best.map(|(role, _)| role)
    }
}

/// 子项原始得分（未取整）
#[derive(Debug, Clone, Default)]
pub(super) struct RawScores {
    pub opportunity: f64,
    pub diversity: f64,
    pub workload: f64,
    pub consecutive: f64,
    pub mean_rate: f64,
    pub mean_load: f64,
    pub opportunity_cv: f64,
    pub workload_cv: f64,
    pub diversity_members: usize,
    pub repeats: u32,
    pub role_assignments: u32,
}

// ==========================================
// FairnessScorer - 公平性评分器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct FairnessScorer {
    config: FairnessConfig,
    rules: RuleConfig,
}

impl FairnessScorer {
    pub fn new(config: FairnessConfig, rules: RuleConfig) -> Self {
        Self { config, rules }
    }

    /// 生成公平性报告
    #[instrument(skip_all, fields(weeks = history.len(), roster = roster.len()))]
    pub fn report(&self, history: &History, roster: &[Member]) -> FairnessReport {
        if history.is_empty() {
            info!("历史为空, 公平性视为满分");
            return self.empty_report();
        }

        let members = self.collect_members(history, roster);
        let raw = self.compute_raw(history, &members);

        let w = &self.config.weights;
        let composite = raw.opportunity * w.opportunity
            + raw.diversity * w.diversity
            + raw.workload * w.workload
            + raw.consecutive * w.consecutive;
        let overall_score = round_half_up(composite).clamp(0, 100) as u32;
        let level = QualityLevel::classify(overall_score, &self.config.levels);

        let breakdown = self.breakdown(&raw);
        let insights = InsightBuilder::new(&self.config, &self.rules).build(history, &members, &raw, &breakdown);

        info!(score = overall_score, level = %level, insights = insights.len(), "公平性评分完成");

        FairnessReport {
            overall_score,
            level,
            breakdown,
            insights,
        }
    }

    /// 逐成员聚合（出勤、分配周、岗位次数、负荷）
    pub fn collect_members(&self, history: &History, roster: &[Member]) -> Vec<MemberFairness> {
        let qualified: BTreeSet<String> = qualified_for_technical(history);
        let names = active_member_names(roster);
        let index: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();

        let mut members: Vec<MemberFairness> = names
            .iter()
            .map(|name| MemberFairness {
                name: name.clone(),
                technical_qualified: qualified.contains(name),
                ..MemberFairness::default()
            })
            .collect();

        let difficulty = &self.config.role_difficulty;
        for week in history.values() {
            // (本周负荷, 出现过的场次)
            let mut week_load: HashMap<usize, (f64, [bool; 2])> = HashMap::new();

            for part in Part::ALL {
                for (role, _seat, name) in week.part(part).entries() {
                    let Some(&i) = index.get(name) else {
                        continue;
                    };
                    members[i].role_counts[role] += 1;
                    let entry = week_load.entry(i).or_insert((0.0, [false, false]));
                    entry.0 += difficulty.weight(role);
                    entry.1[part.index()] = true;
                }
            }

            for (i, member) in members.iter_mut().enumerate() {
                if !week.is_absent(&member.name) {
                    member.attended_weeks += 1;
                }
                if let Some((load, parts)) = week_load.get(&i) {
                    member.assigned_weeks += 1;
                    let multiplier = if parts[0] && parts[1] {
                        self.config.both_parts_multiplier
                    } else {
                        1.0
                    };
                    member.load += load * multiplier;
                }
            }
        }

        members
    }

    pub(super) fn compute_raw(&self, history: &History, members: &[MemberFairness]) -> RawScores {
        let attended: Vec<&MemberFairness> = members.iter().filter(|m| m.attended_weeks > 0).collect();

        // 1. 机会均等
        let rates: Vec<f64> = attended.iter().map(|m| m.assignment_rate()).collect();
        let (mean_rate, opportunity_cv) = mean_and_cv(&rates);
        let opportunity = clamp_score(100.0 - opportunity_cv * self.config.opportunity_cv_multiplier);

        // 2. 岗位多样性（非 SW 成员）
        let diversity_pool: Vec<f64> = attended
            .iter()
            .filter(|m| !m.technical_qualified)
            .map(|m| m.diversity_score().unwrap_or(0.0))
            .collect();
        let diversity = if diversity_pool.is_empty() {
            100.0
        } else {
            diversity_pool.iter().sum::<f64>() / diversity_pool.len() as f64
        };

        // 3. 负荷均衡
        let loads: Vec<f64> = attended.iter().map(|m| m.load_rate()).collect();
        let (mean_load, workload_cv) = mean_and_cv(&loads);
        let workload = clamp_score(100.0 - workload_cv * self.config.workload_cv_multiplier);

        // 4. 连续回避
        let (repeats, role_assignments) = count_repeats(history, members);
        let consecutive = if role_assignments == 0 {
            100.0
        } else {
            let rate = repeats as f64 / role_assignments as f64;
            clamp_score(100.0 - rate * self.config.consecutive_rate_multiplier)
        };

        debug!(
            opportunity,
            diversity,
            workload,
            consecutive,
            "公平性子项"
        );

        RawScores {
            opportunity,
            diversity,
            workload,
            consecutive,
            mean_rate,
            mean_load,
            opportunity_cv,
            workload_cv,
            diversity_members: diversity_pool.len(),
            repeats,
            role_assignments,
        }
    }

    fn breakdown(&self, raw: &RawScores) -> FairnessBreakdown {
        let w = &self.config.weights;
        let percent = |v: f64| format!("{:.0}", v * 100.0);

        FairnessBreakdown {
            opportunity: SubScore {
                score: to_score(raw.opportunity),
                weight: w.opportunity,
                description: i18n::t_with_args(
                    "fairness.opportunity.description",
                    &[("rate", &percent(raw.mean_rate)), ("cv", &percent(raw.opportunity_cv))],
                ),
            },
            diversity: SubScore {
                score: to_score(raw.diversity),
                weight: w.diversity,
                description: i18n::t_with_args(
                    "fairness.diversity.description",
                    &[
                        ("score", &format!("{:.0}", raw.diversity)),
                        ("count", &raw.diversity_members.to_string()),
                    ],
                ),
            },
            workload: SubScore {
                score: to_score(raw.workload),
                weight: w.workload,
                description: i18n::t_with_args(
                    "fairness.workload.description",
                    &[("load", &format!("{:.2}", raw.mean_load)), ("cv", &percent(raw.workload_cv))],
                ),
            },
            consecutive: SubScore {
                score: to_score(raw.consecutive),
                weight: w.consecutive,
                description: i18n::t_with_args(
                    "fairness.consecutive.description",
                    &[
                        ("repeats", &raw.repeats.to_string()),
                        ("total", &raw.role_assignments.to_string()),
                    ],
                ),
            },
        }
    }

    fn empty_report(&self) -> FairnessReport {
        let w = &self.config.weights;
        let no_data = || SubScore {
            score: 100,
            weight: 0.0,
            description: i18n::t("fairness.no_data"),
        };

        FairnessReport {
            overall_score: 100,
            level: QualityLevel::classify(100, &self.config.levels),
            breakdown: FairnessBreakdown {
                opportunity: SubScore { weight: w.opportunity, ..no_data() },
                diversity: SubScore { weight: w.diversity, ..no_data() },
                workload: SubScore { weight: w.workload, ..no_data() },
                consecutive: SubScore { weight: w.consecutive, ..no_data() },
            },
            insights: Vec::new(),
        }
    }
}

/// 均值与变异系数（总体标准差 / 均值）; 均值为 0 时 CV 记为 0
pub(super) fn mean_and_cv(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt() / mean)
}

/// 统计"与上一个出勤周岗位相同"的次数
///
/// # 返回
/// (重复次数, 周×岗位 分配总数)
fn count_repeats(history: &History, members: &[MemberFairness]) -> (u32, u32) {
    let mut repeats = 0;
    let mut total = 0;

    for member in members {
        let mut previous: Option<Vec<Role>> = None;
        for week in history.values() {
            if week.is_absent(&member.name) {
                continue;
            }
            let held: Vec<Role> = Role::ALL
                .into_iter()
                .filter(|role| Part::ALL.iter().any(|part| week.holds(*part, *role, &member.name)))
                .collect();

            total += held.len() as u32;
            if let Some(prev) = &previous {
                repeats += held.iter().filter(|r| prev.contains(r)).count() as u32;
            }
            previous = Some(held);
        }
    }

    (repeats, total)
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn to_score(value: f64) -> u32 {
    round_half_up(value).clamp(0, 100) as u32
}
