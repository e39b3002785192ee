// ==========================================
// 周排班推荐引擎 - 历史统计聚合
// ==========================================
// 职责: 单次升序遍历历史, 产出成员统计 + SW 资格集合
// 输入: History（升序）+ 名册（仅在岗成员）
// 输出: HistoryStats（派生数据, 不持久化）
// 红线: SW 资格每次都从历史重新推导, 不做存储
// ==========================================

use crate::domain::member::{active_by_generation, active_member_names, display_name, Member};
use crate::domain::types::{Part, PerRole, Role};
use crate::domain::week::History;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, instrument};

// ==========================================
// MemberStats - 成员统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    pub attended_weeks: u32,              // 出勤周数（未请假）
    pub assignment_count: u32,            // 有分配的周数
    pub role_counts: PerRole<u32>,        // 各岗位累计次数（按席位计）
    pub last_role_week: PerRole<Option<usize>>, // 各岗位最后一次所在周下标
    pub consecutive: PerRole<u32>,        // 截至最新一周的连续周数
    pub has_any_assignment: bool,
}

impl MemberStats {
    /// 分配率 = 有分配周数 / 出勤周数
    pub fn assignment_rate(&self) -> f64 {
        if self.attended_weeks == 0 {
            0.0
        } else {
            self.assignment_count as f64 / self.attended_weeks as f64
        }
    }
}

// ==========================================
// HistoryStats - 聚合结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct HistoryStats {
    total_weeks: usize,
    active_members: Vec<String>,
    members: HashMap<String, MemberStats>,
    average_assignment_rate: f64,
    technical_qualified: BTreeSet<String>,
}

impl HistoryStats {
    pub fn total_weeks(&self) -> usize {
        self.total_weeks
    }

    /// 在岗成员（名册顺序）
    pub fn active_members(&self) -> &[String] {
        &self.active_members
    }

    pub fn member(&self, name: &str) -> Option<&MemberStats> {
        self.members.get(name)
    }

    pub fn average_assignment_rate(&self) -> f64 {
        self.average_assignment_rate
    }

    pub fn technical_qualified(&self) -> &BTreeSet<String> {
        &self.technical_qualified
    }

    pub fn is_technical_qualified(&self, name: &str) -> bool {
        self.technical_qualified.contains(name)
    }

    /// 距上次担任该岗位的周数
    ///
    /// # 返回
    /// - None: 从未担任（或不在名册中）
    /// - Some(0): 最新一周刚担任
    pub fn weeks_since_role(&self, name: &str, role: Role) -> Option<u32> {
        let last = self.members.get(name)?.last_role_week[role]?;
        Some((self.total_weeks - 1 - last) as u32)
    }

    /// 从未有任何分配即视为新成员
    pub fn is_new_member(&self, name: &str) -> bool {
        self.members
            .get(name)
            .map(|s| !s.has_any_assignment)
            .unwrap_or(true)
    }

    pub fn assignment_rate(&self, name: &str) -> f64 {
        self.members
            .get(name)
            .map(MemberStats::assignment_rate)
            .unwrap_or(0.0)
    }

    pub fn role_count(&self, name: &str, role: Role) -> u32 {
        self.members.get(name).map(|s| s.role_counts[role]).unwrap_or(0)
    }

    pub fn total_assignments(&self, name: &str) -> u32 {
        self.members.get(name).map(|s| s.assignment_count).unwrap_or(0)
    }

    pub fn consecutive_count(&self, name: &str, role: Role) -> u32 {
        self.members.get(name).map(|s| s.consecutive[role]).unwrap_or(0)
    }

    /// 最新一周是否担任过该岗位
    pub fn was_assigned_last_week(&self, name: &str, role: Role) -> bool {
        self.weeks_since_role(name, role) == Some(0)
    }
}

/// 历史概况（CLI 输出表头 / 日志用）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub total_weeks: usize,
    pub active_members: usize,
    pub total_slot_assignments: usize,
    pub average_assignments_per_week: f64,
    pub first_week: Option<NaiveDate>,
    pub last_week: Option<NaiveDate>,
}

// ==========================================
// 成员排行 - 岗位贡献 / 缺勤 / 分配
// ==========================================

/// 单个成员在某岗位上的份额
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleShare {
    pub name: String,
    pub display_name: String,
    pub count: u32,
    pub percentage: f64, // 占该岗位总次数的百分比
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleContribution {
    pub role: Role,
    pub total_count: u32,
    pub members: Vec<RoleShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceRank {
    pub name: String,
    pub display_name: String,
    pub absence_count: u32,
    pub absence_rate: f64, // 百分比, 分母为历史总周数
}

/// 分配排行 / 分配不足排行共用
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRank {
    pub name: String,
    pub display_name: String,
    pub assignment_count: u32, // 按席位计
    pub attended_weeks: u32,
    pub assignment_rate: f64, // 每出勤周席位数
}

/// 历史上担任过 SW 的全部成员（任意场次）
pub fn qualified_for_technical(history: &History) -> BTreeSet<String> {
    let mut qualified = BTreeSet::new();
    for week in history.values() {
        for part in Part::ALL {
            let name = week.part(part).name_at(Role::Technical, 0);
            if !name.is_empty() {
                qualified.insert(name.to_string());
            }
        }
    }
    qualified
}

// ==========================================
// StatsAggregator - 统计聚合器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    // 无状态
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 聚合历史统计
    ///
    /// 每周流程:
    /// 1) 记录每个已填席位的岗位命中（次数 + 最后周下标）
    /// 2) 未请假的在岗成员 出勤周 +1
    /// 3) 本周有任意分配 → 分配周 +1
    /// 4) 命中岗位的连续计数 +1, 其余岗位清零
    ///
    /// # 参数
    /// - history: 历史记录（BTreeMap 天然升序）
    /// - roster: 名册（只统计在岗成员）
    #[instrument(skip(self, history, roster), fields(weeks = history.len(), roster = roster.len()))]
    pub fn aggregate(&self, history: &History, roster: &[Member]) -> HistoryStats {
        let active_members = active_member_names(roster);
        let mut members: HashMap<String, MemberStats> = active_members
            .iter()
            .map(|name| (name.clone(), MemberStats::default()))
            .collect();

        for (week_index, week) in history.values().enumerate() {
            let mut week_roles: HashMap<&str, HashSet<Role>> = HashMap::new();

            for part in Part::ALL {
                for (role, _seat, name) in week.part(part).entries() {
                    let Some(stats) = members.get_mut(name) else {
                        continue;
                    };
                    stats.role_counts[role] += 1;
                    stats.last_role_week[role] = Some(week_index);
                    week_roles.entry(name).or_default().insert(role);
                }
            }

            for name in &active_members {
                let Some(stats) = members.get_mut(name) else {
                    continue;
                };
                if !week.is_absent(name) {
                    stats.attended_weeks += 1;
                }

                let roles = week_roles.get(name.as_str());
                if roles.map(|r| !r.is_empty()).unwrap_or(false) {
                    stats.assignment_count += 1;
                    stats.has_any_assignment = true;
                }

                for role in Role::ALL {
                    if roles.map(|r| r.contains(&role)).unwrap_or(false) {
                        stats.consecutive[role] += 1;
                    } else {
                        stats.consecutive[role] = 0;
                    }
                }
            }
        }

        let attended: Vec<f64> = members
            .values()
            .filter(|s| s.attended_weeks > 0)
            .map(MemberStats::assignment_rate)
            .collect();
        let average_assignment_rate = if attended.is_empty() {
            0.0
        } else {
            attended.iter().sum::<f64>() / attended.len() as f64
        };

        let technical_qualified = qualified_for_technical(history);

        debug!(
            active = active_members.len(),
            qualified = technical_qualified.len(),
            average_rate = average_assignment_rate,
            "历史统计完成"
        );

        HistoryStats {
            total_weeks: history.len(),
            active_members,
            members,
            average_assignment_rate,
            technical_qualified,
        }
    }

    /// 历史概况
    pub fn summarize(&self, history: &History, roster: &[Member]) -> HistorySummary {
        let total_weeks = history.len();
        let total_slot_assignments: usize = history
            .values()
            .map(|w| w.part1.entries().len() + w.part2.entries().len())
            .sum();

        HistorySummary {
            total_weeks,
            active_members: active_member_names(roster).len(),
            total_slot_assignments,
            average_assignments_per_week: if total_weeks == 0 {
                0.0
            } else {
                total_slot_assignments as f64 / total_weeks as f64
            },
            first_week: history.keys().next().copied(),
            last_week: history.keys().next_back().copied(),
        }
    }

    /// 各岗位的成员份额
    ///
    /// 名册中标记为离岗的成员不计入; 不在名册中的姓名照常计入。
    /// 岗位按总次数降序, 岗位内成员按次数降序（同次数按期数）
    #[instrument(skip(self, history, roster), fields(weeks = history.len()))]
    pub fn role_contributions(&self, history: &History, roster: &[Member]) -> Vec<RoleContribution> {
        let inactive: HashSet<&str> = roster
            .iter()
            .filter(|m| !m.active)
            .map(|m| m.name.trim())
            .collect();

        let mut counts: PerRole<HashMap<String, u32>> = PerRole::default();
        for week in history.values() {
            for part in Part::ALL {
                for (role, _seat, name) in week.part(part).entries() {
                    if inactive.contains(name) {
                        continue;
                    }
                    *counts[role].entry(name.to_string()).or_insert(0) += 1;
                }
            }
        }

        let order = display_order(roster);
        let mut contributions: Vec<RoleContribution> = Role::ALL
            .into_iter()
            .map(|role| {
                let total_count: u32 = counts[role].values().sum();
                let mut members: Vec<RoleShare> = counts[role]
                    .iter()
                    .map(|(name, &count)| RoleShare {
                        name: name.clone(),
                        display_name: display_name(name),
                        count,
                        percentage: if total_count == 0 {
                            0.0
                        } else {
                            count as f64 / total_count as f64 * 100.0
                        },
                    })
                    .collect();
                members.sort_by(|a, b| {
                    b.count
                        .cmp(&a.count)
                        .then_with(|| order(a.name.as_str()).cmp(&order(b.name.as_str())))
                        .then_with(|| a.name.cmp(&b.name))
                });
                RoleContribution {
                    role,
                    total_count,
                    members,
                }
            })
            .collect();
        contributions.sort_by(|a, b| b.total_count.cmp(&a.total_count));
        contributions
    }

    /// 缺勤率排行 TOP N（在岗成员, 无历史时为空）
    #[instrument(skip(self, history, roster), fields(weeks = history.len()))]
    pub fn absence_ranking(&self, history: &History, roster: &[Member], top_n: usize) -> Vec<AbsenceRank> {
        let total_weeks = history.len();
        if total_weeks == 0 {
            return Vec::new();
        }

        let mut ranking: Vec<AbsenceRank> = active_by_generation(roster)
            .into_iter()
            .map(|member| {
                let name = member.name.trim();
                let absence_count = history.values().filter(|w| w.is_absent(name)).count() as u32;
                AbsenceRank {
                    name: name.to_string(),
                    display_name: display_name(name),
                    absence_count,
                    absence_rate: absence_count as f64 / total_weeks as f64 * 100.0,
                }
            })
            .collect();
        ranking.sort_by(|a, b| b.absence_rate.total_cmp(&a.absence_rate));
        ranking.truncate(top_n);
        ranking
    }

    /// 分配次数排行 TOP N（降序）
    pub fn assignment_ranking(&self, history: &History, roster: &[Member], top_n: usize) -> Vec<AssignmentRank> {
        let mut ranking = self.assignment_ranks(history, roster);
        ranking.sort_by(|a, b| b.assignment_count.cmp(&a.assignment_count));
        ranking.truncate(top_n);
        ranking
    }

    /// 分配不足排行 TOP N
    ///
    /// 只看有出勤记录的成员, 按每出勤周席位数升序
    pub fn underassigned_members(&self, history: &History, roster: &[Member], top_n: usize) -> Vec<AssignmentRank> {
        let mut ranking: Vec<AssignmentRank> = self
            .assignment_ranks(history, roster)
            .into_iter()
            .filter(|r| r.attended_weeks > 0)
            .collect();
        ranking.sort_by(|a, b| a.assignment_rate.total_cmp(&b.assignment_rate));
        ranking.truncate(top_n);
        ranking
    }

    /// 在岗成员的分配次数 + 出勤周数（期数顺序）
    #[instrument(skip(self, history, roster), fields(weeks = history.len()))]
    fn assignment_ranks(&self, history: &History, roster: &[Member]) -> Vec<AssignmentRank> {
        let stats = self.aggregate(history, roster);
        active_by_generation(roster)
            .into_iter()
            .map(|member| {
                let name = member.name.trim();
                let (assignment_count, attended_weeks) = stats
                    .member(name)
                    .map(|s| (s.role_counts.iter().map(|(_, c)| *c).sum::<u32>(), s.attended_weeks))
                    .unwrap_or((0, 0));
                AssignmentRank {
                    name: name.to_string(),
                    display_name: display_name(name),
                    assignment_count,
                    attended_weeks,
                    assignment_rate: if attended_weeks == 0 {
                        0.0
                    } else {
                        assignment_count as f64 / attended_weeks as f64
                    },
                }
            })
            .collect()
    }
}

/// 姓名 → 期数顺序下标（名册外的姓名排最后）
fn display_order(roster: &[Member]) -> impl Fn(&str) -> usize {
    let positions: HashMap<String, usize> = active_by_generation(roster)
        .into_iter()
        .enumerate()
        .map(|(i, m)| (m.name.trim().to_string(), i))
        .collect();
    move |name| positions.get(name).copied().unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::week::{Absence, WeekRecord};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn roster(names: &[&str]) -> Vec<Member> {
        names.iter().map(|n| Member::new(n, true)).collect()
    }

    fn sample_history() -> History {
        let mut history = History::new();

        let mut w1 = WeekRecord::default();
        w1.part1.set(Role::Technical, 0, "A");
        w1.part1.set(Role::Side, 0, "B");
        w1.part2.set(Role::Side, 1, "B");
        history.insert(date("2024-03-03"), w1);

        let mut w2 = WeekRecord::default();
        w2.part1.set(Role::Side, 0, "B");
        w2.part2.set(Role::Sketch, 0, "C");
        w2.absences.push(Absence {
            name: "A".to_string(),
            reason: None,
        });
        history.insert(date("2024-03-10"), w2);

        history
    }

    #[test]
    fn test_aggregate_counts_and_streaks() {
        let stats = StatsAggregator::new().aggregate(&sample_history(), &roster(&["A", "B", "C", "D"]));

        assert_eq!(stats.total_weeks(), 2);

        let a = stats.member("A").unwrap();
        assert_eq!(a.attended_weeks, 1);
        assert_eq!(a.assignment_count, 1);
        assert_eq!(a.consecutive[Role::Technical], 0);

        let b = stats.member("B").unwrap();
        assert_eq!(b.role_counts[Role::Side], 3);
        assert_eq!(b.assignment_count, 2);
        assert_eq!(b.consecutive[Role::Side], 2);
        assert!(stats.was_assigned_last_week("B", Role::Side));

        assert!(stats.is_new_member("D"));
        assert!(!stats.is_new_member("C"));
    }

    #[test]
    fn test_weeks_since_role() {
        let stats = StatsAggregator::new().aggregate(&sample_history(), &roster(&["A", "B", "C"]));
        assert_eq!(stats.weeks_since_role("A", Role::Technical), Some(1));
        assert_eq!(stats.weeks_since_role("B", Role::Side), Some(0));
        assert_eq!(stats.weeks_since_role("C", Role::Side), None);
        assert_eq!(stats.weeks_since_role("Z", Role::Side), None);
    }

    #[test]
    fn test_average_rate_and_qualified() {
        let stats = StatsAggregator::new().aggregate(&sample_history(), &roster(&["A", "B", "C", "D"]));
        // A 1/1, B 2/2, C 1/2, D 0/2
        let expected = (1.0 + 1.0 + 0.5 + 0.0) / 4.0;
        assert!((stats.average_assignment_rate() - expected).abs() < 1e-9);
        assert!(stats.is_technical_qualified("A"));
        assert!(!stats.is_technical_qualified("B"));
    }

    #[test]
    fn test_inactive_members_are_not_tracked() {
        let mut members = roster(&["A", "B"]);
        members[1].active = false;
        let stats = StatsAggregator::new().aggregate(&sample_history(), &members);
        assert!(stats.member("B").is_none());
        assert_eq!(stats.active_members(), &["A".to_string()]);
        // 资格集合与名册无关
        assert!(stats.is_technical_qualified("A"));
    }

    #[test]
    fn test_summarize() {
        let summary = StatsAggregator::new().summarize(&sample_history(), &roster(&["A", "B"]));
        assert_eq!(summary.total_weeks, 2);
        assert_eq!(summary.total_slot_assignments, 5);
        assert_eq!(summary.first_week, Some(date("2024-03-03")));
        assert_eq!(summary.last_week, Some(date("2024-03-10")));
    }

    #[test]
    fn test_role_contributions() {
        let mut members = roster(&["A", "B", "C"]);
        members[2].active = false;
        let contributions = StatsAggregator::new().role_contributions(&sample_history(), &members);

        assert_eq!(contributions.len(), Role::ALL.len());
        // 사이드 3 次居首, C 离岗 → 스케치 为 0
        assert_eq!(contributions[0].role, Role::Side);
        assert_eq!(contributions[0].total_count, 3);
        assert_eq!(contributions[0].members[0].name, "B");
        assert!((contributions[0].members[0].percentage - 100.0).abs() < 1e-9);

        let sketch = contributions.iter().find(|c| c.role == Role::Sketch).unwrap();
        assert_eq!(sketch.total_count, 0);
        assert!(sketch.members.is_empty());
    }

    #[test]
    fn test_role_contribution_shares_follow_generation_on_ties() {
        let mut history = History::new();
        let mut week = WeekRecord::default();
        week.part1.set(Role::Sketch, 0, "21 하늘");
        week.part2.set(Role::Sketch, 0, "19 다온");
        history.insert(date("2024-03-03"), week);

        let members = roster(&["21 하늘", "19 다온"]);
        let contributions = StatsAggregator::new().role_contributions(&history, &members);
        let sketch = &contributions[0];

        assert_eq!(sketch.role, Role::Sketch);
        let names: Vec<&str> = sketch.members.iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(names, vec!["다온", "하늘"]);
        assert!((sketch.members[0].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_absence_ranking() {
        let members = roster(&["B", "20 A", "C"]);
        let mut history = sample_history();
        // sample_history 中的请假者名为 "A", 改用带期数的姓名
        for week in history.values_mut() {
            for absence in &mut week.absences {
                absence.name = "20 A".to_string();
            }
        }

        let ranking = StatsAggregator::new().absence_ranking(&history, &members, 2);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].name, "20 A");
        assert_eq!(ranking[0].display_name, "A");
        assert_eq!(ranking[0].absence_count, 1);
        assert!((ranking[0].absence_rate - 50.0).abs() < 1e-9);
        assert_eq!(ranking[1].absence_count, 0);
    }

    #[test]
    fn test_absence_ranking_without_weeks_is_empty() {
        let ranking = StatsAggregator::new().absence_ranking(&History::new(), &roster(&["A", "B"]), 3);
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_assignment_ranking_counts_seats() {
        let ranking = StatsAggregator::new().assignment_ranking(&sample_history(), &roster(&["A", "B", "C", "D"]), 3);

        assert_eq!(ranking.len(), 3);
        // B: 3 个席位 / 2 出勤周
        assert_eq!(ranking[0].name, "B");
        assert_eq!(ranking[0].assignment_count, 3);
        assert_eq!(ranking[0].attended_weeks, 2);
        assert!((ranking[0].assignment_rate - 1.5).abs() < 1e-9);
        // A / C 各 1 次, 保持名册顺序
        assert_eq!(ranking[1].name, "A");
        assert_eq!(ranking[2].name, "C");
    }

    #[test]
    fn test_underassigned_skips_members_without_attendance() {
        let mut history = sample_history();
        // D 两周都请假 → 出勤 0, 不进入排行
        for week in history.values_mut() {
            week.absences.push(Absence {
                name: "D".to_string(),
                reason: None,
            });
        }

        let ranking = StatsAggregator::new().underassigned_members(&history, &roster(&["A", "B", "C", "D"]), 3);
        let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert!(ranking.iter().all(|r| r.attended_weeks > 0));
        assert!((ranking[0].assignment_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history() {
        let stats = StatsAggregator::new().aggregate(&History::new(), &roster(&["A"]));
        assert_eq!(stats.total_weeks(), 0);
        assert_eq!(stats.average_assignment_rate(), 0.0);
        assert!(stats.technical_qualified().is_empty());
    }
}
