// ==========================================
// 周排班推荐引擎 - 规则告警
// ==========================================
// 职责: 对本周草案做独立规则检查
// 1) 连续分配: 最近 N 周同场次同岗位同一人（按人合并）
// 2) 侧机位不足: 某场次侧机位少于 2 人
// 3) 轮换提示: 窗口内久未担任某岗位的在岗成员
// 红线: 只提示, 不修改草案
// ==========================================

use crate::config::RuleConfig;
use crate::domain::member::{active_member_names, display_name, Member};
use crate::domain::types::{Part, Role, WarningLevel};
use crate::domain::warning::{RotationCandidate, Warning, WarningTarget};
use crate::domain::week::{prior_weeks, Draft, History, RoleAssignments, WeekRecord};
use crate::engine::stats::qualified_for_technical;
use crate::i18n;
use chrono::NaiveDate;
use std::cmp::Ordering;
use tracing::{debug, info, instrument};

/// 连续分配命中（按 场次/岗位/成员 合并）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuousHit {
    pub part: Part,
    pub role: Role,
    pub name: String,
    /// 命中的周偏移, 升序（1 = 上周）
    pub offsets: Vec<u32>,
}

impl ContinuousHit {
    pub fn min_offset(&self) -> u32 {
        self.offsets.first().copied().unwrap_or(0)
    }

    /// 上周命中 → error, 两周前 → warn, 其余 → info
    pub fn level(&self) -> WarningLevel {
        match self.min_offset() {
            1 => WarningLevel::Error,
            2 => WarningLevel::Warn,
            _ => WarningLevel::Info,
        }
    }
}

/// 检测连续分配
///
/// # 参数
/// - current: 本周分配（草案或历史最新一周）
/// - prior: 之前的周, 降序（第 0 个为 1 周前）
///
/// # 说明
/// 侧机位不区分席位, 只看同场次是否出现同一人
pub fn detect_continuous(
    current: (&RoleAssignments, &RoleAssignments),
    prior: &[(NaiveDate, &WeekRecord)],
) -> Vec<ContinuousHit> {
    let mut hits: Vec<ContinuousHit> = Vec::new();

    for part in Part::ALL {
        let assignments = match part {
            Part::Part1 => current.0,
            Part::Part2 => current.1,
        };

        for (role, _seat, name) in assignments.entries() {
            if hits
                .iter()
                .any(|h| h.part == part && h.role == role && h.name == name)
            {
                continue;
            }

            let offsets: Vec<u32> = prior
                .iter()
                .enumerate()
                .filter(|(_, (_, week))| week.holds(part, role, name))
                .map(|(i, _)| (i + 1) as u32)
                .collect();

            if !offsets.is_empty() {
                hits.push(ContinuousHit {
                    part,
                    role,
                    name: name.to_string(),
                    offsets,
                });
            }
        }
    }

    hits
}

// ==========================================
// WarningGenerator - 告警生成器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct WarningGenerator {
    config: RuleConfig,
}

impl WarningGenerator {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    /// 计算本周草案的全部告警
    ///
    /// # 参数
    /// - date: 本周日期（只看严格早于该日期的历史周）
    /// - draft: 本周草案
    /// - history: 历史记录
    /// - roster: 名册
    ///
    /// # 返回
    /// 连续分配 → 侧机位不足 → 轮换提示
    #[instrument(skip(self, draft, history, roster), fields(date = %date, weeks = history.len()))]
    pub fn compute(
        &self,
        date: NaiveDate,
        draft: &Draft,
        history: &History,
        roster: &[Member],
    ) -> Vec<Warning> {
        let mut warnings = self.continuous_warnings(date, draft, history);

        if self.config.side_shortage_check {
            warnings.extend(self.side_shortage_warnings(date, draft));
        }

        warnings.extend(self.rotation_warnings(date, draft, history, roster));

        info!(count = warnings.len(), "告警计算完成");
        warnings
    }

    // ==========================================
    // 连续分配
    // ==========================================

    fn continuous_warnings(&self, date: NaiveDate, draft: &Draft, history: &History) -> Vec<Warning> {
        let prior = prior_weeks(history, date, self.config.continuous_window);
        if prior.is_empty() {
            return Vec::new();
        }

        detect_continuous((&draft.part1, &draft.part2), &prior)
            .into_iter()
            .map(|hit| {
                let weeks = hit
                    .offsets
                    .iter()
                    .map(|o| weeks_ago_label(*o))
                    .collect::<Vec<_>>()
                    .join(", ");
                let prefix = if hit.offsets.len() > 1 {
                    i18n::t_with_args(
                        "warning.continuous_prefix",
                        &[("count", &hit.offsets.len().to_string())],
                    )
                } else {
                    String::new()
                };
                let message = i18n::t_with_args(
                    "warning.continuous",
                    &[
                        ("prefix", &prefix),
                        ("part", &hit.part.label()),
                        ("role", &hit.role.label()),
                        ("weeks", &weeks),
                    ],
                );

                debug!(part = %hit.part, role = %hit.role, name = %hit.name, offsets = ?hit.offsets, "连续分配");

                Warning {
                    id: format!("cont-{}-{}-{}", hit.part, hit.role.key(), hit.name),
                    level: hit.level(),
                    message,
                    target: Some(WarningTarget {
                        date: Some(date),
                        part: Some(hit.part),
                        role: Some(hit.role),
                        name: Some(hit.name.clone()),
                    }),
                    rotation_candidates: None,
                    week_offsets: hit.offsets,
                }
            })
            .collect()
    }

    // ==========================================
    // 侧机位不足
    // ==========================================

    fn side_shortage_warnings(&self, date: NaiveDate, draft: &Draft) -> Vec<Warning> {
        Part::ALL
            .iter()
            .filter(|part| draft.part(**part).filled_side_seats() < Role::Side.seats())
            .map(|part| Warning {
                id: format!("p{}-side-lack", part.index() + 1),
                level: WarningLevel::Warn,
                message: i18n::t_with_args(
                    "warning.side_shortage",
                    &[("part", &part.label()), ("role", &Role::Side.label())],
                ),
                target: Some(WarningTarget {
                    date: Some(date),
                    part: Some(*part),
                    role: Some(Role::Side),
                    name: None,
                }),
                rotation_candidates: None,
                week_offsets: Vec::new(),
            })
            .collect()
    }

    // ==========================================
    // 轮换提示
    // ==========================================

    /// 轮换提示
    ///
    /// 规则:
    /// - SW 只提示有资格者, 字幕不提示 SW 资格者
    /// - 草案中已担任该岗位者跳过, 上周刚担任者跳过
    /// - 窗口内从未担任者排最前, 其余按间隔周数降序
    fn rotation_warnings(
        &self,
        date: NaiveDate,
        draft: &Draft,
        history: &History,
        roster: &[Member],
    ) -> Vec<Warning> {
        let window = prior_weeks(history, date, self.config.rotation_window);
        if window.is_empty() {
            return Vec::new();
        }

        let qualified = qualified_for_technical(history);
        let active = active_member_names(roster);
        let mut warnings = Vec::new();
        let mut seen_roles: Vec<Role> = Vec::new();

        for role in self.config.rotation_roles.iter().copied() {
            if seen_roles.contains(&role) {
                continue;
            }
            seen_roles.push(role);

            let mut candidates: Vec<RotationCandidate> = active
                .iter()
                .filter(|name| match role {
                    Role::Technical => qualified.contains(name.as_str()),
                    Role::Subtitle => !qualified.contains(name.as_str()),
                    _ => true,
                })
                .filter(|name| {
                    !Part::ALL
                        .iter()
                        .any(|part| draft.holds(*part, role, name.as_str()))
                })
                .filter_map(|name| {
                    let weeks_since = window
                        .iter()
                        .position(|(_, week)| {
                            Part::ALL.iter().any(|part| week.holds(*part, role, name))
                        })
                        .map(|i| (i + 1) as u32);
                    if weeks_since == Some(1) {
                        return None;
                    }
                    Some(RotationCandidate {
                        name: name.clone(),
                        weeks_since,
                    })
                })
                .collect();

            if candidates.is_empty() {
                continue;
            }

            candidates.sort_by(compare_rotation);
            let total = candidates.len();
            candidates.truncate(self.config.rotation_candidate_limit);

            let names = candidates
                .iter()
                .map(|c| display_name(&c.name))
                .collect::<Vec<_>>()
                .join(", ");
            let suffix = if total > candidates.len() {
                i18n::t_with_args(
                    "warning.rotation_more",
                    &[("count", &(total - candidates.len()).to_string())],
                )
            } else {
                String::new()
            };

            debug!(role = %role, total, shown = candidates.len(), "轮换提示");

            warnings.push(Warning {
                id: format!("rotation-{}", role.key()),
                level: WarningLevel::Info,
                message: i18n::t_with_args(
                    "warning.rotation",
                    &[("role", &role.label()), ("names", &names), ("more", &suffix)],
                ),
                target: Some(WarningTarget {
                    role: Some(role),
                    ..WarningTarget::default()
                }),
                rotation_candidates: Some(candidates),
                week_offsets: Vec::new(),
            });
        }

        warnings
    }
}

/// 窗口外（None）最前, 其余按间隔降序; 同值保持名册顺序
fn compare_rotation(a: &RotationCandidate, b: &RotationCandidate) -> Ordering {
    match (a.weeks_since, b.weeks_since) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x),
    }
}

fn weeks_ago_label(offset: u32) -> String {
    if offset == 1 {
        i18n::t("warning.one_week_ago")
    } else {
        i18n::t_with_args("warning.weeks_ago", &[("weeks", &offset.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sunday(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap() + Duration::weeks(n)
    }

    fn members(names: &[&str]) -> Vec<Member> {
        names.iter().map(|n| Member::new(n, true)).collect()
    }

    fn week_with(fill: impl FnOnce(&mut WeekRecord)) -> WeekRecord {
        let mut week = WeekRecord::default();
        fill(&mut week);
        week
    }

    #[test]
    fn test_detect_continuous_merges_offsets() {
        let w1 = week_with(|w| w.part1.set(Role::Side, 1, "B"));
        let w2 = week_with(|w| w.part2.set(Role::Side, 0, "B"));
        let w3 = week_with(|w| w.part1.set(Role::Side, 0, "B"));
        let prior = vec![(sunday(3), &w1), (sunday(2), &w2), (sunday(1), &w3)];

        let mut current = RoleAssignments::default();
        current.set(Role::Side, 0, "B");
        let hits = detect_continuous((&current, &RoleAssignments::default()), &prior);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].offsets, vec![1, 3]);
        assert_eq!(hits[0].level(), WarningLevel::Error);
    }

    #[test]
    fn test_level_by_min_offset() {
        let hit = |offsets: Vec<u32>| ContinuousHit {
            part: Part::Part1,
            role: Role::Sketch,
            name: "A".to_string(),
            offsets,
        };
        assert_eq!(hit(vec![2, 3]).level(), WarningLevel::Warn);
        assert_eq!(hit(vec![3]).level(), WarningLevel::Info);
    }

    #[test]
    fn test_side_shortage() {
        let mut draft = Draft::default();
        draft.part1.set(Role::Side, 0, "A");
        draft.part1.set(Role::Side, 1, "B");
        draft.part2.set(Role::Side, 0, "C");

        let warnings = WarningGenerator::default().compute(sunday(0), &draft, &History::new(), &members(&["A"]));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].id, "p2-side-lack");
        assert_eq!(warnings[0].level, WarningLevel::Warn);
    }

    #[test]
    fn test_side_shortage_can_be_disabled() {
        let config = RuleConfig {
            side_shortage_check: false,
            ..RuleConfig::default()
        };
        let warnings = WarningGenerator::new(config).compute(sunday(0), &Draft::default(), &History::new(), &[]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_rotation_ordering_and_exclusions() {
        let mut history = History::new();
        // A: 3 周前速写, B: 上周速写, C: 从未, D: 2 周前速写
        history.insert(sunday(0), week_with(|w| w.part1.set(Role::Sketch, 0, "A")));
        history.insert(sunday(1), week_with(|w| w.part2.set(Role::Sketch, 0, "D")));
        history.insert(sunday(2), week_with(|w| w.part1.set(Role::Sketch, 0, "B")));

        let config = RuleConfig {
            rotation_roles: vec![Role::Sketch],
            side_shortage_check: false,
            ..RuleConfig::default()
        };
        let warnings = WarningGenerator::new(config).compute(
            sunday(3),
            &Draft::default(),
            &history,
            &members(&["A", "B", "C", "D"]),
        );

        let rotation = warnings.iter().find(|w| w.id == "rotation-스케치").unwrap();
        assert_eq!(rotation.level, WarningLevel::Info);
        let candidates = rotation.rotation_candidates.as_ref().unwrap();
        let order: Vec<(&str, Option<u32>)> = candidates
            .iter()
            .map(|c| (c.name.as_str(), c.weeks_since))
            .collect();
        assert_eq!(order, vec![("C", None), ("A", Some(3)), ("D", Some(2))]);
    }

    #[test]
    fn test_rotation_respects_technical_qualification() {
        let mut history = History::new();
        history.insert(sunday(0), week_with(|w| w.part1.set(Role::Technical, 0, "A")));
        history.insert(sunday(1), week_with(|_| {}));

        let config = RuleConfig {
            rotation_roles: vec![Role::Technical, Role::Subtitle],
            side_shortage_check: false,
            ..RuleConfig::default()
        };
        let warnings = WarningGenerator::new(config).compute(
            sunday(2),
            &Draft::default(),
            &history,
            &members(&["A", "B"]),
        );

        let names = |id: &str| -> Vec<String> {
            warnings
                .iter()
                .find(|w| w.id == id)
                .and_then(|w| w.rotation_candidates.clone())
                .unwrap_or_default()
                .into_iter()
                .map(|c| c.name)
                .collect()
        };
        assert_eq!(names("rotation-SW"), vec!["A".to_string()]);
        assert_eq!(names("rotation-자막"), vec!["B".to_string()]);
    }

    #[test]
    fn test_rotation_skipped_without_prior_weeks() {
        let mut history = History::new();
        history.insert(sunday(5), WeekRecord::default());
        let warnings = WarningGenerator::default().compute(sunday(5), &Draft::default(), &history, &members(&["A"]));
        assert!(warnings.iter().all(|w| !w.id.starts_with("rotation-")));
    }
}
