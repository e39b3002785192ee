// ==========================================
// 周排班推荐引擎 - 周记录 / 历史 / 草案
// ==========================================
// 输入契约: History = { "YYYY-MM-DD": WeekRecord }
// 岗位 JSON 键保持原始键: SW / 자막 / 고정 / 사이드 / 스케치
// 空字符串 = 未分配
// ==========================================

use crate::domain::slot::{RoleSlot, SLOT_ORDER, TOTAL_SLOTS};
use crate::domain::types::{Part, Role};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// RoleAssignments - 单场次岗位分配
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignments {
    #[serde(rename = "SW", default)]
    pub technical: String,
    #[serde(rename = "자막", default)]
    pub subtitle: String,
    #[serde(rename = "고정", default)]
    pub fixed_camera: String,
    #[serde(rename = "사이드", default)]
    pub side: [String; 2],
    #[serde(rename = "스케치", default)]
    pub sketch: String,
}

impl RoleAssignments {
    /// 读取指定岗位/席位的成员名（已去除首尾空白, 空串表示未分配）
    pub fn name_at(&self, role: Role, seat: usize) -> &str {
        let raw = match role {
            Role::Technical => &self.technical,
            Role::Subtitle => &self.subtitle,
            Role::FixedCamera => &self.fixed_camera,
            Role::Sketch => &self.sketch,
            Role::Side => match self.side.get(seat) {
                Some(name) => name,
                None => return "",
            },
        };
        raw.trim()
    }

    pub fn set(&mut self, role: Role, seat: usize, name: &str) {
        let value = name.trim().to_string();
        match role {
            Role::Technical => self.technical = value,
            Role::Subtitle => self.subtitle = value,
            Role::FixedCamera => self.fixed_camera = value,
            Role::Sketch => self.sketch = value,
            Role::Side => {
                if let Some(cell) = self.side.get_mut(seat) {
                    *cell = value;
                }
            }
        }
    }

    /// 所有已填席位 (岗位, 席位, 姓名)
    pub fn entries(&self) -> Vec<(Role, usize, &str)> {
        let mut out = Vec::with_capacity(6);
        for role in Role::ALL {
            for seat in 0..role.seats() {
                let name = self.name_at(role, seat);
                if !name.is_empty() {
                    out.push((role, seat, name));
                }
            }
        }
        out
    }

    /// 该成员是否担任此岗位（Side 不区分席位）
    pub fn holds(&self, role: Role, name: &str) -> bool {
        (0..role.seats()).any(|seat| self.name_at(role, seat) == name)
    }

    pub fn filled_side_seats(&self) -> usize {
        (0..Role::Side.seats())
            .filter(|seat| !self.name_at(Role::Side, *seat).is_empty())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

// ==========================================
// WeekRecord - 历史周记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absence {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRecord {
    #[serde(default)]
    pub part1: RoleAssignments,
    #[serde(default)]
    pub part2: RoleAssignments,
    #[serde(default)]
    pub absences: Vec<Absence>,
}

impl WeekRecord {
    pub fn part(&self, part: Part) -> &RoleAssignments {
        match part {
            Part::Part1 => &self.part1,
            Part::Part2 => &self.part2,
        }
    }

    pub fn part_mut(&mut self, part: Part) -> &mut RoleAssignments {
        match part {
            Part::Part1 => &mut self.part1,
            Part::Part2 => &mut self.part2,
        }
    }

    pub fn is_absent(&self, name: &str) -> bool {
        self.absences.iter().any(|a| a.name.trim() == name)
    }

    pub fn holds(&self, part: Part, role: Role, name: &str) -> bool {
        self.part(part).holds(role, name)
    }

    pub fn name_at(&self, slot: &RoleSlot) -> &str {
        self.part(slot.part).name_at(slot.role, slot.seat())
    }
}

/// 历史记录: 日期升序
pub type History = BTreeMap<NaiveDate, WeekRecord>;

/// 周记录约定以周日为键
pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// 草案日期之前（严格早于）的最近 n 周, 按日期降序
///
/// # 返回
/// 第 0 个元素即 "1 周前"
pub fn prior_weeks(history: &History, date: NaiveDate, n: usize) -> Vec<(NaiveDate, &WeekRecord)> {
    history
        .range(..date)
        .rev()
        .take(n)
        .map(|(d, w)| (*d, w))
        .collect()
}

// ==========================================
// Draft - 待确认的本周草案
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub part1: RoleAssignments,
    #[serde(default)]
    pub part2: RoleAssignments,
}

/// 草案填充情况
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftAnalysis {
    pub filled_count: usize,
    pub total_slots: usize,
    pub empty_slots: Vec<RoleSlot>,
    pub assigned_names: Vec<String>,
}

impl Draft {
    pub fn from_week(week: &WeekRecord) -> Self {
        Self {
            part1: week.part1.clone(),
            part2: week.part2.clone(),
        }
    }

    pub fn part(&self, part: Part) -> &RoleAssignments {
        match part {
            Part::Part1 => &self.part1,
            Part::Part2 => &self.part2,
        }
    }

    pub fn name_at(&self, slot: &RoleSlot) -> &str {
        self.part(slot.part).name_at(slot.role, slot.seat())
    }

    pub fn set(&mut self, slot: &RoleSlot, name: &str) {
        let assignments = match slot.part {
            Part::Part1 => &mut self.part1,
            Part::Part2 => &mut self.part2,
        };
        assignments.set(slot.role, slot.seat(), name);
    }

    pub fn holds(&self, part: Part, role: Role, name: &str) -> bool {
        self.part(part).holds(role, name)
    }

    /// 统计已填/空槽位, 按排班顺序列出空槽
    pub fn analyze(&self) -> DraftAnalysis {
        let mut empty_slots = Vec::new();
        let mut assigned_names: Vec<String> = Vec::new();

        for slot in SLOT_ORDER.iter() {
            let name = self.name_at(slot);
            if name.is_empty() {
                empty_slots.push(*slot);
            } else if !assigned_names.iter().any(|n| n == name) {
                assigned_names.push(name.to_string());
            }
        }

        DraftAnalysis {
            filled_count: TOTAL_SLOTS - empty_slots.len(),
            total_slots: TOTAL_SLOTS,
            empty_slots,
            assigned_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_week_record_json_contract() {
        let json = r#"{
            "part1": {"SW": "A", "자막": "B", "고정": "", "사이드": ["C", " D "], "스케치": ""},
            "part2": {"SW": "", "자막": "", "고정": "E", "사이드": ["", ""], "스케치": "F"},
            "absences": [{"name": "G", "reason": "출장"}]
        }"#;
        let week: WeekRecord = serde_json::from_str(json).unwrap();

        assert_eq!(week.part1.name_at(Role::Technical, 0), "A");
        assert_eq!(week.part1.name_at(Role::Side, 1), "D");
        assert!(week.holds(Part::Part1, Role::Side, "D"));
        assert!(!week.holds(Part::Part2, Role::Side, "D"));
        assert!(week.is_absent("G"));
        assert_eq!(week.part1.filled_side_seats(), 2);
        assert_eq!(week.part2.filled_side_seats(), 0);
        assert_eq!(week.part2.entries().len(), 2);
    }

    #[test]
    fn test_prior_weeks_strictly_before_and_descending() {
        let mut history = History::new();
        for d in ["2024-01-07", "2024-01-14", "2024-01-21", "2024-01-28"] {
            history.insert(date(d), WeekRecord::default());
        }

        let prior = prior_weeks(&history, date("2024-01-28"), 2);
        let dates: Vec<NaiveDate> = prior.iter().map(|(d, _)| *d).collect();
        assert_eq!(dates, vec![date("2024-01-21"), date("2024-01-14")]);

        assert!(prior_weeks(&history, date("2024-01-07"), 3).is_empty());
        assert!(is_sunday(date("2024-01-07")));
        assert!(!is_sunday(date("2024-01-08")));
    }

    #[test]
    fn test_draft_analyze() {
        let mut draft = Draft::default();
        draft.set(&SLOT_ORDER[0], "A");
        draft.set(&SLOT_ORDER[2], "B");
        draft.set(&SLOT_ORDER[3], "A");

        let analysis = draft.analyze();
        assert_eq!(analysis.filled_count, 3);
        assert_eq!(analysis.empty_slots.len(), 9);
        assert_eq!(analysis.empty_slots[0], SLOT_ORDER[1]);
        assert_eq!(analysis.assigned_names, vec!["A", "B"]);
    }
}
