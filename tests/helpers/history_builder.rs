// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use roster_engine::domain::week::{Absence, Draft, History, RoleAssignments, WeekRecord};
use roster_engine::{Member, Part, Role};

/// 基准周日 2024-09-01 之后第 n 周
pub fn sunday(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).unwrap() + Duration::weeks(n)
}

pub fn roster(names: &[&str]) -> Vec<Member> {
    names.iter().map(|n| Member::new(n, true)).collect()
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}

// ==========================================
// WeekBuilder - 单周记录构建器
// ==========================================

#[derive(Default)]
pub struct WeekBuilder {
    part1: RoleAssignments,
    part2: RoleAssignments,
    absences: Vec<Absence>,
}

impl WeekBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(mut self, part: Part, role: Role, name: &str) -> Self {
        self.slot(part).set(role, 0, name);
        self
    }

    pub fn side(mut self, part: Part, seat: usize, name: &str) -> Self {
        self.slot(part).set(Role::Side, seat, name);
        self
    }

    pub fn absent(mut self, name: &str) -> Self {
        self.absences.push(Absence {
            name: name.to_string(),
            reason: None,
        });
        self
    }

    pub fn build(self) -> WeekRecord {
        WeekRecord {
            part1: self.part1,
            part2: self.part2,
            absences: self.absences,
        }
    }

    /// 作为本周草案（忽略请假）
    pub fn draft(self) -> Draft {
        Draft {
            part1: self.part1,
            part2: self.part2,
        }
    }

    fn slot(&mut self, part: Part) -> &mut RoleAssignments {
        match part {
            Part::Part1 => &mut self.part1,
            Part::Part2 => &mut self.part2,
        }
    }
}

// ==========================================
// HistoryBuilder - 历史构建器
// ==========================================

#[derive(Default)]
pub struct HistoryBuilder {
    weeks: History,
}

impl HistoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第 n 周（相对 2024-09-01）
    pub fn week(mut self, n: i64, week: WeekBuilder) -> Self {
        self.weeks.insert(sunday(n), week.build());
        self
    }

    pub fn build(self) -> History {
        self.weeks
    }
}
