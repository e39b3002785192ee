// ==========================================
// 周排班推荐引擎 - 领域类型定义
// ==========================================
// 职责: 场次 / 岗位 / 告警等级 / 质量等级 等基础枚举
// 序列化格式: 与前端 JSON 保持一致（岗位键为韩文原始键）
// ==========================================

use crate::domain::error::DomainError;
use crate::i18n;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

// ==========================================
// 场次 (Part)
// ==========================================
// 每周活动分为前后两场, 每场都有完整的一套岗位
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Part {
    Part1,
    Part2,
}

impl Part {
    pub const ALL: [Part; 2] = [Part::Part1, Part::Part2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Part::Part1 => "part1",
            Part::Part2 => "part2",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Part::Part1 => 0,
            Part::Part2 => 1,
        }
    }

    /// 本地化显示名（"1부" / "Part 1"）
    pub fn label(&self) -> String {
        i18n::t(&format!("part.{}", self.as_str()))
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Part {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "part1" | "1" | "1부" => Ok(Part::Part1),
            "part2" | "2" | "2부" => Ok(Part::Part2),
            other => Err(DomainError::UnknownPart(other.to_string())),
        }
    }
}

// ==========================================
// 岗位 (Role)
// ==========================================
// 五类岗位; 只有 Side 有两个席位
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "SW")]
    Technical,
    #[serde(rename = "자막")]
    Subtitle,
    #[serde(rename = "고정")]
    FixedCamera,
    #[serde(rename = "사이드")]
    Side,
    #[serde(rename = "스케치")]
    Sketch,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Technical,
        Role::Subtitle,
        Role::FixedCamera,
        Role::Side,
        Role::Sketch,
    ];

    /// 非技术岗位（角色多样性统计范围）
    pub const NON_TECHNICAL: [Role; 4] =
        [Role::Subtitle, Role::FixedCamera, Role::Side, Role::Sketch];

    /// 原始数据键
    pub fn key(&self) -> &'static str {
        match self {
            Role::Technical => "SW",
            Role::Subtitle => "자막",
            Role::FixedCamera => "고정",
            Role::Side => "사이드",
            Role::Sketch => "스케치",
        }
    }

    /// ASCII 标识（用于告警 ID / 本地化键）
    pub fn code(&self) -> &'static str {
        match self {
            Role::Technical => "sw",
            Role::Subtitle => "subtitle",
            Role::FixedCamera => "fixed_camera",
            Role::Side => "side",
            Role::Sketch => "sketch",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Role::Technical => 0,
            Role::Subtitle => 1,
            Role::FixedCamera => 2,
            Role::Side => 3,
            Role::Sketch => 4,
        }
    }

    /// 每场席位数
    pub fn seats(&self) -> usize {
        match self {
            Role::Side => 2,
            _ => 1,
        }
    }

    pub fn label(&self) -> String {
        i18n::t(&format!("role.{}", self.code()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        match raw.to_lowercase().as_str() {
            "sw" | "technical" | "tech" => Ok(Role::Technical),
            "자막" | "subtitle" => Ok(Role::Subtitle),
            "고정" | "fixed" | "fixed_camera" | "fixed-camera" => Ok(Role::FixedCamera),
            "사이드" | "side" => Ok(Role::Side),
            "스케치" | "sketch" => Ok(Role::Sketch),
            _ => Err(DomainError::UnknownRole(raw.to_string())),
        }
    }
}

// ==========================================
// PerRole - 按岗位索引的定长表
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerRole<T>([T; 5]);

impl<T> PerRole<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
        Role::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Role> for PerRole<T> {
    type Output = T;

    fn index(&self, role: Role) -> &T {
        &self.0[role.index()]
    }
}

impl<T> IndexMut<Role> for PerRole<T> {
    fn index_mut(&mut self, role: Role) -> &mut T {
        &mut self.0[role.index()]
    }
}

// ==========================================
// 告警等级 (Warning Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Info,
    Warn,
    Error,
}

impl WarningLevel {
    /// 排序优先级（数值越小越靠前）
    pub fn priority(&self) -> u8 {
        match self {
            WarningLevel::Error => 0,
            WarningLevel::Warn => 1,
            WarningLevel::Info => 2,
        }
    }
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningLevel::Info => write!(f, "info"),
            WarningLevel::Warn => write!(f, "warn"),
            WarningLevel::Error => write!(f, "error"),
        }
    }
}

// ==========================================
// 质量等级 (草案评分 / 公平性共用)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// 等级阈值（分数 >= 阈值即归入该等级）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelThresholds {
    pub excellent: u32,
    pub good: u32,
    pub fair: u32,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            excellent: 85,
            good: 70,
            fair: 55,
        }
    }
}

impl QualityLevel {
    pub fn classify(score: u32, thresholds: &LevelThresholds) -> Self {
        if score >= thresholds.excellent {
            QualityLevel::Excellent
        } else if score >= thresholds.good {
            QualityLevel::Good
        } else if score >= thresholds.fair {
            QualityLevel::Fair
        } else {
            QualityLevel::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Excellent => "excellent",
            QualityLevel::Good => "good",
            QualityLevel::Fair => "fair",
            QualityLevel::Poor => "poor",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 公平性洞察类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Issue,
    Suggestion,
    Positive,
}

impl InsightType {
    /// 展示顺序: issue → suggestion → positive
    pub fn rank(&self) -> u8 {
        match self {
            InsightType::Issue => 0,
            InsightType::Suggestion => 1,
            InsightType::Positive => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Opportunity,
    Diversity,
    Workload,
    Consecutive,
}
