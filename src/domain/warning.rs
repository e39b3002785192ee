// ==========================================
// 周排班推荐引擎 - 规则告警
// ==========================================

use crate::domain::types::{Part, Role, WarningLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 告警定位（全部可选）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// 轮换候选人
///
/// `weeks_since = None` 表示窗口内从未担任（排在最前）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationCandidate {
    pub name: String,
    pub weeks_since: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub id: String,
    pub level: WarningLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<WarningTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_candidates: Option<Vec<RotationCandidate>>,
    /// 连续分配命中的周偏移（1 = 上周）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub week_offsets: Vec<u32>,
}
