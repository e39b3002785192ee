// ==========================================
// 周排班推荐引擎 - 应用快照
// ==========================================
// 格式: { "weeks": { "YYYY-MM-DD": WeekRecord }, "members": [Member] }
// 用途: CLI 读取调用方导出的数据, 引擎本身不做持久化
// ==========================================

use crate::domain::member::Member;
use crate::domain::week::{is_sunday, History};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("快照文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("快照 JSON 解析失败: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSnapshot {
    #[serde(default)]
    pub weeks: History,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl AppSnapshot {
    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let raw = fs::read_to_string(path)?;
        let snapshot = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            weeks = snapshot.weeks.len(),
            members = snapshot.members.len(),
            "快照加载完成"
        );
        Ok(snapshot)
    }

    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(raw)?;
        let non_sunday = snapshot.weeks.keys().filter(|d| !is_sunday(**d)).count();
        if non_sunday > 0 {
            warn!(count = non_sunday, "快照包含非周日的周记录");
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
