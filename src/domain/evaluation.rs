// ==========================================
// 周排班推荐引擎 - 草案评估结果
// ==========================================

use crate::domain::slot::RoleSlot;
use crate::domain::types::QualityLevel;
use serde::{Deserialize, Serialize};

/// 单槽评估
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSlotScore {
    pub slot: RoleSlot,
    pub assigned_name: Option<String>,
    pub score: Option<i32>,      // 未分配为 None
    pub max_possible_score: i32, // 本槽最高可达分
    pub optimal_name: Option<String>,
    pub is_optimal: bool,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEvaluation {
    pub overall_score: u32, // 0-100
    pub level: QualityLevel,
    pub filled_slots: usize,
    pub total_slots: usize,
    pub slot_scores: Vec<DraftSlotScore>,
    pub summary: String,
}

impl DraftEvaluation {
    /// 已填且最优的槽位数
    pub fn optimal_count(&self) -> usize {
        self.slot_scores
            .iter()
            .filter(|s| s.assigned_name.is_some() && s.is_optimal)
            .count()
    }

    /// 已填但可改进的槽位数
    pub fn suboptimal_count(&self) -> usize {
        self.slot_scores
            .iter()
            .filter(|s| s.assigned_name.is_some() && !s.is_optimal)
            .count()
    }
}
