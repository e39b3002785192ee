// ==========================================
// 周排班推荐引擎 - 排班方案领域模型
// ==========================================
// 职责: 候选评分 / 单槽推荐 / 整周方案
// 红线: 方案只是建议, 引擎不落库、不修改输入
// ==========================================

use crate::domain::slot::RoleSlot;
use crate::domain::week::Draft;
use serde::{Deserialize, Serialize};

// ==========================================
// CandidateScore - 候选人评分
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateScore {
    pub name: String,         // 成员名（身份）
    pub display_name: String, // 去掉期数前缀的显示名
    pub score: i32,           // 四舍五入后的整数分
    pub reasons: Vec<String>, // 可解释性原因
}

// ==========================================
// SlotRecommendation - 单槽推荐
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecommendation {
    pub slot: RoleSlot,
    pub recommended: Option<CandidateScore>,
    pub alternatives: Vec<CandidateScore>, // 最多 5 个
    #[serde(default)]
    pub prefilled: bool, // 草案已填, 保留原分配
}

// ==========================================
// Plan - 整周方案
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub filled_count: usize,
    pub total_slots: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub slots: Vec<SlotRecommendation>, // 固定排班顺序
    pub summary: PlanSummary,
}

impl Plan {
    pub fn slot(&self, slot: &RoleSlot) -> Option<&SlotRecommendation> {
        self.slots.iter().find(|s| s.slot == *slot)
    }

    /// 推荐人姓名（未填返回 None）
    pub fn recommended_name(&self, slot: &RoleSlot) -> Option<&str> {
        self.slot(slot)
            .and_then(|s| s.recommended.as_ref())
            .map(|c| c.name.as_str())
    }

    /// 把方案的推荐人写回草案结构, 方便调用方"一键应用"
    pub fn to_draft(&self) -> Draft {
        let mut draft = Draft::default();
        for rec in &self.slots {
            if let Some(candidate) = &rec.recommended {
                draft.set(&rec.slot, &candidate.name);
            }
        }
        draft
    }
}
