// ==========================================
// 周排班推荐引擎 - 公平性报告
// ==========================================
// 综合分 = 机会均等 40% + 岗位多样性 30% + 负荷均衡 20% + 连续回避 10%
// ==========================================

use crate::domain::types::{InsightCategory, InsightType, QualityLevel};
use serde::{Deserialize, Serialize};

/// 单项子分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScore {
    pub score: u32,   // 0-100
    pub weight: f64,  // 权重
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessBreakdown {
    pub opportunity: SubScore,
    pub diversity: SubScore,
    pub workload: SubScore,
    pub consecutive: SubScore,
}

impl FairnessBreakdown {
    pub fn iter(&self) -> impl Iterator<Item = &SubScore> {
        [&self.opportunity, &self.diversity, &self.workload, &self.consecutive].into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessInsight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub category: InsightCategory,
    pub message: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessReport {
    pub overall_score: u32,
    pub level: QualityLevel,
    pub breakdown: FairnessBreakdown,
    pub insights: Vec<FairnessInsight>,
}
