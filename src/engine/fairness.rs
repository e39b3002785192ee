// ==========================================
// 周排班推荐引擎 - 公平性评分
// ==========================================
// 职责: 全量历史的加权综合公平指数 + 定性洞察
// 子项: 机会均等 40% / 岗位多样性 30% / 负荷均衡 20% / 连续回避 10%
// 输入: History + 名册（仅在岗成员参与）
// 输出: FairnessReport
// ==========================================
// 注: 空历史视为完全公平（100 分）
// ==========================================

mod core;
mod insights;


pub use self::core::{FairnessScorer, MemberFairness};
