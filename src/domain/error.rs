// ==========================================
// 周排班推荐引擎 - 领域层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 只有调用方传入非法槽位描述时才报错, 数据层面的
//       "无候选人 / 未填满" 属于正常输出, 不走错误通道
// ==========================================

use thiserror::Error;

/// 领域层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("非法槽位: part={part}, role={role}, index={index:?}")]
    InvalidSlot {
        part: String,
        role: String,
        index: Option<u8>,
    },

    #[error("未知岗位: {0}")]
    UnknownRole(String),

    #[error("未知场次: {0}")]
    UnknownPart(String),
}
