// ==========================================
// 集成测试辅助模块
// ==========================================

pub mod history_builder;
