// ==========================================
// 染整外协台账系统 - API 层
// ==========================================
// 职责: 面向前端的只读查询接口
// 红线: 本层不产生新计算,只组合引擎输出
// ==========================================

pub mod dashboard_api;

pub use dashboard_api::{
    DashboardApi, DimensionSummary, OutlierEntry, OutlierReport, OverallTotals,
};
