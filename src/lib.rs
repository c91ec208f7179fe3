// ==========================================
// 染整外协台账系统 - 核心库
// ==========================================
// 系统定位: 外协对账与台账核心引擎(纯计算)
// 数据流: 批次快照 → BatchStateResolver → LedgerAggregator
//         + OutlierDetector → DashboardApi → 前端协作方
// 红线: 引擎不做 I/O、不做持久化、不做校验 —— 异常是数据,
//       照算并标记,由上游/前端决定如何处置
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与读模型
pub mod domain;

// 引擎层 - 对账与聚合规则
pub mod engine;

// API 层 - 驾驶舱查询
pub mod api;

// 导入层 - 快照装载(文件协作方)
pub mod importer;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{AnomalyFlag, Batch, BatchSummary, LedgerCell, PeriodKey, TransferEvent};

// 引擎
pub use engine::{BatchStateResolver, LedgerAggregator, OutlierDetector};

// 驾驶舱
pub use api::{DashboardApi, DimensionSummary, OutlierEntry, OutlierReport, OverallTotals};

// 导入
pub use importer::{ImportError, ImportResult, SnapshotImporter};

/// 库版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
