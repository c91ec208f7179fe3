// ==========================================
// 染整外协台账系统 - 引擎层
// ==========================================
// 职责: 对账与聚合的全部业务规则
// 红线: 引擎是纯函数 —— 无 I/O、无共享可变状态,
//       每次调用对传入快照全量重算(正确性只依赖确定性)
// ==========================================

pub mod batch_resolver;
pub mod ledger;
pub mod outlier;

// 重导出核心引擎
pub use batch_resolver::BatchStateResolver;
pub use ledger::LedgerAggregator;
pub use outlier::OutlierDetector;
