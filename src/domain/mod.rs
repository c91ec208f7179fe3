// ==========================================
// 染整外协台账系统 - 领域层
// ==========================================
// 职责: 快照记录与派生读模型的类型定义
// 红线: 领域层只有数据,业务规则全部在引擎层
// ==========================================

pub mod batch;
pub mod ledger;
pub mod types;

pub use batch::{Batch, TransferEvent};
pub use ledger::{BatchSummary, LedgerCell};
pub use types::{AnomalyFlag, PeriodKey, TransferDirection};
