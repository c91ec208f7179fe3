// ==========================================
// 染整外协台账系统 - 派生读模型
// ==========================================
// 职责: 定义批次摘要与台账单元(引擎输出,只读)
// 红线: 派生结构不落库、无独立身份,每次查询从快照全量重算
// ==========================================

use crate::domain::types::{AnomalyFlag, PeriodKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// BatchSummary - 批次摘要
// ==========================================
// BatchStateResolver 输出
// 注意: remaining_fraction 不做钳制 —— 负值/超 1 的值是
//       有意义的数据异常信号,由下游决定是否呈现
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    // ===== 追溯字段 =====
    pub batch_id: String,  // 关联批次
    pub facility: String,  // 染厂
    pub client_id: String, // 客户

    // ===== 量值口径 =====
    pub sent_total: f64,         // 发出合计(事件合计,否则历史标量)
    pub received_total: f64,     // 回厂合计(同上)
    pub scrap_quantity: f64,     // 报损量(批次记录透传)
    pub remaining_fraction: f64, // 未回比例 (sent-received)/sent;未发出按 1.0

    // ===== 完结与周期 =====
    pub is_complete: bool,               // 完结判定(三路 OR)
    pub cycle_time_days: Option<i64>,    // 回货周期(整天),仅完结批次可得
    pub earliest_sent_date: Option<NaiveDate>, // 最早发出日期
    pub last_receive_date: Option<NaiveDate>,  // 最后回厂日期

    // ===== 异常标记 =====
    pub anomalies: Vec<AnomalyFlag>, // 数据异常(照算并标记,不报错)
}

// ==========================================
// LedgerCell - 台账单元
// ==========================================
// LedgerAggregator 输出,键为 (维度, 月份)
// 结转口径: closing_stock 为本期原始值(可为负,暴露超回异常),
//           下期 opening_stock = max(0, 上期 closing_stock)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerCell {
    // ===== 键 =====
    pub dimension_key: String, // 维度键(染厂或客户)
    pub period: PeriodKey,     // 所属月份

    // ===== 流量 =====
    pub sent_kg: f64,     // 本期发出
    pub received_kg: f64, // 本期回厂(按单条回厂事件归月)
    pub scrap_kg: f64,    // 本期报损(归最后回厂月,无回厂归发出月)

    // ===== 结存 =====
    pub opening_stock: f64, // 期初在外(上期结转,≥0)
    pub closing_stock: f64, // 期末在外(原始值,可为负)

    // ===== 周期样本 =====
    pub completed_cycle_times: Vec<i64>, // 归属本期的完结周期(天)
    pub avg_cycle_days: Option<f64>,     // 平均周期(样本为空为 None)

    // ===== 审计计数 =====
    pub batch_count: usize,          // 触及本单元的批次数
    pub sent_batch_count: usize,     // 发出归属本期的批次数
    pub received_batch_count: usize, // 本期有回厂事件的批次数
    pub scrap_batch_count: usize,    // 报损归属本期的批次数

    // ===== 派生比率 =====
    pub scrap_pct: f64, // 报损率 scrap/sent(发出为 0 时取 0)
}
