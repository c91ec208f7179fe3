// ==========================================
// 染整外协台账系统 - 驾驶舱 API
// ==========================================
// 职责: 封装引擎输出,提供面向前端的只读聚合视图
// 架构: API 层 → 引擎层 (BatchStateResolver / LedgerAggregator
//       / OutlierDetector),本层只做分组与排序,不产生新计算
// 红线: 每个接口对同一快照可独立重放,结果一致
// ==========================================

use crate::domain::batch::Batch;
use crate::domain::ledger::LedgerCell;
use crate::engine::{BatchStateResolver, LedgerAggregator, OutlierDetector};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// ==========================================
// 响应 DTO
// ==========================================

/// 全局总量(当前态)
///
/// 口径说明: 直接对 BatchSummary 求和,不经过月度台账 ——
/// 台账结转处的零钳制不影响本视图,存在异常数据时
/// "当前态"与"历史台账"允许出现口径差异(有意为之)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallTotals {
    pub sent_total: f64,        // 发出合计
    pub received_total: f64,    // 回厂合计
    pub scrap_total: f64,       // 报损合计
    pub outstanding_total: f64, // 在外合计 Σ sent*remaining_fraction
    pub batch_count: usize,     // 批次数
    pub completed_count: usize, // 完结批次数
    pub anomaly_count: usize,   // 带异常标记的批次数
}

/// 单维度汇总(染厂/客户)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionSummary {
    pub dimension_key: String,
    pub sent_kg: f64,
    pub received_kg: f64,
    pub scrap_kg: f64,
    pub scrap_pct: f64,                // 报损率(排名口径)
    pub closing_stock: f64,            // 末期期末在外
    pub avg_cycle_days: Option<f64>,   // 平均回货周期
    pub completed_cycle_count: usize,  // 周期样本数
}

/// 超期批次条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierEntry {
    pub batch_id: String,
    pub client_id: String,
    pub facility: String,
    pub cycle_time_days: i64,
}

/// 超期检测报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierReport {
    pub sample_count: usize,      // 参与检测的周期样本数
    pub threshold_days: f64,      // 判定阈值(样本不足为 +∞)
    pub entries: Vec<OutlierEntry>, // 超期批次,按周期降序
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================

/// 驾驶舱 API
///
/// 职责:
/// 1. 全局总量(当前态,直接汇总批次摘要)
/// 2. 维度汇总与报损率排名
/// 3. 月度时间线(含已结转的期初/期末)
/// 4. 超期批次检测
pub struct DashboardApi;

impl DashboardApi {
    // ==========================================
    // 维度取键便捷入口
    // ==========================================

    /// 按染厂维度构建台账
    pub fn facility_ledger(batches: &[Batch]) -> Vec<LedgerCell> {
        LedgerAggregator::build_ledger(batches, &|b: &Batch| b.facility.clone())
    }

    /// 按客户维度构建台账
    pub fn client_ledger(batches: &[Batch]) -> Vec<LedgerCell> {
        LedgerAggregator::build_ledger(batches, &|b: &Batch| b.client_id.clone())
    }

    // ==========================================
    // 聚合查询接口
    // ==========================================

    /// 全局总量(跨全部维度,独立于月度台账)
    pub fn overall_totals(batches: &[Batch]) -> OverallTotals {
        let mut totals = OverallTotals {
            sent_total: 0.0,
            received_total: 0.0,
            scrap_total: 0.0,
            outstanding_total: 0.0,
            batch_count: batches.len(),
            completed_count: 0,
            anomaly_count: 0,
        };

        for batch in batches {
            let summary = BatchStateResolver::resolve(batch);
            totals.sent_total += summary.sent_total;
            totals.received_total += summary.received_total;
            totals.scrap_total += summary.scrap_quantity;
            // 在外量 = 发出 × 未回比例(与守恒口径一致)
            totals.outstanding_total += summary.sent_total * summary.remaining_fraction;
            if summary.is_complete {
                totals.completed_count += 1;
            }
            if !summary.anomalies.is_empty() {
                totals.anomaly_count += 1;
            }
        }

        totals
    }

    /// 维度汇总,按报损率降序排名
    ///
    /// # 参数
    /// - ledger: build_ledger 的输出(本层只分组排序)
    pub fn by_dimension(ledger: &[LedgerCell]) -> Vec<DimensionSummary> {
        let mut grouped: BTreeMap<&str, DimensionSummary> = BTreeMap::new();

        for cell in ledger {
            let entry = grouped
                .entry(cell.dimension_key.as_str())
                .or_insert_with(|| DimensionSummary {
                    dimension_key: cell.dimension_key.clone(),
                    sent_kg: 0.0,
                    received_kg: 0.0,
                    scrap_kg: 0.0,
                    scrap_pct: 0.0,
                    closing_stock: 0.0,
                    avg_cycle_days: None,
                    completed_cycle_count: 0,
                });
            entry.sent_kg += cell.sent_kg;
            entry.received_kg += cell.received_kg;
            entry.scrap_kg += cell.scrap_kg;
            // 台账按 (维度, 月份) 升序,最后一个单元即末期
            entry.closing_stock = cell.closing_stock;
            entry.completed_cycle_count += cell.completed_cycle_times.len();
        }

        let mut summaries: Vec<DimensionSummary> = grouped.into_values().collect();
        for summary in &mut summaries {
            summary.scrap_pct = if summary.sent_kg > 0.0 {
                summary.scrap_kg / summary.sent_kg
            } else {
                0.0
            };
        }

        // 周期均值需要原始样本,单独一遍
        for summary in &mut summaries {
            let (sum, count) = ledger
                .iter()
                .filter(|c| c.dimension_key == summary.dimension_key)
                .flat_map(|c| c.completed_cycle_times.iter())
                .fold((0i64, 0usize), |(s, n), v| (s + v, n + 1));
            if count > 0 {
                summary.avg_cycle_days = Some(sum as f64 / count as f64);
            }
        }

        // 报损率降序,同率按维度键升序保证确定性
        summaries.sort_by(|a, b| {
            b.scrap_pct
                .partial_cmp(&a.scrap_pct)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.dimension_key.cmp(&b.dimension_key))
        });
        summaries
    }

    /// 月度时间线: 按 (月份, 维度) 升序的台账单元
    /// 期初/期末结存已在聚合时嵌入,无需再算
    pub fn monthly_timeline(ledger: &[LedgerCell]) -> Vec<LedgerCell> {
        let mut timeline = ledger.to_vec();
        timeline.sort_by(|a, b| {
            a.period
                .cmp(&b.period)
                .then_with(|| a.dimension_key.cmp(&b.dimension_key))
        });
        timeline
    }

    /// 超期批次检测
    ///
    /// # 流程
    /// 1. 解析全部批次,收集非空回货周期
    /// 2. 计算 Tukey 围栏阈值(样本 <4 为 +∞,即全部正常)
    /// 3. 严格大于阈值的批次入列,按周期降序
    pub fn outliers(batches: &[Batch]) -> OutlierReport {
        let mut sources: Vec<OutlierEntry> = Vec::new();
        for batch in batches {
            let summary = BatchStateResolver::resolve(batch);
            if let Some(cycle) = summary.cycle_time_days {
                sources.push(OutlierEntry {
                    batch_id: summary.batch_id,
                    client_id: summary.client_id,
                    facility: summary.facility,
                    cycle_time_days: cycle,
                });
            }
        }

        let samples: Vec<f64> = sources.iter().map(|e| e.cycle_time_days as f64).collect();
        let threshold_days = OutlierDetector::threshold(&samples);

        let mut entries: Vec<OutlierEntry> = OutlierDetector::classify(&samples, threshold_days)
            .into_iter()
            .map(|i| sources[i].clone())
            .collect();
        entries.sort_by(|a, b| {
            b.cycle_time_days
                .cmp(&a.cycle_time_days)
                .then_with(|| a.batch_id.cmp(&b.batch_id))
        });

        OutlierReport {
            sample_count: samples.len(),
            threshold_days,
            entries,
        }
    }
}
