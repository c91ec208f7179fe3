// ==========================================
// 染整外协台账系统 - 月度台账聚合引擎
// ==========================================
// 职责: 把批次快照按 (维度, 月份) 分桶,算流量与结存
// 红线: 确定性 —— 同一快照两次聚合输出逐字节一致
//       (BTreeMap 累加 + 两遍扫描,无哈希迭代顺序依赖)
// 红线: 结存钳制只发生在结转一步,本期 closing_stock 保留原始值
// ==========================================

use crate::domain::batch::Batch;
use crate::domain::ledger::LedgerCell;
use crate::domain::types::PeriodKey;
use crate::engine::batch_resolver::BatchStateResolver;
use std::collections::{BTreeMap, BTreeSet};

// 聚合中间结构(每个 (维度, 月份) 一个)
#[derive(Default)]
struct CellAccumulator {
    sent_kg: f64,
    received_kg: f64,
    scrap_kg: f64,
    completed_cycle_times: Vec<i64>,
    batch_count: usize,
    sent_batch_count: usize,
    received_batch_count: usize,
    scrap_batch_count: usize,
}

// ==========================================
// LedgerAggregator - 台账聚合引擎
// ==========================================
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// 构建月度台账(主入口)
    ///
    /// # 规则
    /// 1. 发出归属: sent_total>0 时整体记入最早发出日所在月
    /// 2. 回厂归属: 逐条回厂事件按事件日期归月(一个批次可能
    ///    分多月分批回厂,整批归一个月会歪曲流量史)
    /// 3. 报损归属: 完结且报损>0 时记入最后回厂月,无回厂事件
    ///    退回发出月
    /// 4. 周期归属: 与报损同口径(最后回厂月,退回发出月)
    /// 5. 结转: 按维度内月份升序, opening = max(0, 上期 closing);
    ///    本期 closing = opening + 发出 - 回厂 - 报损(原始值,
    ///    可为负,暴露超回异常所在月)
    ///
    /// # 参数
    /// - batches: 批次快照(只读)
    /// - dimension_key: 维度取键函数(染厂/客户等,调用方指定)
    ///
    /// # 返回
    /// - Vec<LedgerCell>: 按 (维度, 月份) 升序
    pub fn build_ledger(
        batches: &[Batch],
        dimension_key: &dyn Fn(&Batch) -> String,
    ) -> Vec<LedgerCell> {
        let mut cells: BTreeMap<(String, PeriodKey), CellAccumulator> = BTreeMap::new();

        // === 第一遍: 归属累加 ===
        for batch in batches {
            let summary = BatchStateResolver::resolve(batch);
            let dim = dimension_key(batch);
            let mut touched: BTreeSet<PeriodKey> = BTreeSet::new();

            // 规则 1: 发出归属
            if summary.sent_total > 0.0 {
                match summary.earliest_sent_date {
                    Some(date) => {
                        let period = PeriodKey::from_date(date);
                        let acc = cells.entry((dim.clone(), period)).or_default();
                        acc.sent_kg += summary.sent_total;
                        acc.sent_batch_count += 1;
                        touched.insert(period);
                    }
                    None => {
                        // 有量无日期(历史标量缺发出日期)→ 无法归月,降级跳过
                        tracing::warn!(
                            batch_id = %batch.id,
                            "发出量无可归属日期,月度台账跳过该批发出"
                        );
                    }
                }
            }

            // 规则 2: 回厂逐条事件归月
            let mut receive_periods: BTreeSet<PeriodKey> = BTreeSet::new();
            for event in &batch.receive_events {
                let period = PeriodKey::from_date(event.date);
                let acc = cells.entry((dim.clone(), period)).or_default();
                acc.received_kg += event.total_quantity();
                receive_periods.insert(period);
                touched.insert(period);
            }
            for period in &receive_periods {
                if let Some(acc) = cells.get_mut(&(dim.clone(), *period)) {
                    acc.received_batch_count += 1;
                }
            }

            // 规则 3/4: 报损与周期共用归属口径
            let attribution_date = summary.last_receive_date.or(summary.earliest_sent_date);
            if let Some(date) = attribution_date {
                let period = PeriodKey::from_date(date);

                if summary.is_complete && batch.scrap_quantity > 0.0 {
                    let acc = cells.entry((dim.clone(), period)).or_default();
                    acc.scrap_kg += batch.scrap_quantity;
                    acc.scrap_batch_count += 1;
                    touched.insert(period);
                }

                if let Some(cycle) = summary.cycle_time_days {
                    let acc = cells.entry((dim.clone(), period)).or_default();
                    acc.completed_cycle_times.push(cycle);
                    touched.insert(period);
                }
            }

            // 审计计数: 批次触及的每个单元记一次
            for period in touched {
                if let Some(acc) = cells.get_mut(&(dim.clone(), period)) {
                    acc.batch_count += 1;
                }
            }
        }

        tracing::debug!(cell_count = cells.len(), "台账归属累加完成,开始结转");

        // === 第二遍: 按维度结转 ===
        let mut result = Vec::with_capacity(cells.len());
        let mut current_dim: Option<String> = None;
        let mut carry = 0.0;

        for ((dim, period), acc) in cells {
            // 维度切换 → 结存从零起算
            if current_dim.as_deref() != Some(dim.as_str()) {
                current_dim = Some(dim.clone());
                carry = 0.0;
            }

            let opening_stock = carry;
            let closing_stock =
                opening_stock + acc.sent_kg - acc.received_kg - acc.scrap_kg;
            // 钳制只在结转: 维度不能把负在外量带进下一期,
            // 但本期保留原始(可能为负的)期末值
            carry = closing_stock.max(0.0);

            let avg_cycle_days = if acc.completed_cycle_times.is_empty() {
                None
            } else {
                let sum: i64 = acc.completed_cycle_times.iter().sum();
                Some(sum as f64 / acc.completed_cycle_times.len() as f64)
            };
            let scrap_pct = if acc.sent_kg > 0.0 {
                acc.scrap_kg / acc.sent_kg
            } else {
                0.0
            };

            result.push(LedgerCell {
                dimension_key: dim,
                period,
                sent_kg: acc.sent_kg,
                received_kg: acc.received_kg,
                scrap_kg: acc.scrap_kg,
                opening_stock,
                closing_stock,
                completed_cycle_times: acc.completed_cycle_times,
                avg_cycle_days,
                batch_count: acc.batch_count,
                sent_batch_count: acc.sent_batch_count,
                received_batch_count: acc.received_batch_count,
                scrap_batch_count: acc.scrap_batch_count,
                scrap_pct,
            });
        }

        result
    }
}

// ==========================================
// 单元测试
// ==========================================
