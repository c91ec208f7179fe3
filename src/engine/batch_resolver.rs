// ==========================================
// 染整外协台账系统 - 批次状态解析引擎
// ==========================================
// 职责: 从单个批次记录派生 BatchSummary(量值/完结/周期)
// 红线: 纯函数、全函数 —— 任何满足最小形状的输入都得出
//       确定性结果;缺失/畸形日期降级为 None,绝不报错
// 红线: 不修改输入批次
// ==========================================

use crate::domain::batch::{Batch, TransferEvent};
use crate::domain::ledger::BatchSummary;
use crate::domain::types::AnomalyFlag;
use chrono::NaiveDate;

// ==========================================
// BatchStateResolver - 纯函数工具类
// ==========================================
pub struct BatchStateResolver;

impl BatchStateResolver {
    /// 完结容差: 未回比例 ≤10% 即视为完结
    /// (吸收染整工序损耗与过磅误差,不要求足量回厂)
    pub const COMPLETION_TOLERANCE: f64 = 0.10;

    /// 解析批次,派生摘要(主入口)
    ///
    /// # 规则
    /// 1. 发出/回厂合计: 有事件用事件合计,否则用历史标量,
    ///    绝不两者叠加(避免静默重复计量)
    /// 2. 未回比例 = (发出-回厂)/发出;发出为 0 按 1.0(保守口径:
    ///    未发出视为 100% 未交代,而非"已完成")
    /// 3. 完结判定三路 OR:
    ///    explicit_complete=true / 报损>0 / (回厂>0 且 未回比例≤10%)
    /// 4. 周期: 完结 且 建批日期存在 且 至少一条回厂事件 且 差值非负
    ///    → floor(最后回厂日 - 建批日);否则 None
    ///
    /// # 参数
    /// - batch: 批次记录(只读)
    ///
    /// # 返回
    /// - BatchSummary: 派生摘要(异常以标记透传,见 AnomalyFlag)
    pub fn resolve(batch: &Batch) -> BatchSummary {
        let mut anomalies = Vec::new();

        // === 步骤 1: 量值口径 ===
        let sent_total = Self::sent_total(batch);
        let received_total = Self::received_total(batch);

        // === 步骤 2: 未回比例(不钳制,负值/超1是异常信号) ===
        let remaining_fraction = if sent_total > 0.0 {
            (sent_total - received_total) / sent_total
        } else {
            1.0
        };

        if received_total > sent_total {
            anomalies.push(AnomalyFlag::OverReturn);
        }

        // === 步骤 3: 完结判定 ===
        let is_complete = batch.explicit_complete == Some(true)
            || batch.scrap_quantity > 0.0
            || (received_total > 0.0 && remaining_fraction <= Self::COMPLETION_TOLERANCE);

        // === 步骤 4: 回货周期 ===
        let last_receive_date = Self::last_receive_date(batch);
        let cycle_time_days = if is_complete {
            Self::cycle_time_days(
                batch.formation_date,
                last_receive_date,
                &mut anomalies,
            )
        } else {
            None
        };

        BatchSummary {
            batch_id: batch.id.clone(),
            facility: batch.facility.clone(),
            client_id: batch.client_id.clone(),
            sent_total,
            received_total,
            scrap_quantity: batch.scrap_quantity,
            remaining_fraction,
            is_complete,
            cycle_time_days,
            earliest_sent_date: Self::earliest_sent_date(batch),
            last_receive_date,
            anomalies,
        }
    }

    /// 发出合计(事件优先,历史标量兜底)
    pub fn sent_total(batch: &Batch) -> f64 {
        if batch.sent_events.is_empty() {
            batch.legacy_sent_qty
        } else {
            Self::event_total(&batch.sent_events)
        }
    }

    /// 回厂合计(事件优先,历史标量兜底)
    pub fn received_total(batch: &Batch) -> f64 {
        if batch.receive_events.is_empty() {
            batch.legacy_received_qty
        } else {
            Self::event_total(&batch.receive_events)
        }
    }

    /// 最早发出日期(事件里取最小,无事件用历史发出日期)
    pub fn earliest_sent_date(batch: &Batch) -> Option<NaiveDate> {
        if batch.sent_events.is_empty() {
            batch.legacy_sent_date
        } else {
            batch.sent_events.iter().map(|e| e.date).min()
        }
    }

    /// 最后回厂日期(事件里取最大;历史标量无日期,不参与)
    pub fn last_receive_date(batch: &Batch) -> Option<NaiveDate> {
        batch.receive_events.iter().map(|e| e.date).max()
    }

    fn event_total(events: &[TransferEvent]) -> f64 {
        events.iter().map(TransferEvent::total_quantity).sum()
    }

    /// 回货周期(整天)
    ///
    /// # 规则
    /// - 两端日期任一缺失 → None(缺建批日期记 MISSING_FORMATION_DATE)
    /// - 差值为负(数据录错) → None,记 NEGATIVE_CYCLE_TIME
    fn cycle_time_days(
        formation_date: Option<NaiveDate>,
        last_receive_date: Option<NaiveDate>,
        anomalies: &mut Vec<AnomalyFlag>,
    ) -> Option<i64> {
        let formation = match formation_date {
            Some(d) => d,
            None => {
                anomalies.push(AnomalyFlag::MissingFormationDate);
                return None;
            }
        };
        let last_receive = last_receive_date?;

        let days = last_receive.signed_duration_since(formation).num_days();
        if days < 0 {
            anomalies.push(AnomalyFlag::NegativeCycleTime);
            return None;
        }
        Some(days)
    }
}

// ==========================================
// 单元测试
// ==========================================
