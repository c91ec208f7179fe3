// ==========================================
// 染整外协台账系统 - 快照导入层
// ==========================================
// 职责: 从文件装载批次快照,交给引擎计算
//       (引擎本身不做 I/O;本层就是"供给快照的协作方")
// 支持: JSON 批次数组 / CSV 收发流水(逐行事件,按批次号归组)
// 红线: 行级异常降级跳过并计数,不让单行坏数据废掉整个文件;
//       文件级失败(打不开/格式不支持)才返回错误
// ==========================================

use crate::domain::batch::{Batch, TransferEvent};
use crate::domain::types::TransferDirection;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

// ==========================================
// 导入错误类型
// ==========================================

/// 快照导入错误(文件级)
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV 解析失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("不支持的文件格式: {0} (支持 .json / .csv)")]
    UnsupportedFormat(String),
}

/// 导入结果(批次 + 行级统计)
#[derive(Debug)]
pub struct ImportResult {
    pub batches: Vec<Batch>,
    pub row_count: usize,    // 读到的数据行数
    pub skipped_rows: usize, // 降级跳过的行数
}

// ==========================================
// 收发流水 CSV 列定义(下标口径)
// ==========================================
// 0 批次号  1 客户  2 染厂  3 建批日期  4 方向(发出/回厂)
// 5 日期    6 主料数量  7 辅料数量  8 报损数量  9 完成标记
const COL_BATCH_ID: usize = 0;
const COL_CLIENT: usize = 1;
const COL_FACILITY: usize = 2;
const COL_FORMATION_DATE: usize = 3;
const COL_DIRECTION: usize = 4;
const COL_EVENT_DATE: usize = 5;
const COL_RAW_QTY: usize = 6;
const COL_ACCESSORY_QTY: usize = 7;
const COL_SCRAP_QTY: usize = 8;
const COL_COMPLETE_FLAG: usize = 9;

// ==========================================
// SnapshotImporter - 快照导入器
// ==========================================
pub struct SnapshotImporter;

impl SnapshotImporter {
    /// 按扩展名分派装载(主入口)
    pub fn load(path: &str) -> Result<ImportResult, ImportError> {
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Self::load_snapshot_json(path),
            Some("csv") => Self::load_journal_csv(path),
            _ => Err(ImportError::UnsupportedFormat(path.to_string())),
        }
    }

    /// 装载 JSON 批次快照(上游文档库的导出格式)
    pub fn load_snapshot_json(path: &str) -> Result<ImportResult, ImportError> {
        let file = File::open(path)?;
        let batches: Vec<Batch> = serde_json::from_reader(file)?;
        tracing::info!(path, batch_count = batches.len(), "JSON 快照装载完成");
        Ok(ImportResult {
            row_count: batches.len(),
            skipped_rows: 0,
            batches,
        })
    }

    /// 装载 CSV 收发流水,按批次号归组为批次
    ///
    /// # 流程
    /// 1. 逐行解析(批次号/方向/日期缺失或非法 → 跳过并计数)
    /// 2. 批次级字段(客户/染厂/建批日期)取该批次首个非空值
    /// 3. 报损取各行最大值,完成标记任一行为真即为真
    /// 4. 事件按方向追加到 sent_events / receive_events
    pub fn load_journal_csv(path: &str) -> Result<ImportResult, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let mut grouped: BTreeMap<String, Batch> = BTreeMap::new();
        let mut row_count = 0usize;
        let mut skipped_rows = 0usize;

        for row in reader.records() {
            let record = row?;
            row_count += 1;

            let batch_id = match get_string_field(&record, COL_BATCH_ID) {
                Some(id) => id,
                None => {
                    skipped_rows += 1;
                    tracing::warn!(row = row_count, "流水行缺批次号,跳过");
                    continue;
                }
            };
            let direction = get_string_field(&record, COL_DIRECTION)
                .and_then(|v| TransferDirection::parse(&v));
            let event_date = get_date_field(&record, COL_EVENT_DATE);
            let (direction, event_date) = match (direction, event_date) {
                (Some(d), Some(date)) => (d, date),
                _ => {
                    skipped_rows += 1;
                    tracing::warn!(row = row_count, batch_id = %batch_id, "流水行方向或日期非法,跳过");
                    continue;
                }
            };

            let batch = grouped.entry(batch_id.clone()).or_insert_with(|| {
                Batch::new(
                    batch_id.clone(),
                    get_string_field(&record, COL_CLIENT).unwrap_or_default(),
                    get_string_field(&record, COL_FACILITY).unwrap_or_default(),
                )
            });

            // 批次级字段: 首个非空值生效
            if batch.formation_date.is_none() {
                batch.formation_date = get_date_field(&record, COL_FORMATION_DATE);
            }
            if batch.client_id.is_empty() {
                if let Some(client) = get_string_field(&record, COL_CLIENT) {
                    batch.client_id = client;
                }
            }
            if batch.facility.is_empty() {
                if let Some(facility) = get_string_field(&record, COL_FACILITY) {
                    batch.facility = facility;
                }
            }
            if let Some(scrap) = get_f64_field(&record, COL_SCRAP_QTY) {
                batch.scrap_quantity = batch.scrap_quantity.max(scrap);
            }
            if get_flag_field(&record, COL_COMPLETE_FLAG) {
                batch.explicit_complete = Some(true);
            }

            let event = TransferEvent {
                date: event_date,
                raw_quantity: get_f64_field(&record, COL_RAW_QTY).unwrap_or(0.0),
                accessory_quantity: get_f64_field(&record, COL_ACCESSORY_QTY).unwrap_or(0.0),
            };
            match direction {
                TransferDirection::Sent => batch.sent_events.push(event),
                TransferDirection::Received => batch.receive_events.push(event),
            }
        }

        tracing::info!(
            path,
            row_count,
            skipped_rows,
            batch_count = grouped.len(),
            "CSV 收发流水装载完成"
        );

        Ok(ImportResult {
            batches: grouped.into_values().collect(),
            row_count,
            skipped_rows,
        })
    }
}

// ==========================================
// 字段解析辅助
// ==========================================

fn get_string_field(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn get_f64_field(record: &csv::StringRecord, index: usize) -> Option<f64> {
    record.get(index).and_then(|s| s.trim().parse::<f64>().ok())
}

fn get_date_field(record: &csv::StringRecord, index: usize) -> Option<NaiveDate> {
    record.get(index).and_then(|s| {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
            .ok()
    })
}

fn get_flag_field(record: &csv::StringRecord, index: usize) -> bool {
    matches!(
        record.get(index).map(str::trim),
        Some("1") | Some("true") | Some("TRUE") | Some("是")
    )
}

// ==========================================
// 单元测试
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_helpers() {
        let record = csv::StringRecord::from(vec![
            "PC-001", "123.45", "2025-03-05", "20250305", "", "  ", "bad",
        ]);
        assert_eq!(get_string_field(&record, 0), Some("PC-001".to_string()));
        assert_eq!(get_f64_field(&record, 1), Some(123.45));
        assert_eq!(
            get_date_field(&record, 2),
            NaiveDate::from_ymd_opt(2025, 3, 5)
        );
        assert_eq!(
            get_date_field(&record, 3),
            NaiveDate::from_ymd_opt(2025, 3, 5)
        );
        assert_eq!(get_string_field(&record, 4), None); // 空字段
        assert_eq!(get_string_field(&record, 5), None); // 纯空白
        assert_eq!(get_f64_field(&record, 6), None);
        assert_eq!(get_date_field(&record, 6), None);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(
            TransferDirection::parse("发出"),
            Some(TransferDirection::Sent)
        );
        assert_eq!(
            TransferDirection::parse(" RECEIVED "),
            Some(TransferDirection::Received)
        );
        assert_eq!(TransferDirection::parse("退回"), None);
    }
}
