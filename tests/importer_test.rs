// ==========================================
// SnapshotImporter 集成测试
// ==========================================
// 测试目标: 验证 JSON 快照与 CSV 收发流水装载
// 覆盖范围: 归组、批次级字段合并、行级降级、格式分派
// ==========================================

use chrono::NaiveDate;
use dyehouse_ledger::importer::{ImportError, SnapshotImporter};
use std::io::Write;
use tempfile::Builder;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 写临时文件并返回(句柄需保持存活)
fn write_temp(suffix: &str, content: &str) -> (tempfile::NamedTempFile, String) {
    let mut file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("创建临时文件失败");
    file.write_all(content.as_bytes()).expect("写入失败");
    let path = file.path().to_str().unwrap().to_string();
    (file, path)
}

// ==========================================
// 测试用例 1: JSON 快照
// ==========================================

#[test]
fn test_load_snapshot_json() {
    println!("\n=== 测试：JSON 批次数组装载 ===");

    let json = r#"[
        {
            "id": "PC-001",
            "facility": "甲染厂",
            "clientId": "客户A",
            "formationDate": "2025-01-01",
            "sentEvents": [{"date": "2025-01-02", "rawQuantity": 100.0, "accessoryQuantity": 0.0}],
            "receiveEvents": [{"date": "2025-01-10", "rawQuantity": 98.0, "accessoryQuantity": 0.0}]
        },
        {
            "id": "PC-002",
            "legacySentQty": 80.0,
            "legacySentDate": "2024-11-03"
        }
    ]"#;
    let (_file, path) = write_temp(".json", json);

    let result = SnapshotImporter::load(&path).expect("装载失败");
    assert_eq!(result.batches.len(), 2);
    assert_eq!(result.skipped_rows, 0);

    let first = &result.batches[0];
    assert_eq!(first.id, "PC-001");
    assert_eq!(first.formation_date, Some(date(2025, 1, 1)));
    assert_eq!(first.sent_events.len(), 1);
    assert_eq!(first.sent_events[0].raw_quantity, 100.0);

    // 可选字段缺省
    let second = &result.batches[1];
    assert_eq!(second.legacy_sent_qty, 80.0);
    assert!(second.sent_events.is_empty());
    assert_eq!(second.explicit_complete, None);
}

// ==========================================
// 测试用例 2: CSV 收发流水归组
// ==========================================

#[test]
fn test_load_journal_csv_groups_by_batch() {
    println!("\n=== 测试：流水按批次号归组 ===");

    let csv = "\
批次号,客户,染厂,建批日期,方向,日期,主料数量,辅料数量,报损数量,完成标记
PC-001,客户A,甲染厂,2025-03-01,发出,2025-03-03,500,0,,
PC-001,客户A,甲染厂,,回厂,2025-03-20,200,0,,
PC-001,客户A,甲染厂,,回厂,2025-04-08,300,0,2.5,1
PC-002,客户B,乙染厂,2025-03-10,发出,2025-03-12,120,8,,
";
    let (_file, path) = write_temp(".csv", csv);

    let result = SnapshotImporter::load(&path).expect("装载失败");
    assert_eq!(result.row_count, 4);
    assert_eq!(result.skipped_rows, 0);
    assert_eq!(result.batches.len(), 2);

    let first = &result.batches[0]; // BTreeMap 归组,批次号升序
    assert_eq!(first.id, "PC-001");
    assert_eq!(first.client_id, "客户A");
    assert_eq!(first.facility, "甲染厂");
    assert_eq!(first.formation_date, Some(date(2025, 3, 1)));
    assert_eq!(first.sent_events.len(), 1);
    assert_eq!(first.receive_events.len(), 2);
    assert_eq!(first.scrap_quantity, 2.5);
    assert_eq!(first.explicit_complete, Some(true));

    let second = &result.batches[1];
    assert_eq!(second.id, "PC-002");
    assert_eq!(second.sent_events[0].accessory_quantity, 8.0);
}

#[test]
fn test_journal_csv_skips_bad_rows() {
    println!("\n=== 测试：坏行降级跳过,不废整个文件 ===");

    let csv = "\
批次号,客户,染厂,建批日期,方向,日期,主料数量,辅料数量,报损数量,完成标记
PC-001,客户A,甲染厂,,发出,2025-03-03,100,0,,
,客户A,甲染厂,,发出,2025-03-04,50,0,,
PC-002,客户A,甲染厂,,退货,2025-03-05,50,0,,
PC-003,客户A,甲染厂,,回厂,not-a-date,50,0,,
";
    let (_file, path) = write_temp(".csv", csv);

    let result = SnapshotImporter::load(&path).expect("装载失败");
    assert_eq!(result.row_count, 4);
    assert_eq!(result.skipped_rows, 3); // 缺批次号/方向非法/日期非法
    assert_eq!(result.batches.len(), 1);
    assert_eq!(result.batches[0].id, "PC-001");
}

// ==========================================
// 测试用例 3: 格式分派
// ==========================================

#[test]
fn test_unsupported_format_rejected() {
    println!("\n=== 测试：不支持的扩展名报文件级错误 ===");

    let (_file, path) = write_temp(".xlsx", "whatever");
    match SnapshotImporter::load(&path) {
        Err(ImportError::UnsupportedFormat(p)) => assert!(p.ends_with(".xlsx")),
        other => panic!("预期 UnsupportedFormat,得到 {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    println!("\n=== 测试：文件不存在报 IO 错误 ===");

    match SnapshotImporter::load("/no/such/snapshot.json") {
        Err(ImportError::Io(_)) => {}
        other => panic!("预期 Io 错误,得到 {:?}", other),
    }
}

// ==========================================
// 测试用例 4: 装载结果直接可进引擎
// ==========================================

#[test]
fn test_loaded_snapshot_feeds_engine() {
    println!("\n=== 测试：流水装载后聚合出场景 B 台账 ===");

    let csv = "\
批次号,客户,染厂,建批日期,方向,日期,主料数量,辅料数量,报损数量,完成标记
PC-001,客户A,甲染厂,2025-03-01,发出,2025-03-03,500,0,,
PC-001,客户A,甲染厂,,回厂,2025-03-20,200,0,,
PC-001,客户A,甲染厂,,回厂,2025-04-08,300,0,,
";
    let (_file, path) = write_temp(".csv", csv);
    let result = SnapshotImporter::load(&path).expect("装载失败");

    let ledger = dyehouse_ledger::DashboardApi::facility_ledger(&result.batches);
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].closing_stock, 300.0);
    assert_eq!(ledger[1].opening_stock, 300.0);
    assert_eq!(ledger[1].closing_stock, 0.0);
}
