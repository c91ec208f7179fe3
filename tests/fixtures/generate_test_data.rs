// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成快照样例文件,供 CLI 与导入层手工验证
// 输出: tests/fixtures/datasets/snapshot.json
//       tests/fixtures/datasets/journal.csv
// ==========================================

use chrono::{Duration, NaiveDate};
use csv::Writer;
use dyehouse_ledger::domain::{Batch, TransferEvent};
use std::error::Error;
use std::fs;
use uuid::Uuid;

// CSV 表头(中文列名,与导入层下标口径一致)
const CSV_HEADER: &[&str] = &[
    "批次号",
    "客户",
    "染厂",
    "建批日期",
    "方向",
    "日期",
    "主料数量",
    "辅料数量",
    "报损数量",
    "完成标记",
];

const FACILITIES: &[&str] = &["甲染厂", "乙染厂", "丙染厂"];
const CLIENTS: &[&str] = &["客户A", "客户B"];

fn main() -> Result<(), Box<dyn Error>> {
    fs::create_dir_all("tests/fixtures/datasets")?;

    let batches = build_batches();
    write_snapshot_json(&batches)?;
    write_journal_csv(&batches)?;

    println!("已生成 {} 个批次的快照样例", batches.len());
    Ok(())
}

/// 构造覆盖各状态的批次集合:
/// 完整闭环 / 跨月分批回厂 / 只发未回 / 超回异常 / 历史标量 / 超期
fn build_batches() -> Vec<Batch> {
    let base = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    let mut batches = Vec::new();

    for i in 0..18_i64 {
        let facility = FACILITIES[(i % 3) as usize];
        let client = CLIENTS[(i % 2) as usize];
        let mut batch = Batch::new(
            format!("PC-{}", &Uuid::new_v4().to_string()[..8]),
            client,
            facility,
        );
        let formed = base + Duration::days(i * 7);
        batch.formation_date = Some(formed);

        let qty = 200.0 + (i as f64) * 15.0;
        batch.sent_events.push(TransferEvent {
            date: formed + Duration::days(1),
            raw_quantity: qty,
            accessory_quantity: if i % 4 == 0 { 12.0 } else { 0.0 },
        });

        match i % 6 {
            // 完整闭环,周期正常
            0 | 1 | 2 => {
                batch.receive_events.push(TransferEvent {
                    date: formed + Duration::days(8 + i % 4),
                    raw_quantity: qty * 0.97,
                    accessory_quantity: 0.0,
                });
                batch.scrap_quantity = qty * 0.01;
            }
            // 跨月分批回厂
            3 => {
                batch.receive_events.push(TransferEvent {
                    date: formed + Duration::days(20),
                    raw_quantity: qty * 0.4,
                    accessory_quantity: 0.0,
                });
                batch.receive_events.push(TransferEvent {
                    date: formed + Duration::days(45),
                    raw_quantity: qty * 0.55,
                    accessory_quantity: 0.0,
                });
            }
            // 只发未回(在外)
            4 => {}
            // 超期回厂(离群周期)
            _ => {
                batch.receive_events.push(TransferEvent {
                    date: formed + Duration::days(70),
                    raw_quantity: qty,
                    accessory_quantity: 0.0,
                });
            }
        }
        batches.push(batch);
    }

    // 历史标量批次(无事件流水)
    let mut legacy = Batch::new("PC-LEGACY-01", "客户A", "甲染厂");
    legacy.legacy_sent_qty = 150.0;
    legacy.legacy_received_qty = 150.0;
    legacy.legacy_sent_date = NaiveDate::from_ymd_opt(2024, 11, 3);
    legacy.explicit_complete = Some(true);
    batches.push(legacy);

    // 超回异常批次
    let mut over = Batch::new("PC-OVER-01", "客户B", "乙染厂");
    over.formation_date = NaiveDate::from_ymd_opt(2025, 2, 1);
    over.sent_events.push(TransferEvent {
        date: NaiveDate::from_ymd_opt(2025, 2, 2).unwrap(),
        raw_quantity: 100.0,
        accessory_quantity: 0.0,
    });
    over.receive_events.push(TransferEvent {
        date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        raw_quantity: 130.0,
        accessory_quantity: 0.0,
    });
    batches.push(over);

    batches
}

fn write_snapshot_json(batches: &[Batch]) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(batches)?;
    fs::write("tests/fixtures/datasets/snapshot.json", json)?;
    Ok(())
}

fn write_journal_csv(batches: &[Batch]) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path("tests/fixtures/datasets/journal.csv")?;
    writer.write_record(CSV_HEADER)?;

    for batch in batches {
        let formation = batch
            .formation_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        let complete_flag = if batch.explicit_complete == Some(true) {
            "1"
        } else {
            ""
        };
        for event in &batch.sent_events {
            writer.write_record([
                batch.id.as_str(),
                batch.client_id.as_str(),
                batch.facility.as_str(),
                formation.as_str(),
                "发出",
                event.date.to_string().as_str(),
                format!("{:.1}", event.raw_quantity).as_str(),
                format!("{:.1}", event.accessory_quantity).as_str(),
                "",
                "",
            ])?;
        }
        for event in &batch.receive_events {
            writer.write_record([
                batch.id.as_str(),
                batch.client_id.as_str(),
                batch.facility.as_str(),
                formation.as_str(),
                "回厂",
                event.date.to_string().as_str(),
                format!("{:.1}", event.raw_quantity).as_str(),
                format!("{:.1}", event.accessory_quantity).as_str(),
                format!("{:.1}", batch.scrap_quantity).as_str(),
                complete_flag,
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
