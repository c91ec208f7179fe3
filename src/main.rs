// ==========================================
// 染整外协台账系统 - 快照运行入口
// ==========================================
// 职责: 装载快照文件,跑一遍引擎,打印驾驶舱读模型
// 定位: 引擎自身无 CLI 语义,本入口就是"供给快照的协作方"
// ==========================================

use anyhow::Context;
use dyehouse_ledger::{logging, DashboardApi, SnapshotImporter};

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("染整外协台账系统 - 对账引擎");
    tracing::info!("系统版本: {}", dyehouse_ledger::VERSION);
    tracing::info!("==================================================");

    let path = std::env::args()
        .nth(1)
        .context("用法: dyehouse-ledger <快照.json | 收发流水.csv>")?;

    let result = SnapshotImporter::load(&path)?;
    tracing::info!(
        batch_count = result.batches.len(),
        row_count = result.row_count,
        skipped_rows = result.skipped_rows,
        "快照装载完成"
    );

    // 全局总量
    let totals = DashboardApi::overall_totals(&result.batches);
    println!("== 全局总量 ==");
    println!("{}", serde_json::to_string_pretty(&totals)?);

    // 染厂维度汇总(报损率降序)
    let ledger = DashboardApi::facility_ledger(&result.batches);
    let by_facility = DashboardApi::by_dimension(&ledger);
    println!("\n== 染厂汇总(报损率降序) ==");
    for summary in &by_facility {
        println!(
            "{}: 发出 {:.1} 回厂 {:.1} 报损 {:.1} ({:.2}%) 在外 {:.1}",
            summary.dimension_key,
            summary.sent_kg,
            summary.received_kg,
            summary.scrap_kg,
            summary.scrap_pct * 100.0,
            summary.closing_stock,
        );
    }

    // 月度时间线
    let timeline = DashboardApi::monthly_timeline(&ledger);
    println!("\n== 月度台账 ==");
    for cell in &timeline {
        println!(
            "{} {}: 期初 {:.1} 发出 {:.1} 回厂 {:.1} 报损 {:.1} 期末 {:.1}",
            cell.period,
            cell.dimension_key,
            cell.opening_stock,
            cell.sent_kg,
            cell.received_kg,
            cell.scrap_kg,
            cell.closing_stock,
        );
    }

    // 超期批次
    let report = DashboardApi::outliers(&result.batches);
    println!(
        "\n== 超期批次 (样本 {},阈值 {:.1} 天) ==",
        report.sample_count, report.threshold_days
    );
    for entry in &report.entries {
        println!(
            "{} ({} / {}): {} 天",
            entry.batch_id, entry.client_id, entry.facility, entry.cycle_time_days
        );
    }

    Ok(())
}
