// ==========================================
// 染整外协台账系统 - 批次领域模型
// ==========================================
// 职责: 定义外协批次快照记录(上游文档库供给,引擎只读)
// 红线: 收发事件为只追加流水,引擎不修改、不删除
// 序列化: camelCase,日期为 ISO-8601 日历日(无时分秒),
//         与上游文档库的字段口径保持一致
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// TransferEvent - 收发事件
// ==========================================
// 一次发出或回厂的纸面记录,记录后不可变更
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEvent {
    pub date: NaiveDate,        // 发生日期
    #[serde(default)]
    pub raw_quantity: f64,      // 主料数量(坯布,kg)
    #[serde(default)]
    pub accessory_quantity: f64, // 辅料数量(罗纹/领口等,kg)
}

impl TransferEvent {
    /// 单条事件的合计量(主料 + 辅料)
    pub fn total_quantity(&self) -> f64 {
        self.raw_quantity + self.accessory_quantity
    }
}

// ==========================================
// Batch - 外协批次
// ==========================================
// 一个色号/缸的物料,经一道外部染整工序
// 用途: 上游写入,引擎层只读
// 兼容: 历史记录无事件流水,只有 legacy 标量(口径互斥,
//       有事件用事件合计,否则用标量,绝不叠加)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    // ===== 主键 =====
    pub id: String, // 批次标识(订单内唯一)

    // ===== 归属维度 =====
    #[serde(default)]
    pub facility: String,  // 染厂(外协加工地点)
    #[serde(default)]
    pub client_id: String, // 客户

    // ===== 时间信息 =====
    #[serde(default)]
    pub formation_date: Option<NaiveDate>, // 建批日期(历史数据可能缺失)

    // ===== 收发流水(只追加) =====
    #[serde(default)]
    pub sent_events: Vec<TransferEvent>,    // 发出事件
    #[serde(default)]
    pub receive_events: Vec<TransferEvent>, // 回厂事件

    // ===== 历史标量兜底 =====
    #[serde(default)]
    pub legacy_sent_qty: f64,     // 历史发出合计(无事件时生效)
    #[serde(default)]
    pub legacy_received_qty: f64, // 历史回厂合计(无事件时生效)
    #[serde(default)]
    pub legacy_sent_date: Option<NaiveDate>, // 历史发出日期(无事件时生效)

    // ===== 完结信息 =====
    #[serde(default)]
    pub scrap_quantity: f64, // 报损量(kg,判定完结后记录)
    #[serde(default)]
    pub explicit_complete: Option<bool>, // 上游工作流的完结覆写(权威)
}

impl Batch {
    /// 创建空批次(测试与导入管道使用)
    pub fn new(id: impl Into<String>, client_id: impl Into<String>, facility: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            facility: facility.into(),
            client_id: client_id.into(),
            formation_date: None,
            sent_events: Vec::new(),
            receive_events: Vec::new(),
            legacy_sent_qty: 0.0,
            legacy_received_qty: 0.0,
            legacy_sent_date: None,
            scrap_quantity: 0.0,
            explicit_complete: None,
        }
    }
}
