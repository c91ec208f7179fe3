// ==========================================
// 染整外协台账系统 - 领域类型定义
// ==========================================
// 职责: 定义台账核心使用的基础类型
// 红线: 纯数据类型,不含业务规则
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 期间键 (Period Key)
// ==========================================
// 台账按自然月分桶,键为 (年, 月)
// 排序: 按 (year, month) 升序,与时间顺序一致
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PeriodKey {
    pub year: i32,
    pub month: u32,
}

impl PeriodKey {
    /// 从日历日期取所属月份
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

// Display 以 "YYYY-MM" 输出,与前端月份选择器口径一致
impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ==========================================
// 收发方向 (Transfer Direction)
// ==========================================
// 收发流水 CSV 导入时使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferDirection {
    Sent,     // 发出(出厂送染)
    Received, // 回厂(染后返回)
}

impl TransferDirection {
    /// 解析流水方向字段
    ///
    /// # 规则
    /// - "发出" / "SENT" → Sent
    /// - "回厂" / "RECEIVED" → Received
    /// - 其他 → None(该行按格式异常降级处理)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "发出" | "SENT" => Some(TransferDirection::Sent),
            "回厂" | "RECEIVED" => Some(TransferDirection::Received),
            _ => None,
        }
    }
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferDirection::Sent => write!(f, "SENT"),
            TransferDirection::Received => write!(f, "RECEIVED"),
        }
    }
}

// ==========================================
// 数据异常标记 (Anomaly Flag)
// ==========================================
// 红线: 异常是数据不是故障 —— 引擎照算并在输出中标记,
//       不抛错、不吞值,由上层决定如何呈现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyFlag {
    /// 回厂量大于发出量(超回)
    OverReturn,
    /// 回厂日期早于建批日期,周期弃算
    NegativeCycleTime,
    /// 已完成批次缺建批日期,周期无法计算
    MissingFormationDate,
}

impl fmt::Display for AnomalyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyFlag::OverReturn => write!(f, "OVER_RETURN"),
            AnomalyFlag::NegativeCycleTime => write!(f, "NEGATIVE_CYCLE_TIME"),
            AnomalyFlag::MissingFormationDate => write!(f, "MISSING_FORMATION_DATE"),
        }
    }
}
