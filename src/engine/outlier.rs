// ==========================================
// 染整外协台账系统 - 超期异常检测引擎
// ==========================================
// 职责: 对完结批次的回货周期做稳健离群判定(Tukey 围栏)
// 红线: 分位数取整数下标,不做线性插值 —— 口径一旦变动,
//       历史判定结果会静默漂移,任何改法必须显式换版本
// ==========================================

use std::cmp::Ordering;

// ==========================================
// OutlierDetector - 纯函数工具类
// ==========================================
pub struct OutlierDetector;

impl OutlierDetector {
    /// 稳健估计所需最小样本量
    /// 样本不足时阈值取 +∞,全部样本视为正常(不是错误)
    pub const MIN_SAMPLES: usize = 4;

    /// IQR 围栏系数
    pub const FENCE_FACTOR: f64 = 1.5;

    /// 计算"过慢"阈值
    ///
    /// # 规则
    /// 1. n < 4 → +∞
    /// 2. 升序排序
    /// 3. Q1 = sorted[floor(n*0.25)], Q3 = sorted[floor(n*0.75)]
    ///    (下标法,不插值)
    /// 4. threshold = Q3 + 1.5*(Q3-Q1)
    ///
    /// # 参数
    /// - samples: 周期样本(天)
    pub fn threshold(samples: &[f64]) -> f64 {
        if samples.len() < Self::MIN_SAMPLES {
            return f64::INFINITY;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let n = sorted.len();
        let q1 = sorted[(n as f64 * 0.25).floor() as usize];
        let q3 = sorted[(n as f64 * 0.75).floor() as usize];

        q3 + Self::FENCE_FACTOR * (q3 - q1)
    }

    /// 按阈值分类,返回离群样本的原始下标
    ///
    /// # 规则
    /// - 严格大于阈值才算离群(等于阈值视为正常)
    /// - 返回下标而非值,调用方借此回溯到来源批次
    pub fn classify(samples: &[f64], threshold: f64) -> Vec<usize> {
        samples
            .iter()
            .enumerate()
            .filter(|(_, &v)| v > threshold)
            .map(|(i, _)| i)
            .collect()
    }
}

// ==========================================
// 单元测试
// ==========================================
