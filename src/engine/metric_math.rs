// ==========================================
// 运营绩效 KPI - 指标取整与比率
// ==========================================
// 红线: 取整只在写入输出前做一次，累加过程使用未取整值
// ==========================================

/// 保留 1 位小数（非有限值按 0）
pub fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0).round() / 10.0
}

/// 输出用工时：非负 + 1 位小数
pub fn hours(value: f64) -> f64 {
    round1(value.max(0.0))
}

/// KPI 比率 = actual / planned * 100，保留 1 位小数
///
/// planned <= 0 时恒为 0（不产生 NaN / Infinity）
pub fn kpi(actual: f64, planned: f64) -> f64 {
    if !(planned > 0.0) || !actual.is_finite() {
        return 0.0;
    }
    round1(actual.max(0.0) / planned * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_basic() {
        assert_eq!(kpi(35.0, 50.0), 70.0);
        assert_eq!(kpi(35.0, 140.0), 25.0);
        assert_eq!(kpi(1.0, 3.0), 33.3);
    }

    #[test]
    fn test_kpi_zero_denominator() {
        assert_eq!(kpi(10.0, 0.0), 0.0);
        assert_eq!(kpi(10.0, -5.0), 0.0);
        assert_eq!(kpi(0.0, 0.0), 0.0);
        assert_eq!(kpi(10.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_hours_never_negative() {
        assert_eq!(hours(-3.2), 0.0);
        assert_eq!(hours(12.345), 12.3);
        assert_eq!(hours(f64::INFINITY), 0.0);
    }
}
