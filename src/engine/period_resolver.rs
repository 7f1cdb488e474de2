// ==========================================
// 运营绩效 KPI - 周期解析
// ==========================================
// 职责: (year, periodType, periodValue) -> 需要取数的月份
// 输出: 主周期月份 (headline) + 趋势所需上下文月份 (context)
// 说明: 无失败路径，缺失/越界的 periodValue 一律按全年处理
// ==========================================

use chrono::{Datelike, NaiveDate};

use crate::domain::types::{months_of_quarter, quarter_of_month, PeriodSelection, PeriodType, Role};

/// 周期解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPeriod {
    /// 原始选择（用于回显）
    pub selection: PeriodSelection,
    /// 主周期月份（升序，非空）
    pub headline_months: Vec<u32>,
    /// 取数月份（包含主周期，升序，非空）
    pub context_months: Vec<u32>,
    /// 个人月度趋势所使用的季度
    pub trend_quarter: u32,
}

impl ResolvedPeriod {
    pub fn year(&self) -> i32 {
        self.selection.year
    }
}

pub struct PeriodResolver;

impl PeriodResolver {
    /// 解析周期
    ///
    /// # 规则
    /// - month v   -> 主周期 [v]；个人视图上下文为 v 所在季度
    /// - quarter v -> 主周期为该季度 3 个月；负责人视图上下文为全年
    /// - year      -> 全年 12 个月
    pub fn resolve(selection: PeriodSelection, role: Role, today: NaiveDate) -> ResolvedPeriod {
        let full_year: Vec<u32> = (1..=12).collect();

        match (selection.period_type, selection.value) {
            (PeriodType::Month, Some(m)) if (1..=12).contains(&m) => {
                let quarter = quarter_of_month(m);
                let context = match role {
                    Role::Employee => months_of_quarter(quarter),
                    Role::Head | Role::Chief => vec![m],
                };
                ResolvedPeriod {
                    selection,
                    headline_months: vec![m],
                    context_months: context,
                    trend_quarter: quarter,
                }
            }
            (PeriodType::Quarter, Some(q)) if (1..=4).contains(&q) => {
                let months = months_of_quarter(q);
                let context = match role {
                    Role::Head => full_year,
                    Role::Employee | Role::Chief => months.clone(),
                };
                ResolvedPeriod {
                    selection,
                    headline_months: months,
                    context_months: context,
                    trend_quarter: q,
                }
            }
            _ => ResolvedPeriod {
                selection,
                headline_months: full_year.clone(),
                context_months: full_year,
                trend_quarter: Self::year_trend_quarter(selection.year, today),
            },
        }
    }

    /// 全年视图下个人趋势的季度：当年取当前季度，往年取 Q4，未来年份取 Q1
    fn year_trend_quarter(year: i32, today: NaiveDate) -> u32 {
        if year == today.year() {
            quarter_of_month(today.month())
        } else if year < today.year() {
            4
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 14).unwrap()
    }

    #[test]
    fn test_month_for_employee_includes_quarter_context() {
        let r = PeriodResolver::resolve(PeriodSelection::month(2025, 5), Role::Employee, today());
        assert_eq!(r.headline_months, vec![5]);
        assert_eq!(r.context_months, vec![4, 5, 6]);
        assert_eq!(r.trend_quarter, 2);
    }

    #[test]
    fn test_month_for_head_has_no_extra_context() {
        let r = PeriodResolver::resolve(PeriodSelection::month(2025, 5), Role::Head, today());
        assert_eq!(r.headline_months, vec![5]);
        assert_eq!(r.context_months, vec![5]);
    }

    #[test]
    fn test_quarter_for_head_fetches_full_year() {
        let r = PeriodResolver::resolve(PeriodSelection::quarter(2025, 3), Role::Head, today());
        assert_eq!(r.headline_months, vec![7, 8, 9]);
        assert_eq!(r.context_months.len(), 12);

        let r = PeriodResolver::resolve(PeriodSelection::quarter(2025, 3), Role::Chief, today());
        assert_eq!(r.context_months, vec![7, 8, 9]);
    }

    #[test]
    fn test_missing_or_invalid_value_falls_back_to_year() {
        for selection in [
            PeriodSelection::new(2025, PeriodType::Month, None),
            PeriodSelection::new(2025, PeriodType::Quarter, None),
            PeriodSelection::month(2025, 13),
            PeriodSelection::quarter(2025, 0),
        ] {
            let r = PeriodResolver::resolve(selection, Role::Employee, today());
            assert_eq!(r.headline_months, (1..=12).collect::<Vec<_>>());
            assert_eq!(r.context_months, (1..=12).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_year_trend_quarter() {
        let current = PeriodResolver::resolve(PeriodSelection::year(2025), Role::Employee, today());
        assert_eq!(current.trend_quarter, 3);
        let past = PeriodResolver::resolve(PeriodSelection::year(2023), Role::Employee, today());
        assert_eq!(past.trend_quarter, 4);
        let future = PeriodResolver::resolve(PeriodSelection::year(2027), Role::Employee, today());
        assert_eq!(future.trend_quarter, 1);
    }
}
