// ==========================================
// 运营绩效 KPI - 工作日产能计算
// ==========================================
// 职责: 一名全职员工在给定月份内的可用工时
// 规则:
// 1) 只计周一至周五
// 2) 当月只计到今天（含）
// 3) 年假 (日历日) 折算工作日后按有效月数分摊扣除，结果不小于 0
// 4) 乘以标准日工时
// ==========================================

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::instrument;

use crate::config::KpiSettings;

/// 产能计算明细
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityBreakdown {
    /// 计入的工作日数
    pub weekdays: u32,
    /// 有效月数（当月按已过天数折算）
    pub effective_months: f64,
    /// 扣除的年假工作日
    pub leave_days: f64,
    /// 可用工时
    pub hours: f64,
}

// ==========================================
// CapacityCalculator - 产能计算器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct CapacityCalculator {
    workday_hours: f64,
    annual_leave_days: f64,
}

impl CapacityCalculator {
    pub fn new(settings: &KpiSettings) -> Self {
        Self {
            workday_hours: settings.workday_hours,
            annual_leave_days: settings.annual_leave_days,
        }
    }

    /// 年假折算为工作日（日历日 * 5/7）
    pub fn annual_leave_workdays(&self) -> f64 {
        self.annual_leave_days * 5.0 / 7.0
    }

    /// 单人可用工时
    pub fn capacity_hours(&self, year: i32, months: &[u32], today: NaiveDate) -> f64 {
        self.breakdown(year, months, today).hours
    }

    /// 单人可用工时（带明细）
    ///
    /// # 参数
    /// - `year`: 年份
    /// - `months`: 月份集合（越界月份忽略）
    /// - `today`: 当前日期（决定当月截断）
    #[instrument(level = "debug", skip(self))]
    pub fn breakdown(&self, year: i32, months: &[u32], today: NaiveDate) -> CapacityBreakdown {
        let mut weekdays = 0u32;
        let mut effective_months = 0.0f64;

        for &month in months {
            let Some(total_days) = days_in_month(year, month) else {
                continue;
            };

            if year == today.year() && month == today.month() {
                let elapsed = today.day().min(total_days);
                weekdays += weekdays_in_month(year, month, Some(elapsed));
                effective_months += elapsed as f64 / total_days as f64;
            } else {
                weekdays += weekdays_in_month(year, month, None);
                effective_months += 1.0;
            }
        }

        let leave_days = self.annual_leave_workdays() * effective_months / 12.0;
        let working_days = (weekdays as f64 - leave_days).max(0.0);

        CapacityBreakdown {
            weekdays,
            effective_months,
            leave_days,
            hours: working_days * self.workday_hours,
        }
    }
}

/// 当月天数；月份越界返回 None
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// 当月周一至周五的天数；`up_to_day` 为截止日（含）
pub fn weekdays_in_month(year: i32, month: u32, up_to_day: Option<u32>) -> u32 {
    let Some(total_days) = days_in_month(year, month) else {
        return 0;
    };
    let last = up_to_day.unwrap_or(total_days).min(total_days);

    (1..=last)
        .filter_map(|d| NaiveDate::from_ymd_opt(year, month, d))
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}
