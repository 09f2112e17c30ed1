use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::models::fund::Frequency;

/// Business days between an ex-dividend date and the payment date.
/// The source data uses both 2 and 3 in different places; this crate uses 2
/// everywhere, through this single constant.
pub const PAY_DATE_OFFSET_DAYS: u32 = 2;

/// Pure date arithmetic for dividend scheduling.
///
/// No I/O and no clock access — "today" is always a parameter, so every
/// method is deterministic and trivially testable.
pub struct ScheduleService;

impl ScheduleService {
    pub fn new() -> Self {
        Self
    }

    /// Project the next ex-dividend date from the last one.
    ///
    /// Adds 1/3/6/12 calendar months for Monthly/Quarterly/Semi-annual/Annual;
    /// `Unknown` falls back to quarterly. Month addition clamps to the end of
    /// the target month (Jan 31 + 1 month = Feb 29 in a leap year), never
    /// spilling into the following month.
    pub fn next_ex_date(&self, last_ex_date: NaiveDate, frequency: Frequency) -> NaiveDate {
        let months = frequency.months_between_payments();
        last_ex_date
            .checked_add_months(Months::new(months))
            .unwrap_or(last_ex_date)
    }

    /// Advance `n` business days, one calendar day at a time, counting only
    /// Mon–Fri. The result never lands on a weekend.
    pub fn add_business_days(&self, date: NaiveDate, n: u32) -> NaiveDate {
        let mut current = date;
        let mut added = 0;
        while added < n {
            current = match current.succ_opt() {
                Some(next) => next,
                None => return current,
            };
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                added += 1;
            }
        }
        current
    }

    /// Derive the payment date from an ex-dividend date.
    pub fn pay_date_for(&self, ex_date: NaiveDate) -> NaiveDate {
        self.add_business_days(ex_date, PAY_DATE_OFFSET_DAYS)
    }

    /// Whole days from `today` until `target`, floored at zero — past dates
    /// report 0, never a negative count.
    pub fn days_until(&self, today: NaiveDate, target: NaiveDate) -> i64 {
        (target - today).num_days().max(0)
    }
}

impl Default for ScheduleService {
    fn default() -> Self {
        Self::new()
    }
}
