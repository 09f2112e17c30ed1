use chrono::{Datelike, Duration, NaiveDate};
use std::collections::{BTreeMap, HashMap};

use crate::models::dividend::{
    CalendarDay, DividendEvent, DividendStats, PayoutWindow, UpcomingDividends, Urgency,
};
use crate::models::fund::Fund;
use crate::models::portfolio::Portfolio;
use crate::services::schedule_service::ScheduleService;

/// Projects forward-looking dividend payments for held positions.
///
/// Pure calculation over in-memory data — funds come in as a parameter and
/// "today" is explicit, so projections are fully deterministic.
pub struct DividendService {
    schedule: ScheduleService,
}

impl DividendService {
    pub fn new() -> Self {
        Self {
            schedule: ScheduleService::new(),
        }
    }

    /// Project upcoming dividend payments within `horizon_days` of `today`.
    ///
    /// Positions with no matching fund, or whose fund lacks dividend data,
    /// are skipped silently — partial data is expected, not an error.
    /// The result is sorted ascending by ex-date (earliest first); downstream
    /// consumers render in list order without re-sorting.
    pub fn upcoming(
        &self,
        portfolio: &Portfolio,
        funds: &HashMap<String, Fund>,
        today: NaiveDate,
        horizon_days: i64,
    ) -> Vec<DividendEvent> {
        let cutoff = today + Duration::days(horizon_days);
        let mut events = Vec::new();

        for holding in portfolio.holdings.values() {
            let Some(fund) = funds.get(&holding.symbol) else {
                continue;
            };
            if !fund.has_dividend_data() {
                continue;
            }
            let Some(last_ex) = fund.last_ex_dividend_date else {
                continue;
            };

            let ex_date = self.schedule.next_ex_date(last_ex, fund.frequency);
            if ex_date < today || ex_date > cutoff {
                continue;
            }

            let days_until_ex = self.schedule.days_until(today, ex_date);
            events.push(DividendEvent {
                symbol: holding.symbol.clone(),
                name: fund.name.clone(),
                ex_date,
                pay_date: self.schedule.pay_date_for(ex_date),
                dividend_per_share: fund.dividend_per_share,
                shares: holding.shares,
                estimated_amount: fund.dividend_per_share * holding.shares,
                frequency: fund.frequency,
                days_until_ex,
                urgency: Urgency::from_days_until(days_until_ex),
            });
        }

        // Ascending by ex-date; symbol breaks ties so the order is stable
        // regardless of holdings-map iteration order.
        events.sort_by(|a, b| a.ex_date.cmp(&b.ex_date).then_with(|| a.symbol.cmp(&b.symbol)));
        events
    }

    /// Project upcoming payments and derive their summary statistics.
    pub fn upcoming_with_stats(
        &self,
        portfolio: &Portfolio,
        funds: &HashMap<String, Fund>,
        today: NaiveDate,
        horizon_days: i64,
    ) -> UpcomingDividends {
        let events = self.upcoming(portfolio, funds, today, horizon_days);
        let stats = Self::stats_for(&events);
        UpcomingDividends { events, stats }
    }

    /// Summary statistics over an already-projected event list.
    pub fn stats_for(events: &[DividendEvent]) -> DividendStats {
        let within = |days: i64| events.iter().filter(move |e| e.days_until_ex <= days);

        DividendStats {
            total_upcoming: events.len(),
            total_estimated_income: events.iter().map(|e| e.estimated_amount).sum(),
            next_7_days: within(7).count(),
            next_30_days: within(30).count(),
            next_7_days_income: within(7).map(|e| e.estimated_amount).sum(),
            next_30_days_income: within(30).map(|e| e.estimated_amount).sum(),
        }
    }

    /// Restrict a projected list to a display window.
    pub fn filter_by_window<'a>(
        &self,
        events: &'a [DividendEvent],
        today: NaiveDate,
        window: PayoutWindow,
    ) -> Vec<&'a DividendEvent> {
        match window.days() {
            None => events.iter().collect(),
            Some(days) => {
                let cutoff = today + Duration::days(days);
                events.iter().filter(|e| e.ex_date <= cutoff).collect()
            }
        }
    }

    /// Group projected events into a month calendar: day-of-month → events
    /// whose ex-date or pay-date falls on that day.
    pub fn calendar(
        &self,
        events: &[DividendEvent],
        year: i32,
        month: u32,
    ) -> BTreeMap<u32, CalendarDay> {
        let mut days: BTreeMap<u32, CalendarDay> = BTreeMap::new();

        for event in events {
            if event.ex_date.year() == year && event.ex_date.month() == month {
                days.entry(event.ex_date.day())
                    .or_default()
                    .ex
                    .push(event.clone());
            }
            if event.pay_date.year() == year && event.pay_date.month() == month {
                days.entry(event.pay_date.day())
                    .or_default()
                    .pay
                    .push(event.clone());
            }
        }

        days
    }
}

impl Default for DividendService {
    fn default() -> Self {
        Self::new()
    }
}
