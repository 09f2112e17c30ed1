use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fund::Frequency;

/// How soon a projected payment occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    /// Ex-date within 7 days
    High,
    /// Ex-date within 30 days
    Medium,
    /// Everything further out
    Low,
}

impl Urgency {
    pub fn from_days_until(days: i64) -> Self {
        if days <= 7 {
            Urgency::High
        } else if days <= 30 {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::High => write!(f, "high"),
            Urgency::Medium => write!(f, "medium"),
            Urgency::Low => write!(f, "low"),
        }
    }
}

/// One projected future dividend payment for a held fund.
///
/// Value object — recomputed on every query, never persisted.
/// Invariants: `today ≤ ex_date ≤ today + horizon` and `pay_date > ex_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    pub symbol: String,
    pub name: String,

    /// Projected next ex-dividend date
    pub ex_date: NaiveDate,

    /// Projected payment date (ex-date plus the business-day offset)
    pub pay_date: NaiveDate,

    pub dividend_per_share: f64,

    /// Shares held at projection time
    pub shares: f64,

    /// `dividend_per_share × shares`
    pub estimated_amount: f64,

    pub frequency: Frequency,

    /// Whole days from "today" to the ex-date, never negative
    pub days_until_ex: i64,

    pub urgency: Urgency,
}

/// Summary statistics over a projected dividend list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendStats {
    /// Number of projected payments within the horizon
    pub total_upcoming: usize,

    /// Sum of all estimated amounts
    pub total_estimated_income: f64,

    /// Payments with an ex-date within 7 days
    pub next_7_days: usize,

    /// Payments with an ex-date within 30 days
    pub next_30_days: usize,

    pub next_7_days_income: f64,
    pub next_30_days_income: f64,
}

/// Projected payments plus their summary, as rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingDividends {
    pub events: Vec<DividendEvent>,
    pub stats: DividendStats,
}

/// Time window used to filter a projected dividend list for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutWindow {
    /// Next 7 days
    Week,
    /// Next 30 days
    Month,
    /// Next 90 days
    Quarter,
    All,
}

impl PayoutWindow {
    /// Window length in days, `None` for `All`.
    pub fn days(&self) -> Option<i64> {
        match self {
            PayoutWindow::Week => Some(7),
            PayoutWindow::Month => Some(30),
            PayoutWindow::Quarter => Some(90),
            PayoutWindow::All => None,
        }
    }
}

/// Events landing on one day of a calendar month, split by date kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Events whose ex-date falls on this day
    pub ex: Vec<DividendEvent>,
    /// Events whose pay-date falls on this day
    pub pay: Vec<DividendEvent>,
}
