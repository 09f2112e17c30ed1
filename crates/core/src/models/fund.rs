use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dividend payment cadence of a fund.
///
/// `Unknown` means the cadence could not be determined from history;
/// projection treats it as `Quarterly` (the documented fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Monthly,
    Quarterly,
    #[serde(rename = "Semi-annual")]
    SemiAnnual,
    Annual,
    Unknown,
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Monthly => write!(f, "Monthly"),
            Frequency::Quarterly => write!(f, "Quarterly"),
            Frequency::SemiAnnual => write!(f, "Semi-annual"),
            Frequency::Annual => write!(f, "Annual"),
            Frequency::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Inter-payment gaps wider than this many days no longer look monthly.
const MONTHLY_MAX_GAP_DAYS: f64 = 35.0;
const QUARTERLY_MAX_GAP_DAYS: f64 = 100.0;
const SEMI_ANNUAL_MAX_GAP_DAYS: f64 = 200.0;

/// How many of the most recent inter-payment gaps to average.
const MAX_GAPS_SAMPLED: usize = 4;

impl Frequency {
    /// Estimate the payment cadence from historical ex-dividend dates.
    ///
    /// Averages up to the 4 most recent inter-payment gaps and buckets the
    /// result. Fewer than 2 dates → `Unknown`. This is a heuristic: special
    /// dividends and cadence changes will skew it, so the inferred value is
    /// exposed on the `Fund` for callers to override.
    pub fn infer(ex_dates: &[NaiveDate]) -> Self {
        if ex_dates.len() < 2 {
            return Frequency::Unknown;
        }

        let mut dates = ex_dates.to_vec();
        dates.sort_unstable_by(|a, b| b.cmp(a)); // newest first

        let gaps: Vec<i64> = dates
            .windows(2)
            .take(MAX_GAPS_SAMPLED)
            .map(|pair| (pair[0] - pair[1]).num_days())
            .collect();

        let avg = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;

        if avg <= MONTHLY_MAX_GAP_DAYS {
            Frequency::Monthly
        } else if avg <= QUARTERLY_MAX_GAP_DAYS {
            Frequency::Quarterly
        } else if avg <= SEMI_ANNUAL_MAX_GAP_DAYS {
            Frequency::SemiAnnual
        } else {
            Frequency::Annual
        }
    }

    /// Calendar months between consecutive payments.
    /// `Unknown` falls back to the quarterly cadence.
    pub fn months_between_payments(&self) -> u32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::Quarterly | Frequency::Unknown => 3,
            Frequency::SemiAnnual => 6,
            Frequency::Annual => 12,
        }
    }

    /// Payments per year. `Unknown` falls back to quarterly.
    pub fn payments_per_year(&self) -> u32 {
        match self {
            Frequency::Monthly => 12,
            Frequency::Quarterly | Frequency::Unknown => 4,
            Frequency::SemiAnnual => 2,
            Frequency::Annual => 1,
        }
    }
}

/// Snapshot of one tradable fund, as supplied by a market-data provider.
///
/// Immutable once fetched — a refresh replaces the whole record rather than
/// patching fields. The core only reads these; it never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    /// Ticker symbol, uppercased (e.g., "SCHD", "SPY")
    pub symbol: String,

    /// Human-readable fund name
    pub name: String,

    /// Latest known price per share
    pub price: f64,

    /// Per-payment dividend amount per share (0.0 when the fund pays none)
    pub dividend_per_share: f64,

    /// Most recent ex-dividend date, if any dividend history exists
    pub last_ex_dividend_date: Option<NaiveDate>,

    /// Payment cadence (usually inferred from history, see `Frequency::infer`)
    pub frequency: Frequency,

    /// Sector / category tag (e.g., "Dividend Equity", "ETF")
    pub sector: String,
}

impl Fund {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        dividend_per_share: f64,
        last_ex_dividend_date: Option<NaiveDate>,
        frequency: Frequency,
        sector: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            price,
            dividend_per_share,
            last_ex_dividend_date,
            frequency,
            sector: sector.into(),
        }
    }

    /// Whether this fund carries enough dividend data to project payments.
    /// Funds without it are silently skipped by the projector.
    pub fn has_dividend_data(&self) -> bool {
        self.dividend_per_share > 0.0 && self.last_ex_dividend_date.is_some()
    }

    /// Annualized dividend per share (per-payment amount × payments per year).
    pub fn annual_dividend(&self) -> f64 {
        self.dividend_per_share * f64::from(self.frequency.payments_per_year())
    }

    /// Trailing dividend yield in percent. 0 when the price is unknown.
    pub fn dividend_yield(&self) -> f64 {
        if self.price > 0.0 {
            self.annual_dividend() / self.price * 100.0
        } else {
            0.0
        }
    }
}
