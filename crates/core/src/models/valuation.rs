use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// One holding joined against its current fund quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionValuation {
    /// The underlying ledger position
    pub holding: Holding,

    /// Fund's latest price, or the holding's own average cost when no fund
    /// matches (an unknown symbol never values at null — it shows no gain).
    pub current_price: f64,

    /// `current_price × shares`
    pub current_value: f64,

    /// `current_value − cost_basis`
    pub gain_loss: f64,

    /// Percentage gain/loss against cost basis; 0 when the basis is 0
    pub gain_loss_pct: f64,

    /// Projected dividend income per month from this position
    pub monthly_dividend: f64,

    /// Projected dividend income per year from this position
    pub annual_dividend: f64,

    /// This position's share of total portfolio value, in percent
    pub allocation_pct: f64,
}

/// Full portfolio valuation at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Date this summary was computed for
    pub as_of_date: NaiveDate,

    /// Sum of all position values
    pub total_value: f64,

    /// Sum of all cost bases
    pub total_cost: f64,

    /// `total_value − total_cost`
    pub total_gain_loss: f64,

    /// Percentage return on cost; 0 when nothing is invested
    pub total_gain_loss_pct: f64,

    /// Projected dividend income per month across all positions
    pub monthly_income: f64,

    /// Projected dividend income per year across all positions
    pub annual_income: f64,

    /// Per-position breakdown, sorted by current value (largest first)
    pub positions: Vec<PositionValuation>,
}
