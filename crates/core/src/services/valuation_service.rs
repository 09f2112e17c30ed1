use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::fund::{Frequency, Fund};
use crate::models::portfolio::Portfolio;
use crate::models::valuation::{PortfolioSummary, PositionValuation};

/// Joins ledger positions against current fund quotes to compute market
/// value, unrealized gain/loss, and projected dividend income.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Value every position and aggregate portfolio totals.
    ///
    /// A position whose symbol has no matching fund is priced at its own
    /// average cost — it shows zero gain/loss rather than an unpriced hole.
    pub fn summarize(
        &self,
        portfolio: &Portfolio,
        funds: &HashMap<String, Fund>,
        as_of_date: NaiveDate,
    ) -> PortfolioSummary {
        let mut positions = Vec::with_capacity(portfolio.holdings.len());

        for holding in portfolio.holdings.values() {
            let fund = funds.get(&holding.symbol);

            let current_price = match fund {
                Some(f) if f.price > 0.0 => f.price,
                _ => holding.avg_price,
            };
            let current_value = current_price * holding.shares;
            let gain_loss = current_value - holding.cost_basis;
            let gain_loss_pct = if holding.cost_basis > 0.0 {
                gain_loss / holding.cost_basis * 100.0
            } else {
                0.0
            };

            let (monthly_dividend, annual_dividend) = match fund {
                Some(f) if f.dividend_per_share > 0.0 => {
                    let annual = f.annual_dividend() * holding.shares;
                    (Self::monthly_rate(annual, f.frequency), annual)
                }
                _ => (0.0, 0.0),
            };

            positions.push(PositionValuation {
                holding: holding.clone(),
                current_price,
                current_value,
                gain_loss,
                gain_loss_pct,
                monthly_dividend,
                annual_dividend,
                allocation_pct: 0.0, // filled below, once the total is known
            });
        }

        let total_value: f64 = positions.iter().map(|p| p.current_value).sum();
        let total_cost: f64 = positions.iter().map(|p| p.holding.cost_basis).sum();
        let total_gain_loss = total_value - total_cost;
        let total_gain_loss_pct = if total_cost > 0.0 {
            total_gain_loss / total_cost * 100.0
        } else {
            0.0
        };

        for position in &mut positions {
            position.allocation_pct = if total_value > 0.0 {
                position.current_value / total_value * 100.0
            } else {
                0.0
            };
        }

        // Largest positions first, the order the dashboard renders them in.
        positions.sort_by(|a, b| {
            b.current_value
                .partial_cmp(&a.current_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        PortfolioSummary {
            as_of_date,
            total_value,
            total_cost,
            total_gain_loss,
            total_gain_loss_pct,
            monthly_income: positions.iter().map(|p| p.monthly_dividend).sum(),
            annual_income: positions.iter().map(|p| p.annual_dividend).sum(),
            positions,
        }
    }

    /// Convert annual dividend income to a true monthly rate.
    ///
    /// The per-payment amount is annualized first, then spread over the months
    /// each payment covers: annual÷4÷3 for quarterly (NOT annual÷4), ÷2÷6 for
    /// semi-annual, ÷12 for monthly and annual. `Unknown` is treated as
    /// quarterly, matching the projection fallback.
    fn monthly_rate(annual: f64, frequency: Frequency) -> f64 {
        match frequency {
            Frequency::Monthly => annual / 12.0,
            Frequency::Quarterly | Frequency::Unknown => annual / 4.0 / 3.0,
            Frequency::SemiAnnual => annual / 2.0 / 6.0,
            Frequency::Annual => annual / 12.0,
        }
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
