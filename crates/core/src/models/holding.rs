use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's aggregated stake in one fund.
///
/// Exactly one `Holding` exists per symbol — repeat purchases merge into the
/// existing record via weighted-average cost (see `merge_purchase`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol, uppercased — the ledger key
    pub symbol: String,

    /// Fund display name, captured at purchase time
    pub name: String,

    /// Sector tag, captured at purchase time
    pub sector: String,

    /// Total shares held (always > 0)
    pub shares: f64,

    /// Weighted-average cost per share
    pub avg_price: f64,

    /// Total amount paid: `shares × avg_price`, equal to the sum of all lot costs
    pub cost_basis: f64,

    /// Date of the most recent purchase (overwritten on merge, not accumulated)
    pub purchase_date: NaiveDate,
}

impl Holding {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        sector: impl Into<String>,
        shares: f64,
        price_per_share: f64,
        purchase_date: NaiveDate,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            sector: sector.into(),
            shares,
            avg_price: price_per_share,
            cost_basis: shares * price_per_share,
            purchase_date,
        }
    }

    /// Merge a new purchase lot into this holding using weighted-average cost.
    ///
    /// The merge works on cost totals, not averages, so repeated merges carry
    /// no drift beyond normal f64 precision:
    /// `new_cost = old_cost + shares × price; avg = new_cost / new_shares`.
    pub fn merge_purchase(&mut self, shares: f64, price_per_share: f64, date: NaiveDate) {
        let added_cost = shares * price_per_share;
        self.shares += shares;
        self.cost_basis += added_cost;
        self.avg_price = self.cost_basis / self.shares;
        // Most recent purchase wins; lot-level history lives in the transactions.
        self.purchase_date = date;
    }
}

/// Kind of a ledger transaction. Only purchases exist today; removal of a
/// position is not a trade and leaves the audit trail untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Buy,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Buy => write!(f, "buy"),
        }
    }
}

/// Immutable audit record of one purchase event.
///
/// Append-only: exactly one is created per `add_holding` call, whether or not
/// the purchase merged into an existing position. Never mutated or merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub symbol: String,
    pub name: String,
    pub shares: f64,

    /// Price per share paid in this lot
    pub price: f64,

    /// `shares × price`
    pub total: f64,

    /// Trade date (daily granularity)
    pub date: NaiveDate,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a buy record for one purchase lot.
    pub fn buy(
        symbol: impl Into<String>,
        name: impl Into<String>,
        shares: f64,
        price: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Buy,
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            shares,
            price,
            total: shares * price,
            date,
            created_at: Utc::now(),
        }
    }
}
