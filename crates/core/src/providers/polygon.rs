use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Mutex;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

use crate::errors::CoreError;
use crate::models::fund::{Frequency, Fund};
#[cfg(not(target_arch = "wasm32"))]
use super::rate_limit::SlidingWindowLimiter;
use super::traits::{FundDataProvider, TickerMatch};

const BASE_URL: &str = "https://api.polygon.io";

/// How many historical dividends to pull per fund — enough to infer the
/// payment cadence from recent gaps.
const DIVIDEND_HISTORY_LIMIT: u32 = 12;

/// Polygon.io provider, tuned for the Stocks Starter plan.
///
/// - **Requires**: API key (set via settings as "polygon").
/// - **Data**: previous-day close (15-min delayed), reference dividends,
///   ticker details. No real-time quotes on this plan.
/// - **Limits**: 5 requests/minute — enforced by a sliding-window limiter
///   before every request, so batch refreshes pace themselves.
pub struct PolygonProvider {
    client: Client,
    api_key: String,
    #[cfg(not(target_arch = "wasm32"))]
    limiter: Mutex<SlidingWindowLimiter>,
}

impl PolygonProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
            #[cfg(not(target_arch = "wasm32"))]
            limiter: Mutex::new(SlidingWindowLimiter::polygon_starter()),
        }
    }

    /// Block until the rate limiter has room, then record the call.
    /// On wasm the browser tab makes one gated refresh a day, so the
    /// 24-hour refresh gate is the effective limit there.
    async fn enforce_rate_limit(&self) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let wait = match self.limiter.lock() {
                Ok(mut limiter) => limiter.wait_time(Instant::now()),
                Err(_) => Duration::ZERO,
            };
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
            if let Ok(mut limiter) = self.limiter.lock() {
                limiter.record(Instant::now());
            }
        }
    }

    /// GET a Polygon endpoint and decode the JSON body.
    /// Translates the plan-specific status codes into useful errors.
    async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CoreError> {
        self.enforce_rate_limit().await;

        let url = format!("{BASE_URL}{path}");
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        match response.status().as_u16() {
            429 => {
                return Err(CoreError::Api {
                    provider: "Polygon".into(),
                    message: "Rate limit exceeded — wait before making more requests".into(),
                })
            }
            403 => {
                return Err(CoreError::Api {
                    provider: "Polygon".into(),
                    message: format!(
                        "Access denied for {path} — endpoint may not be available on the Starter plan"
                    ),
                })
            }
            status if !(200..300).contains(&status) => {
                return Err(CoreError::Api {
                    provider: "Polygon".into(),
                    message: format!("Request to {path} failed with status {status}"),
                })
            }
            _ => {}
        }

        response.json().await.map_err(|e| CoreError::Api {
            provider: "Polygon".into(),
            message: format!("Failed to parse response from {path}: {e}"),
        })
    }

    /// Previous trading day's closing price.
    async fn fetch_previous_close(&self, symbol: &str) -> Result<f64, CoreError> {
        let resp: PrevDayResponse = self
            .request(&format!("/v2/aggs/ticker/{symbol}/prev"), &[])
            .await?;

        resp.results
            .and_then(|aggs| aggs.into_iter().next())
            .map(|agg| agg.close)
            .ok_or_else(|| CoreError::Api {
                provider: "Polygon".into(),
                message: format!("No price data found for {symbol}"),
            })
    }

    /// Recent dividend records, newest first.
    async fn fetch_dividends(&self, symbol: &str) -> Result<Vec<DividendRecord>, CoreError> {
        let limit = DIVIDEND_HISTORY_LIMIT.to_string();
        let resp: DividendsResponse = self
            .request(
                "/v3/reference/dividends",
                &[
                    ("ticker", symbol),
                    ("limit", limit.as_str()),
                    ("sort", "ex_dividend_date"),
                    ("order", "desc"),
                ],
            )
            .await?;

        Ok(resp.results.unwrap_or_default())
    }

    /// Ticker name and sector classification.
    async fn fetch_ticker_details(&self, symbol: &str) -> Result<TickerInfo, CoreError> {
        let resp: TickerDetailsResponse = self
            .request(&format!("/v3/reference/tickers/{symbol}"), &[])
            .await?;

        resp.results.ok_or_else(|| CoreError::Api {
            provider: "Polygon".into(),
            message: format!("No ticker data found for {symbol}"),
        })
    }
}

// ── Polygon API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct PrevDayResponse {
    results: Option<Vec<PrevAgg>>,
}

#[derive(Deserialize)]
struct PrevAgg {
    #[serde(rename = "c")]
    close: f64,
}

#[derive(Deserialize)]
struct DividendsResponse {
    results: Option<Vec<DividendRecord>>,
}

#[derive(Deserialize)]
struct DividendRecord {
    cash_amount: f64,
    ex_dividend_date: String,
}

#[derive(Deserialize)]
struct TickerDetailsResponse {
    results: Option<TickerInfo>,
}

#[derive(Deserialize)]
struct TickerInfo {
    ticker: String,
    name: String,
    sic_description: Option<String>,
}

#[derive(Deserialize)]
struct TickerSearchResponse {
    results: Option<Vec<TickerInfo>>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FundDataProvider for PolygonProvider {
    fn name(&self) -> &str {
        "Polygon"
    }

    async fn fetch_fund(&self, symbol: &str) -> Result<Fund, CoreError> {
        let symbol = symbol.trim().to_uppercase();

        let ticker = self.fetch_ticker_details(&symbol).await?;
        let dividends = self.fetch_dividends(&symbol).await?;
        let price = self.fetch_previous_close(&symbol).await?;

        let mut ex_dates: Vec<NaiveDate> = dividends
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(&d.ex_dividend_date, "%Y-%m-%d").ok())
            .collect();
        ex_dates.sort_unstable_by(|a, b| b.cmp(a));

        let frequency = Frequency::infer(&ex_dates);
        let dividend_per_share = dividends.first().map(|d| d.cash_amount).unwrap_or(0.0);

        Ok(Fund::new(
            ticker.ticker,
            ticker.name,
            price,
            dividend_per_share,
            ex_dates.first().copied(),
            frequency,
            ticker.sic_description.unwrap_or_else(|| "ETF".to_string()),
        ))
    }

    async fn search(&self, query: &str) -> Result<Vec<TickerMatch>, CoreError> {
        let resp: TickerSearchResponse = self
            .request(
                "/v3/reference/tickers",
                &[
                    ("search", query),
                    ("type", "ETF"),
                    ("market", "stocks"),
                    ("active", "true"),
                    ("limit", "10"),
                ],
            )
            .await?;

        Ok(resp
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|t| TickerMatch {
                symbol: t.ticker,
                name: t.name,
            })
            .collect())
    }
}
