//! Alpaca REST adapter: historical bars from the market-data API and market
//! orders through the trading API.
//!
//! One blocking request per page, no retries. Failures are classified into
//! authentication, connectivity, retrieval and rejection errors and returned
//! to the caller as-is.

use crate::domain::config::BrokerConfig;
use crate::domain::error::CrossgateError;
use crate::domain::ohlcv::{Bar, BarSeries};
use crate::domain::order::Order;
use crate::domain::timeframe::Resolution;
use crate::ports::data_port::DataPort;
use crate::ports::order_port::OrderPort;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const PAGE_LIMIT: u32 = 10_000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct BarsPage {
    #[serde(default)]
    bars: Option<Vec<RawBar>>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBar {
    t: String,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

#[derive(Debug, Serialize, PartialEq)]
struct OrderRequest<'a> {
    symbol: &'a str,
    qty: String,
    side: &'a str,
    #[serde(rename = "type")]
    order_type: &'a str,
    time_in_force: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

pub struct AlpacaAdapter {
    client: Client,
    base_url: String,
    data_url: String,
    feed: Option<String>,
}

impl AlpacaAdapter {
    pub fn new(config: &BrokerConfig) -> Result<Self, CrossgateError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            HeaderValue::from_str(&config.credentials.key_id)
                .map_err(|_| CrossgateError::invalid("alpaca", "key_id", "not a valid header value"))?,
        );
        let mut secret = HeaderValue::from_str(&config.credentials.secret_key).map_err(|_| {
            CrossgateError::invalid("alpaca", "secret_key", "not a valid header value")
        })?;
        secret.set_sensitive(true);
        headers.insert("APCA-API-SECRET-KEY", secret);

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .user_agent(concat!("crossgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CrossgateError::Connectivity {
                endpoint: config.base_url.clone(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            data_url: config.data_url.trim_end_matches('/').to_string(),
            feed: config.feed.clone(),
        })
    }

    fn bars_url(&self, symbol: &str) -> String {
        format!("{}/v2/stocks/{}/bars", self.data_url, symbol)
    }

    fn orders_url(&self) -> String {
        format!("{}/v2/orders", self.base_url)
    }

    /// Query parameters for one page. The date range covers `start` 00:00:00
    /// through `end` 23:59:59 UTC.
    fn bars_query(
        &self,
        resolution: Resolution,
        start: NaiveDate,
        end: NaiveDate,
        page_token: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("timeframe", resolution.to_string()),
            ("start", day_bound(start, 0, 0, 0)),
            ("end", day_bound(end, 23, 59, 59)),
            ("limit", PAGE_LIMIT.to_string()),
            ("adjustment", "raw".to_string()),
        ];
        if let Some(feed) = &self.feed {
            query.push(("feed", feed.clone()));
        }
        if let Some(token) = page_token {
            query.push(("page_token", token.to_string()));
        }
        query
    }

    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
        endpoint: &str,
    ) -> Result<Response, CrossgateError> {
        request.send().map_err(|e| CrossgateError::Connectivity {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

fn day_bound(date: NaiveDate, h: u32, m: u32, s: u32) -> String {
    date.and_hms_opt(h, m, s)
        .map(|dt| dt.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| date.to_string())
}

/// Token for the next request, or `None` when paging is done. An empty or
/// repeated token ends paging.
fn next_page(current: Option<&str>, next: Option<String>) -> Option<String> {
    let next = next.filter(|t| !t.is_empty())?;
    if current == Some(next.as_str()) {
        warn!(token = %next, "bars page token repeated, stopping pagination");
        return None;
    }
    Some(next)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn convert_bars(raw: Vec<RawBar>) -> Result<Vec<Bar>, CrossgateError> {
    raw.into_iter()
        .map(|b| {
            let timestamp = DateTime::parse_from_rfc3339(&b.t)
                .map_err(|e| CrossgateError::DataRetrieval {
                    reason: format!("invalid bar timestamp '{}': {}", b.t, e),
                })?
                .with_timezone(&Utc);
            Ok(Bar {
                timestamp,
                open: b.o,
                high: b.h,
                low: b.l,
                close: b.c,
                volume: b.v.max(0.0).round() as u64,
            })
        })
        .collect()
}

fn data_status_error(status: StatusCode, body: &str) -> CrossgateError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CrossgateError::Authentication {
            reason: format!("market data request returned {}: {}", status, error_message(body)),
        },
        _ => CrossgateError::DataRetrieval {
            reason: format!("HTTP {}: {}", status, error_message(body)),
        },
    }
}

fn order_status_error(status: StatusCode, body: &str, order: &Order) -> CrossgateError {
    match status {
        StatusCode::UNAUTHORIZED => CrossgateError::Authentication {
            reason: format!("order request returned {}: {}", status, error_message(body)),
        },
        _ => CrossgateError::OrderRejected {
            symbol: order.symbol.clone(),
            side: order.side.to_string(),
            reason: format!("HTTP {}: {}", status, error_message(body)),
        },
    }
}

impl DataPort for AlpacaAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        resolution: Resolution,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, CrossgateError> {
        let url = self.bars_url(symbol);
        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let query = self.bars_query(resolution, start, end, page_token.as_deref());
            debug!(url = %url, ?query, "requesting bars page");

            let resp = self.send(self.client.get(&url).query(&query), &url)?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().unwrap_or_default();
                return Err(data_status_error(status, &body));
            }

            let page: BarsPage = resp.json().map_err(|e| CrossgateError::DataRetrieval {
                reason: format!("failed to parse bars for {}: {}", symbol, e),
            })?;
            bars.extend(convert_bars(page.bars.unwrap_or_default())?);

            match next_page(page_token.as_deref(), page.next_page_token) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        BarSeries::new(symbol, resolution, bars)
    }
}

impl OrderPort for AlpacaAdapter {
    fn submit(&self, order: &Order) -> Result<(), CrossgateError> {
        let url = self.orders_url();
        let request = OrderRequest {
            symbol: &order.symbol,
            qty: order.quantity.to_string(),
            side: order.side.as_str(),
            order_type: order.order_type.as_str(),
            time_in_force: order.time_in_force.as_str(),
        };
        info!(%order, "submitting order");

        let resp = self.send(self.client.post(&url).json(&request), &url)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(order_status_error(status, &body, order));
        }
        Ok(())
    }
}
