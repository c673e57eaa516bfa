use crate::models::quote::ProviderQuote;
use crate::errors::{Result, SnapshotError};
use crate::providers::base::QuoteProvider;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use log::debug;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance 行情源，使用 v8 chart 接口
pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    /// 创建新的 Yahoo 行情源
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));
                headers
            })
            .build()
            .map_err(SnapshotError::RequestError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }
}

/// 解析 chart 接口响应，取 meta 中的最新价与昨收价
pub fn parse_chart_response(json: &Value) -> Result<ProviderQuote> {
    let chart = json.get("chart")
        .ok_or_else(|| SnapshotError::ProviderError("malformed chart response".to_string()))?;

    if let Some(error) = chart.get("error").filter(|e| !e.is_null()) {
        let description = error.get("description")
            .and_then(|d| d.as_str())
            .or_else(|| error.get("code").and_then(|c| c.as_str()))
            .unwrap_or("unknown provider error");
        return Err(SnapshotError::ProviderError(description.to_string()));
    }

    let meta = chart.get("result")
        .and_then(|r| r.as_array())
        .and_then(|r| r.first())
        .and_then(|r| r.get("meta"))
        .ok_or_else(|| SnapshotError::ProviderError("no data found, symbol may be delisted".to_string()))?;

    let last_price = meta.get("regularMarketPrice").and_then(|v| v.as_f64());
    let previous_close = meta.get("previousClose")
        .and_then(|v| v.as_f64())
        .or_else(|| meta.get("chartPreviousClose").and_then(|v| v.as_f64()));

    Ok(ProviderQuote { last_price, previous_close })
}

/// 根据 HTTP 状态与响应体得到行情读数
///
/// 出错时 Yahoo 仍可能返回带 chart.error 的 JSON，此时优先使用其中的描述；
/// 否则非成功状态统一报告为 "HTTP status ..."。
pub fn parse_response(status: StatusCode, body: &str) -> Result<ProviderQuote> {
    let json = match serde_json::from_str::<Value>(body) {
        Ok(json) => json,
        Err(_) if !status.is_success() => return Err(http_status_error(status)),
        Err(e) => return Err(SnapshotError::JsonError(e)),
    };

    if json.get("chart").is_none() && !status.is_success() {
        return Err(http_status_error(status));
    }

    parse_chart_response(&json)
}

fn http_status_error(status: StatusCode) -> SnapshotError {
    SnapshotError::ProviderError(format!("HTTP status {}", status))
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn provider_code(&self) -> &'static str {
        "YAHOO"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<ProviderQuote> {
        let response = self.client
            .get(self.chart_url(symbol))
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!("{} 响应状态 {}", symbol, status);

        parse_response(status, &text)
    }
}
