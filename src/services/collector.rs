use crate::config::Config;
use crate::models::quote::{FetchOutcome, ProviderQuote, Quote, QuoteMap, Snapshot, SymbolEntry};
use crate::providers::base::QuoteProvider;
use crate::util;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::fmt;
use std::sync::Arc;

/// 快照收集器：逐个品种抓取行情，失败单独记录，不中断整个流程
pub struct SnapshotCollector {
    provider: Arc<dyn QuoteProvider + Send + Sync>,
    source_tag: String,
}

impl SnapshotCollector {
    pub fn new(config: &Config, provider: Arc<dyn QuoteProvider + Send + Sync>) -> Self {
        Self {
            provider,
            source_tag: config.source_tag.clone(),
        }
    }

    /// 抓取并校验单个品种，所有失败都转换为错误说明
    pub async fn collect_one(&self, entry: &SymbolEntry) -> FetchOutcome {
        let reading = match self.provider.fetch_quote(entry.provider_symbol).await {
            Ok(reading) => reading,
            Err(e) => {
                error!("[ERR] {} ({}): {}", entry.key, entry.provider_symbol, e);
                return FetchOutcome::error(entry.key, e);
            }
        };

        match self.to_quote(&reading) {
            Some(quote) => {
                info!("[OK] {} ({}): {:.2} ({:+.2}%)",
                      entry.key, entry.provider_symbol, quote.price, quote.change_pct);
                FetchOutcome::Quote { key: entry.key.to_string(), quote }
            }
            None => {
                warn!("[SKIP] {}: price={}, prev={}", entry.key,
                      util::format_optional(reading.last_price),
                      util::format_optional(reading.previous_close));
                FetchOutcome::error(entry.key, "no price")
            }
        }
    }

    // 最新价须存在且非零，昨收价须为正数；计算结果溢出时同样视为无价格
    fn to_quote(&self, reading: &ProviderQuote) -> Option<Quote> {
        let price = reading.last_price.filter(|p| p.is_finite() && *p != 0.0)?;
        let prev = reading.previous_close.filter(|p| p.is_finite() && *p > 0.0)?;

        let change_pct = util::round2(util::change_pct(price, prev));
        let price = util::round2(price);
        if !price.is_finite() || !change_pct.is_finite() {
            return None;
        }

        Some(Quote {
            price,
            change_pct,
            source: self.source_tag.clone(),
        })
    }

    /// 按登记顺序抓取全部品种，时间戳取运行开始时刻
    pub async fn collect_all(&self, entries: &[SymbolEntry]) -> Snapshot {
        self.collect_all_at(entries, Utc::now()).await
    }

    pub async fn collect_all_at(&self, entries: &[SymbolEntry], started: DateTime<Utc>) -> Snapshot {
        info!("Collecting {} symbols from {}", entries.len(), self.provider.provider_code());

        let mut data = QuoteMap::new();
        let mut errors = Vec::new();

        for entry in entries {
            match self.collect_one(entry).await {
                FetchOutcome::Quote { key, quote } => data.insert(&key, quote),
                FetchOutcome::Error(note) => errors.push(note),
            }
        }

        Snapshot {
            updated: util::format_timestamp(&started),
            data,
            errors,
        }
    }
}

/// 行情源不可用时的快照：每个品种记一条相同原因的错误说明
pub fn unavailable_snapshot(entries: &[SymbolEntry], reason: &dyn fmt::Display, started: DateTime<Utc>) -> Snapshot {
    error!("Provider unavailable, recording {} symbols as errors: {}", entries.len(), reason);
    let errors = entries.iter()
        .map(|entry| format!("{}: {}", entry.key, reason))
        .collect();

    Snapshot {
        updated: util::format_timestamp(&started),
        data: QuoteMap::new(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Result, SnapshotError};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 内存行情源：未登记的代码返回 "unknown symbol" 错误
    #[derive(Default)]
    pub struct MockProvider {
        readings: HashMap<String, std::result::Result<ProviderQuote, String>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl MockProvider {
        pub fn with_quote(mut self, symbol: &str, price: Option<f64>, prev: Option<f64>) -> Self {
            self.readings.insert(symbol.to_string(), Ok(ProviderQuote { last_price: price, previous_close: prev }));
            self
        }

        pub fn with_failure(mut self, symbol: &str, message: &str) -> Self {
            self.readings.insert(symbol.to_string(), Err(message.to_string()));
            self
        }
    }

    #[async_trait]
    impl QuoteProvider for MockProvider {
        fn provider_code(&self) -> &'static str {
            "MOCK"
        }

        async fn fetch_quote(&self, symbol: &str) -> Result<ProviderQuote> {
            self.calls.lock().unwrap().push(symbol.to_string());
            match self.readings.get(symbol) {
                Some(Ok(reading)) => Ok(*reading),
                Some(Err(message)) => Err(SnapshotError::ProviderError(message.clone())),
                None => Err(SnapshotError::ProviderError("unknown symbol".to_string())),
            }
        }
    }

    fn collector(provider: MockProvider) -> SnapshotCollector {
        SnapshotCollector::new(&Config::new(), Arc::new(provider))
    }

    fn entry(key: &'static str, symbol: &'static str) -> SymbolEntry {
        SymbolEntry::new(key, symbol)
    }

    #[tokio::test]
    async fn test_collect_one_success() {
        let c = collector(MockProvider::default().with_quote("X", Some(105.0), Some(100.0)));
        let outcome = c.collect_one(&entry("a", "X")).await;
        assert_eq!(outcome, FetchOutcome::Quote {
            key: "a".to_string(),
            quote: Quote { price: 105.0, change_pct: 5.0, source: "GHA".to_string() },
        });
    }

    #[tokio::test]
    async fn test_collect_one_rounds_values() {
        let c = collector(MockProvider::default().with_quote("X", Some(123.4567), Some(120.0)));
        match c.collect_one(&entry("a", "X")).await {
            FetchOutcome::Quote { quote, .. } => {
                assert_eq!(quote.price, 123.46);
                assert_eq!(quote.change_pct, util::round2((123.4567 - 120.0) / 120.0 * 100.0));
                assert_eq!(quote.change_pct, 2.88);
            }
            other => panic!("expected quote, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_previous_close_is_no_price() {
        let c = collector(MockProvider::default().with_quote("X", Some(50.0), Some(0.0)));
        assert_eq!(c.collect_one(&entry("a", "X")).await, FetchOutcome::Error("a: no price".to_string()));
    }

    #[tokio::test]
    async fn test_negative_previous_close_is_no_price() {
        let c = collector(MockProvider::default().with_quote("X", Some(50.0), Some(-3.0)));
        assert_eq!(c.collect_one(&entry("a", "X")).await, FetchOutcome::Error("a: no price".to_string()));
    }

    #[tokio::test]
    async fn test_missing_values_are_no_price() {
        let c = collector(MockProvider::default()
            .with_quote("P", None, Some(100.0))
            .with_quote("Q", Some(100.0), None)
            .with_quote("R", Some(f64::NAN), Some(100.0)));
        for (key, symbol) in [("p", "P"), ("q", "Q"), ("r", "R")] {
            let outcome = c.collect_one(&SymbolEntry::new(key, symbol)).await;
            assert_eq!(outcome, FetchOutcome::Error(format!("{}: no price", key)));
        }
    }

    #[tokio::test]
    async fn test_overflowing_values_are_no_price() {
        let c = collector(MockProvider::default()
            .with_quote("HUGE", Some(1e307), Some(1e307))
            .with_quote("TINY", Some(100.0), Some(1e-310)));
        let snapshot = c.collect_all(&[entry("huge", "HUGE"), entry("tiny", "TINY")]).await;

        assert!(snapshot.data.is_empty());
        assert_eq!(snapshot.errors, vec!["huge: no price".to_string(), "tiny: no price".to_string()]);
    }

    #[tokio::test]
    async fn test_provider_failure_is_recovered() {
        let c = collector(MockProvider::default().with_failure("X", "timeout"));
        assert_eq!(c.collect_one(&entry("a", "X")).await, FetchOutcome::Error("a: timeout".to_string()));
    }

    #[tokio::test]
    async fn test_collect_all_single_success() {
        let c = collector(MockProvider::default().with_quote("X", Some(110.0), Some(100.0)));
        let snapshot = c.collect_all(&[entry("a", "X")]).await;

        let mut expected = QuoteMap::new();
        expected.insert("a", Quote { price: 110.0, change_pct: 10.0, source: "GHA".to_string() });
        assert_eq!(snapshot.data, expected);
        assert!(snapshot.errors.is_empty());
    }

    #[tokio::test]
    async fn test_collect_all_all_failures_keep_order() {
        let c = collector(MockProvider::default()
            .with_failure("X", "timeout")
            .with_quote("Y", Some(50.0), Some(0.0)));
        let snapshot = c.collect_all(&[entry("a", "X"), entry("b", "Y")]).await;

        assert!(snapshot.data.is_empty());
        assert_eq!(snapshot.errors, vec!["a: timeout".to_string(), "b: no price".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_iteration() {
        let provider = Arc::new(MockProvider::default()
            .with_quote("A", Some(10.0), Some(8.0))
            .with_failure("B", "boom")
            .with_quote("C", Some(20.0), Some(25.0)));
        let c = SnapshotCollector::new(&Config::new(), provider.clone());
        let entries = [entry("a", "A"), entry("b", "B"), entry("c", "C"), entry("d", "D")];

        let snapshot = c.collect_all(&entries).await;

        assert_eq!(*provider.calls.lock().unwrap(), vec!["A", "B", "C", "D"]);
        assert_eq!(snapshot.data.len() + snapshot.errors.len(), entries.len());
        assert_eq!(snapshot.data.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(snapshot.data.get("c").map(|q| q.change_pct), Some(-20.0));
        assert_eq!(snapshot.errors, vec!["b: boom".to_string(), "d: unknown symbol".to_string()]);
    }

    #[tokio::test]
    async fn test_timestamp_uses_start_instant() {
        let c = collector(MockProvider::default());
        let started = Utc.with_ymd_and_hms(2025, 6, 2, 3, 45, 0).unwrap();
        let snapshot = c.collect_all_at(&[], started).await;
        assert_eq!(snapshot.updated, "2025-06-02T03:45:00Z");
        assert!(snapshot.data.is_empty() && snapshot.errors.is_empty());
    }

    #[test]
    fn test_unavailable_snapshot_records_every_entry() {
        let started = Utc.with_ymd_and_hms(2025, 6, 2, 4, 0, 0).unwrap();
        let reason = SnapshotError::ProviderError("client init failed".to_string());
        let snapshot = unavailable_snapshot(&[entry("a", "X"), entry("b", "Y")], &reason, started);

        assert_eq!(snapshot.updated, "2025-06-02T04:00:00Z");
        assert!(snapshot.data.is_empty());
        assert_eq!(snapshot.errors, vec!["a: client init failed".to_string(), "b: client init failed".to_string()]);
    }

    #[tokio::test]
    async fn test_custom_source_tag() {
        let config = Config::new().with_source_tag("LOCAL");
        let provider = MockProvider::default().with_quote("X", Some(2.0), Some(1.0));
        let c = SnapshotCollector::new(&config, Arc::new(provider));
        match c.collect_one(&entry("a", "X")).await {
            FetchOutcome::Quote { quote, .. } => assert_eq!(quote.source, "LOCAL"),
            other => panic!("expected quote, got {:?}", other),
        }
    }
}
