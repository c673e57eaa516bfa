use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 品种登记项：内部键 -> 行情源代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    pub key: &'static str,
    pub provider_symbol: &'static str,
}

impl SymbolEntry {
    pub const fn new(key: &'static str, provider_symbol: &'static str) -> Self {
        Self { key, provider_symbol }
    }
}

/// 行情源返回的原始读数
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProviderQuote {
    pub last_price: Option<f64>,
    pub previous_close: Option<f64>,
}

/// 校验并取整后的单个品种行情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    #[serde(rename = "chgPct")]
    pub change_pct: f64,
    #[serde(rename = "src")]
    pub source: String,
}

/// 按登记顺序保存的键 -> 行情映射，序列化为 JSON 对象
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteMap(Vec<(String, Quote)>);

impl QuoteMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 插入行情；键已存在时覆盖原值并保留原位置
    pub fn insert(&mut self, key: &str, quote: Quote) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = quote,
            None => self.0.push((key.to_string(), quote)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Quote> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, q)| q)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Quote)> {
        self.0.iter().map(|(k, q)| (k.as_str(), q))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for QuoteMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, quote) in &self.0 {
            map.serialize_entry(key, quote)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QuoteMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct QuoteMapVisitor;

        impl<'de> Visitor<'de> for QuoteMapVisitor {
            type Value = QuoteMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of key to quote")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<QuoteMap, A::Error> {
                let mut quotes = QuoteMap::new();
                while let Some((key, quote)) = access.next_entry::<String, Quote>()? {
                    quotes.insert(&key, quote);
                }
                Ok(quotes)
            }
        }

        deserializer.deserialize_map(QuoteMapVisitor)
    }
}

/// 单次运行的完整输出
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub updated: String,
    pub data: QuoteMap,
    pub errors: Vec<String>,
}

/// 单个品种的抓取结果，成功与失败二选一
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Quote { key: String, quote: Quote },
    Error(String),
}

impl FetchOutcome {
    /// 构造 "<key>: <reason>" 形式的错误说明
    pub fn error(key: &str, reason: impl fmt::Display) -> Self {
        FetchOutcome::Error(format!("{}: {}", key, reason))
    }
}
