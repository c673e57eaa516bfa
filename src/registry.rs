use crate::errors::{Result, SnapshotError};
use crate::models::quote::SymbolEntry;

/// 固定品种表，顺序决定日志、错误及输出中 data 的顺序
pub const REGISTRY: &[SymbolEntry] = &[
    // 全球指数与商品
    SymbolEntry::new("sp", "^GSPC"),
    SymbolEntry::new("ndq", "^IXIC"),
    SymbolEntry::new("dji", "^DJI"),
    SymbolEntry::new("inr", "INR=X"),
    SymbolEntry::new("crude", "CL=F"),
    SymbolEntry::new("gold", "GC=F"),
    SymbolEntry::new("silver", "SI=F"),
    // 印度指数
    SymbolEntry::new("n50", "^NSEI"),
    SymbolEntry::new("bn", "^NSEBANK"),
    SymbolEntry::new("sx", "^BSESN"),
    SymbolEntry::new("fn", "NIFTY_FIN_SERVICE.NS"),
    SymbolEntry::new("vix", "^INDIAVIX"),
    // Nifty 前十大成分股
    SymbolEntry::new("t_RELIANCE", "RELIANCE.NS"),
    SymbolEntry::new("t_HDFCBANK", "HDFCBANK.NS"),
    SymbolEntry::new("t_ICICIBANK", "ICICIBANK.NS"),
    SymbolEntry::new("t_INFY", "INFY.NS"),
    SymbolEntry::new("t_TCS", "TCS.NS"),
    SymbolEntry::new("t_AIRTEL", "BHARTIARTL.NS"),
    SymbolEntry::new("t_ITC", "ITC.NS"),
    SymbolEntry::new("t_SBI", "SBIN.NS"),
    SymbolEntry::new("t_KOTAK", "KOTAKBANK.NS"),
    SymbolEntry::new("t_LT", "LT.NS"),
    // 美股市值前十
    SymbolEntry::new("u_AAPL", "AAPL"),
    SymbolEntry::new("u_MSFT", "MSFT"),
    SymbolEntry::new("u_NVDA", "NVDA"),
    SymbolEntry::new("u_AMZN", "AMZN"),
    SymbolEntry::new("u_GOOGL", "GOOGL"),
    SymbolEntry::new("u_META", "META"),
    SymbolEntry::new("u_TSLA", "TSLA"),
    SymbolEntry::new("u_BRK", "BRK-B"),
    SymbolEntry::new("u_JPM", "JPM"),
    SymbolEntry::new("u_UNH", "UNH"),
];

/// 按登记顺序枚举所有品种
pub fn entries() -> &'static [SymbolEntry] {
    REGISTRY
}

pub fn find(key: &str) -> Option<&'static SymbolEntry> {
    REGISTRY.iter().find(|e| e.key == key)
}

/// 选出指定键对应的品种，结果仍按登记顺序排列
pub fn select(keys: &[&str]) -> Result<Vec<SymbolEntry>> {
    let unknown: Vec<&str> = keys.iter()
        .copied()
        .filter(|k| find(k).is_none())
        .collect();
    if !unknown.is_empty() {
        return Err(SnapshotError::DataError(format!("Unknown symbol keys: {}", unknown.join(", "))));
    }

    Ok(REGISTRY.iter()
        .filter(|e| keys.contains(&e.key))
        .copied()
        .collect())
}
