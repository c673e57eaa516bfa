// 公开导出的模块，供外部使用
pub mod models;
pub mod providers;
pub mod registry;
pub mod errors;
pub mod services;

// 命令行程序使用的辅助模块
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod util;

// 重新导出常用类型，方便使用
pub use models::quote::{FetchOutcome, ProviderQuote, Quote, QuoteMap, Snapshot, SymbolEntry};
pub use providers::base::QuoteProvider;
pub use services::collector::SnapshotCollector;
pub use services::writer::{read_snapshot, write_snapshot};
pub use errors::{Result, SnapshotError};
