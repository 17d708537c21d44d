// インフラストラクチャ層モジュール
pub mod config;
pub mod entry_repository;
pub mod logging;
pub mod sns_ops;

// 再エクスポート
pub use config::{RelayConfig, RelayConfigError};
pub use entry_repository::{DynamoEntryRepository, EntryRepository, EntryRepositoryError};
pub use logging::{init_logging, invocation_span};
pub use sns_ops::{AwsSnsOps, PublishResult, SnsOps, SnsOpsError};
