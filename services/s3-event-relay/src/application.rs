// アプリケーション層モジュール
pub mod event_relay_handler;

// 再エクスポート
pub use event_relay_handler::{EventRelayHandler, RelayHandlerError, RelaySummary};
