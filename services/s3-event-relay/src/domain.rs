// ドメイン層モジュール
pub mod alert_message;
pub mod notification_record;
pub mod persisted_entry;

// 再エクスポート
pub use alert_message::{ALERT_SUBJECT, AlertMessage};
pub use notification_record::{NotificationRecord, RecordError, SIZE_UNKNOWN};
pub use persisted_entry::PersistedEntry;
