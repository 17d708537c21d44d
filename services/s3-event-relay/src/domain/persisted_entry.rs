/// イベント記録テーブルに書き込むエントリ
use uuid::Uuid;

use super::NotificationRecord;

/// テーブルに保存する1件分の記録
///
/// IDは書き込みごとに新しく生成するため、同じ通知が再配信されると
/// 別IDの重複エントリになる。
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedEntry {
    /// エントリID（UUID v4）
    pub id: String,
    /// バケット名
    pub bucket_name: String,
    /// オブジェクトキー
    pub object_key: String,
    /// オブジェクトサイズ（不明な場合は-1）
    pub size: i64,
    /// イベント名
    pub event_name: String,
    /// イベント発生時刻
    pub event_time: String,
}

impl PersistedEntry {
    /// 新しいIDを生成して通知からエントリを作成
    pub fn from_record(record: &NotificationRecord) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), record)
    }

    /// 明示的なIDでエントリを作成
    pub fn with_id(id: impl Into<String>, record: &NotificationRecord) -> Self {
        Self {
            id: id.into(),
            bucket_name: record.bucket_name.clone(),
            object_key: record.object_key.clone(),
            size: record.size,
            event_name: record.event_name.clone(),
            event_time: record.event_time.clone(),
        }
    }
}
