/// SNSに発行するアラートメッセージ
use super::NotificationRecord;

/// アラートの件名
pub const ALERT_SUBJECT: &str = "🔔 New File Uploaded to S3";

/// 1件の通知から作るアラート
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    /// 件名
    pub subject: String,
    /// 本文
    pub body: String,
}

impl AlertMessage {
    /// 通知の5項目を埋め込んだアラートを作成
    pub fn from_record(record: &NotificationRecord) -> Self {
        let body = format!(
            "📂 New S3 Event Detected\n\n\
             Bucket: {}\n\
             Object: {}\n\
             Size: {} bytes\n\
             Event: {}\n\
             Time: {}",
            record.bucket_name,
            record.object_key,
            record.size,
            record.event_name,
            record.event_time,
        );

        Self {
            subject: ALERT_SUBJECT.to_string(),
            body,
        }
    }
}
