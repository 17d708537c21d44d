/// S3イベント通知レコード
///
/// Lambdaに届くS3通知イベントの`Records`配列の1要素から、
/// 記録・通知に必要なフィールドを抽出する。
use serde_json::Value;
use thiserror::Error;

/// サイズが通知に含まれない場合に使う値
pub const SIZE_UNKNOWN: i64 = -1;

const BUCKET_NAME_PATH: &str = "s3.bucket.name";
const OBJECT_KEY_PATH: &str = "s3.object.key";
const OBJECT_SIZE_PATH: &str = "s3.object.size";
const EVENT_NAME_PATH: &str = "eventName";
const EVENT_TIME_PATH: &str = "eventTime";

/// レコード抽出のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordError {
    /// 必須フィールドが存在しない
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// フィールドの型が不正
    #[error("Invalid field: {0}")]
    InvalidField(&'static str),
}

/// 1件のS3イベント通知
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRecord {
    /// バケット名
    pub bucket_name: String,
    /// オブジェクトキー（URLエンコードされたまま保持する）
    pub object_key: String,
    /// オブジェクトサイズ（バイト）。不明な場合は`SIZE_UNKNOWN`
    pub size: i64,
    /// イベント名（例: "ObjectCreated:Put"）
    pub event_name: String,
    /// イベント発生時刻（通知に含まれる文字列そのまま）
    pub event_time: String,
}

impl NotificationRecord {
    /// 生のJSONレコードから通知を抽出する
    ///
    /// `s3.object.size`のみ省略可能で、欠落または`null`の場合は`SIZE_UNKNOWN`になる。
    /// それ以外のフィールドが欠落していれば`RecordError::MissingField`を返す。
    pub fn from_json(record: &Value) -> Result<Self, RecordError> {
        let s3 = record.get("s3");
        let bucket = s3.and_then(|v| v.get("bucket"));
        let object = s3.and_then(|v| v.get("object"));

        let bucket_name = required_str(bucket.and_then(|v| v.get("name")), BUCKET_NAME_PATH)?;
        let object_key = required_str(object.and_then(|v| v.get("key")), OBJECT_KEY_PATH)?;

        let size = match object.and_then(|v| v.get("size")) {
            None | Some(Value::Null) => SIZE_UNKNOWN,
            Some(value) => value
                .as_i64()
                .ok_or(RecordError::InvalidField(OBJECT_SIZE_PATH))?,
        };

        let event_name = required_str(record.get("eventName"), EVENT_NAME_PATH)?;
        let event_time = required_str(record.get("eventTime"), EVENT_TIME_PATH)?;

        Ok(Self {
            bucket_name,
            object_key,
            size,
            event_name,
            event_time,
        })
    }
}

fn required_str(value: Option<&Value>, path: &'static str) -> Result<String, RecordError> {
    match value {
        None | Some(Value::Null) => Err(RecordError::MissingField(path)),
        Some(v) => v
            .as_str()
            .map(str::to_string)
            .ok_or(RecordError::InvalidField(path)),
    }
}
