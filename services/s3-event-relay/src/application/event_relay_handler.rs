/// S3イベントリレーハンドラー
///
/// S3通知バッチの各レコードをDynamoDBに記録し、SNSトピックへアラートを発行する。
/// 途中のレコードで失敗した場合はそこでバッチ全体の処理を打ち切り、
/// 再試行はイベントソース側の再配信に任せる。
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{AlertMessage, NotificationRecord, PersistedEntry, RecordError};
use crate::infrastructure::{EntryRepository, EntryRepositoryError, SnsOps, SnsOpsError};

/// リレーハンドラーのエラー型
///
/// `index`は失敗したレコードのバッチ内位置（0始まり）。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RelayHandlerError {
    /// `Records`配列が存在しない
    #[error("Malformed batch: missing Records array")]
    MalformedBatch,

    /// レコードの必須フィールドが欠落または不正
    #[error("Malformed record at index {index}: {source}")]
    MalformedRecord { index: usize, source: RecordError },

    /// テーブルへの書き込みに失敗
    #[error("Failed to persist record at index {index}: {source}")]
    Persist {
        index: usize,
        source: EntryRepositoryError,
    },

    /// アラートの発行に失敗
    #[error("Failed to publish alert for record at index {index}: {source}")]
    Publish { index: usize, source: SnsOpsError },
}

impl RelayHandlerError {
    /// 失敗したレコードの位置（バッチ単位のエラーはNone）
    pub fn record_index(&self) -> Option<usize> {
        match self {
            RelayHandlerError::MalformedBatch => None,
            RelayHandlerError::MalformedRecord { index, .. }
            | RelayHandlerError::Persist { index, .. }
            | RelayHandlerError::Publish { index, .. } => Some(*index),
        }
    }
}

/// 1回の呼び出しの処理結果
///
/// Lambdaのレスポンスとしてそのまま返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelaySummary {
    /// 記録・発行まで完了したレコード数
    pub processed: usize,
}

/// S3通知バッチを処理するハンドラー
///
/// クライアントはプロセス起動時に1度だけ作成して注入し、呼び出し間で使い回す。
pub struct EventRelayHandler<ER, SO>
where
    ER: EntryRepository,
    SO: SnsOps,
{
    /// イベント記録リポジトリ
    entry_repo: ER,
    /// SNS操作
    sns_ops: SO,
    /// アラート発行先トピックARN
    topic_arn: String,
}

impl<ER, SO> EventRelayHandler<ER, SO>
where
    ER: EntryRepository,
    SO: SnsOps,
{
    /// 新しいEventRelayHandlerを作成
    pub fn new(entry_repo: ER, sns_ops: SO, topic_arn: impl Into<String>) -> Self {
        Self {
            entry_repo,
            sns_ops,
            topic_arn: topic_arn.into(),
        }
    }

    /// S3通知バッチを処理
    ///
    /// # 処理フロー
    /// 各レコードについて順番に:
    /// 1. バケット名、キー、サイズ、イベント名、時刻を抽出
    /// 2. 新しいIDでエントリを作成してテーブルに書き込み
    /// 3. アラートを作成
    /// 4. SNSトピックに発行
    ///
    /// # 戻り値
    /// * 全レコード成功時は`Ok(RelaySummary)`
    /// * 最初に失敗したレコードで`Err(RelayHandlerError)`。それ以降のレコードは処理しない
    pub async fn handle(&self, event: &Value) -> Result<RelaySummary, RelayHandlerError> {
        let records = event
            .get("Records")
            .and_then(Value::as_array)
            .ok_or(RelayHandlerError::MalformedBatch)?;

        info!(record_count = records.len(), "S3イベントバッチを受信");

        for (index, raw) in records.iter().enumerate() {
            if let Err(err) = self.relay_record(index, raw).await {
                error!(
                    record_index = index,
                    processed = index,
                    error = %err,
                    "レコード処理失敗、バッチを中断"
                );
                return Err(err);
            }
        }

        info!(processed = records.len(), "S3イベントバッチ処理完了");

        Ok(RelaySummary {
            processed: records.len(),
        })
    }

    async fn relay_record(&self, index: usize, raw: &Value) -> Result<(), RelayHandlerError> {
        let record = NotificationRecord::from_json(raw)
            .map_err(|source| RelayHandlerError::MalformedRecord { index, source })?;

        let entry = PersistedEntry::from_record(&record);
        self.entry_repo
            .put(&entry)
            .await
            .map_err(|source| RelayHandlerError::Persist { index, source })?;

        info!(
            record_index = index,
            entry_id = %entry.id,
            bucket = %record.bucket_name,
            object_key = %record.object_key,
            size = record.size,
            "イベント記録を保存"
        );

        let alert = AlertMessage::from_record(&record);
        let published = self
            .sns_ops
            .publish(&self.topic_arn, &alert.body, Some(&alert.subject))
            .await
            .map_err(|source| RelayHandlerError::Publish { index, source })?;

        info!(
            record_index = index,
            message_id = %published.message_id,
            topic_arn = %published.topic_arn,
            "アラートを発行"
        );

        Ok(())
    }
}
