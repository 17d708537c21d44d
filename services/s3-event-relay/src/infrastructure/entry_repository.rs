/// DynamoDBにS3イベントの記録を書き込むエントリリポジトリ
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::AttributeValue;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::PersistedEntry;

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EntryRepositoryError {
    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),
}

/// イベント記録の永続化トレイト
///
/// 実際のDynamoDB実装とテスト用モックを差し替えられるようにする。
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// エントリを新しいアイテムとして書き込む
    ///
    /// IDは毎回新規に生成されるため、上書きは起きない前提。
    async fn put(&self, entry: &PersistedEntry) -> Result<(), EntryRepositoryError>;
}

/// EntryRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoEntryRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// イベント記録テーブル名
    table_name: String,
}

impl DynamoEntryRepository {
    /// 新しいDynamoEntryRepositoryを作成
    pub fn new(client: DynamoDbClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// エントリをDynamoDBアイテムの属性マップに変換
    ///
    /// 属性名はテーブルの既存アイテムと揃える（id, Bucket, Object, Size, Event, EventTime）。
    pub fn to_item(entry: &PersistedEntry) -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("id".to_string(), AttributeValue::S(entry.id.clone())),
            (
                "Bucket".to_string(),
                AttributeValue::S(entry.bucket_name.clone()),
            ),
            (
                "Object".to_string(),
                AttributeValue::S(entry.object_key.clone()),
            ),
            ("Size".to_string(), AttributeValue::N(entry.size.to_string())),
            (
                "Event".to_string(),
                AttributeValue::S(entry.event_name.clone()),
            ),
            (
                "EventTime".to_string(),
                AttributeValue::S(entry.event_time.clone()),
            ),
        ])
    }
}

#[async_trait]
impl EntryRepository for DynamoEntryRepository {
    async fn put(&self, entry: &PersistedEntry) -> Result<(), EntryRepositoryError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(Self::to_item(entry)))
            .send()
            .await
            .map_err(|e| {
                warn!(
                    table_name = %self.table_name,
                    entry_id = %entry.id,
                    error = %e,
                    "DynamoDB PutItemエラー"
                );
                EntryRepositoryError::WriteError(e.to_string())
            })?;

        debug!(
            table_name = %self.table_name,
            entry_id = %entry.id,
            "DynamoDB PutItem成功"
        );

        Ok(())
    }
}
