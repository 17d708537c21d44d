/// S3イベントリレーLambda関数
///
/// S3のオブジェクト作成/更新通知を受け取り、各レコードをDynamoDBテーブルに記録して
/// SNSトピックへアラートを発行する。
/// 失敗したレコードがあればエラーを返し、再配信はイベントソースに任せる。
use lambda_runtime::{Error, LambdaEvent, service_fn};
use s3_event_relay::application::{EventRelayHandler, RelaySummary};
use s3_event_relay::infrastructure::{
    AwsSnsOps, DynamoEntryRepository, EntryRepository, RelayConfig, SnsOps, init_logging,
    invocation_span,
};
use serde_json::Value;
use tracing::{Instrument, error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    let config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "リレー設定読み込み失敗");
            return Err(err.into());
        }
    };

    info!(
        table_name = config.table_name(),
        topic_arn = config.topic_arn(),
        "リレー設定を読み込み"
    );

    // クライアントはプロセス起動時に1度だけ作成し、呼び出し間で使い回す
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let entry_repo = DynamoEntryRepository::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        config.table_name(),
    );
    let sns_ops = AwsSnsOps::new(aws_sdk_sns::Client::new(&aws_config));
    let relay = EventRelayHandler::new(entry_repo, sns_ops, config.topic_arn());

    let relay = &relay;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(relay, event).await
    }))
    .await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. 呼び出し単位のspanを作成
/// 2. EventRelayHandlerでバッチを処理
/// 3. 成功時は処理件数を返し、失敗時はエラーを返す（Lambda再試行をトリガー）
async fn handler<ER, SO>(
    relay: &EventRelayHandler<ER, SO>,
    event: LambdaEvent<Value>,
) -> Result<RelaySummary, Error>
where
    ER: EntryRepository,
    SO: SnsOps,
{
    let (payload, context) = event.into_parts();
    let record_count = payload
        .get("Records")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    let span = invocation_span(&context.request_id, record_count);

    // 結果のログもspan内で出す
    async move {
        match relay.handle(&payload).await {
            Ok(summary) => {
                info!(processed = summary.processed, "リレー処理完了");
                Ok(summary)
            }
            Err(err) => {
                error!(
                    error = %err,
                    record_index = ?err.record_index(),
                    "リレー処理失敗"
                );
                Err(Error::from(err))
            }
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lambda_runtime::Context;
    use s3_event_relay::domain::PersistedEntry;
    use s3_event_relay::infrastructure::{EntryRepositoryError, PublishResult, SnsOpsError};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::Layer;

    struct NoopRepository;

    #[async_trait]
    impl EntryRepository for NoopRepository {
        async fn put(&self, _entry: &PersistedEntry) -> Result<(), EntryRepositoryError> {
            Ok(())
        }
    }

    struct NoopSns;

    #[async_trait]
    impl SnsOps for NoopSns {
        async fn publish(
            &self,
            topic_arn: &str,
            _message: &str,
            _subject: Option<&str>,
        ) -> Result<PublishResult, SnsOpsError> {
            Ok(PublishResult::new(topic_arn, "noop"))
        }
    }

    /// 各ログ行が出た時点のカレントspan名を記録するレイヤー
    #[derive(Clone, Default)]
    struct CurrentSpanRecorder(Arc<Mutex<Vec<Option<String>>>>);

    impl<S> Layer<S> for CurrentSpanRecorder
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_event(&self, _event: &tracing::Event<'_>, ctx: LayerContext<'_, S>) {
            let name = ctx.lookup_current().map(|span| span.name().to_string());
            self.0.lock().unwrap().push(name);
        }
    }

    fn run_handler(payload: Value) -> (Result<RelaySummary, Error>, Vec<Option<String>>) {
        let recorder = CurrentSpanRecorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());
        let relay = EventRelayHandler::new(
            NoopRepository,
            NoopSns,
            "arn:aws:sns:us-east-1:123456789012:MySNSTopic",
        );
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let result = tracing::subscriber::with_default(subscriber, || {
            runtime.block_on(handler(&relay, LambdaEvent::new(payload, Context::default())))
        });

        let spans = recorder.0.lock().unwrap().clone();
        (result, spans)
    }

    fn s3_record(key: &str) -> Value {
        json!({
            "eventTime": "2024-01-01T00:00:00Z",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": { "name": "photos" },
                "object": { "key": key, "size": 2048 }
            }
        })
    }

    #[test]
    fn test_handler_returns_summary_and_logs_inside_invocation_span() {
        let (result, spans) = run_handler(json!({ "Records": [s3_record("a.jpg"), s3_record("b.jpg")] }));

        assert_eq!(result.unwrap(), RelaySummary { processed: 2 });
        assert!(!spans.is_empty());
        assert!(
            spans
                .iter()
                .all(|name| name.as_deref() == Some("relay_invocation"))
        );
    }

    #[test]
    fn test_handler_failure_logs_inside_invocation_span() {
        let (result, spans) = run_handler(json!({ "detail": {} }));

        assert!(result.is_err());
        assert!(!spans.is_empty());
        assert!(
            spans
                .iter()
                .all(|name| name.as_deref() == Some("relay_invocation"))
        );
    }
}
