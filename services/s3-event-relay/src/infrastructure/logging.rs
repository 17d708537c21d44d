/// ログ基盤モジュール
///
/// CloudWatch Logs向けにtracingの出力をJSON形式で設定する。
/// AWS SDK内部のログはwarn以上に絞り、リレー自身のログだけがinfoで出るようにする。
use std::sync::Once;

use tracing::Span;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG`未設定時のフィルタ（本番）
const DEFAULT_DIRECTIVES: &str = "info,aws_config=warn,aws_smithy_runtime=warn,hyper=warn";

/// `RUST_LOG`未設定時のフィルタ（テスト）
#[cfg(test)]
const TEST_DIRECTIVES: &str = "s3_event_relay=debug,warn";

static INIT: Once = Once::new();

/// `RUST_LOG`があればそれを使い、なければ`fallback`のフィルタを作る
fn build_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// JSON形式のログサブスクライバーを初期化する
///
/// 複数回呼び出しても最初の1回だけ初期化される。
/// 呼び出し単位のspan（`invocation_span`）のフィールドは各行に平坦化して出力する。
pub fn init_logging() {
    INIT.call_once(|| {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_file(true)
            .with_line_number(true)
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false);

        tracing_subscriber::registry()
            .with(build_filter(DEFAULT_DIRECTIVES))
            .with(json_layer)
            .init();
    });
}

/// 1回のLambda呼び出しを表すspanを作成
///
/// span内のログには`request_id`と`record_count`が付与される。
pub fn invocation_span(request_id: &str, record_count: usize) -> Span {
    tracing::info_span!("relay_invocation", request_id = %request_id, record_count = record_count)
}

/// テスト出力用のサブスクライバー
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(build_filter(TEST_DIRECTIVES))
            .with_test_writer()
            .compact()
            .try_init();
    });
}
