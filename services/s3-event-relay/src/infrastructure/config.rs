/// リレー設定
///
/// 書き込み先テーブル名と発行先SNSトピックARNをデプロイ時の環境変数から読み込む。
use thiserror::Error;

/// テーブル名の環境変数
pub const TABLE_NAME_ENV: &str = "RELAY_TABLE_NAME";
/// トピックARNの環境変数
pub const TOPIC_ARN_ENV: &str = "RELAY_TOPIC_ARN";

/// 環境変数未設定時のテーブル名
pub const DEFAULT_TABLE_NAME: &str = "newtable";
/// 環境変数未設定時のトピックARN
pub const DEFAULT_TOPIC_ARN: &str = "arn:aws:sns:us-east-1:123456789012:MySNSTopic";

/// リレー設定のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RelayConfigError {
    /// 環境変数が空文字列
    #[error("Empty environment variable: {0}")]
    EmptyValue(String),

    /// トピックARNの形式が不正
    #[error("Invalid topic ARN: {0}")]
    InvalidTopicArn(String),
}

/// テーブル名とトピックARNを持つリレー設定
///
/// 環境変数:
/// - RELAY_TABLE_NAME: イベント記録用DynamoDBテーブル名（未設定時は`newtable`）
/// - RELAY_TOPIC_ARN: アラート発行先SNSトピックARN
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// イベント記録テーブル名
    table_name: String,
    /// アラート発行先トピックARN
    topic_arn: String,
}

impl RelayConfig {
    /// 環境変数から設定を読み込む
    ///
    /// 未設定の変数はデフォルト値を使い、空文字列や不正なARNはエラーにする。
    pub fn from_env() -> Result<Self, RelayConfigError> {
        let table_name = read_env_or(TABLE_NAME_ENV, DEFAULT_TABLE_NAME)?;
        let topic_arn = read_env_or(TOPIC_ARN_ENV, DEFAULT_TOPIC_ARN)?;

        Self::new(table_name, topic_arn)
    }

    /// 明示的な値で設定を作成
    pub fn new(
        table_name: impl Into<String>,
        topic_arn: impl Into<String>,
    ) -> Result<Self, RelayConfigError> {
        let table_name = table_name.into();
        let topic_arn = topic_arn.into();

        if table_name.trim().is_empty() {
            return Err(RelayConfigError::EmptyValue(TABLE_NAME_ENV.to_string()));
        }
        if topic_arn.trim().is_empty() {
            return Err(RelayConfigError::EmptyValue(TOPIC_ARN_ENV.to_string()));
        }
        if !topic_arn.starts_with("arn:") {
            return Err(RelayConfigError::InvalidTopicArn(topic_arn));
        }

        Ok(Self {
            table_name,
            topic_arn,
        })
    }

    /// イベント記録テーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// アラート発行先トピックARNを取得
    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            topic_arn: DEFAULT_TOPIC_ARN.to_string(),
        }
    }
}

fn read_env_or(key: &str, default: &str) -> Result<String, RelayConfigError> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Err(RelayConfigError::EmptyValue(key.to_string())),
        Ok(value) => Ok(value.trim().to_string()),
        Err(_) => Ok(default.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // 安全性: #[serial]で環境変数を触るテストを直列化している
    unsafe fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    fn cleanup() {
        unsafe {
            remove_env(TABLE_NAME_ENV);
            remove_env(TOPIC_ARN_ENV);
        }
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            RelayConfigError::EmptyValue("RELAY_TABLE_NAME".to_string()).to_string(),
            "Empty environment variable: RELAY_TABLE_NAME"
        );
        assert_eq!(
            RelayConfigError::InvalidTopicArn("my-topic".to_string()).to_string(),
            "Invalid topic ARN: my-topic"
        );
    }

    #[test]
    fn test_new_with_valid_values() {
        let config = RelayConfig::new(
            "events",
            "arn:aws:sns:ap-northeast-1:123456789012:alerts",
        )
        .unwrap();

        assert_eq!(config.table_name(), "events");
        assert_eq!(
            config.topic_arn(),
            "arn:aws:sns:ap-northeast-1:123456789012:alerts"
        );
    }

    #[test]
    fn test_new_rejects_empty_table_name() {
        let result = RelayConfig::new("  ", DEFAULT_TOPIC_ARN);
        assert_eq!(
            result,
            Err(RelayConfigError::EmptyValue(TABLE_NAME_ENV.to_string()))
        );
    }

    #[test]
    fn test_new_rejects_non_arn_topic() {
        let result = RelayConfig::new("events", "alerts");
        assert_eq!(
            result,
            Err(RelayConfigError::InvalidTopicArn("alerts".to_string()))
        );
    }

    #[test]
    fn test_default_values() {
        let config = RelayConfig::default();
        assert_eq!(config.table_name(), "newtable");
        assert_eq!(
            config.topic_arn(),
            "arn:aws:sns:us-east-1:123456789012:MySNSTopic"
        );
    }

    #[test]
    #[serial]
    fn test_from_env_uses_defaults_when_unset() {
        cleanup();

        let config = RelayConfig::from_env().unwrap();
        assert_eq!(config, RelayConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_variables() {
        cleanup();
        unsafe {
            set_env(TABLE_NAME_ENV, "s3-events");
            set_env(TOPIC_ARN_ENV, "arn:aws:sns:us-west-2:111122223333:uploads");
        }

        let config = RelayConfig::from_env().unwrap();
        assert_eq!(config.table_name(), "s3-events");
        assert_eq!(
            config.topic_arn(),
            "arn:aws:sns:us-west-2:111122223333:uploads"
        );

        cleanup();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_empty_value() {
        cleanup();
        unsafe {
            set_env(TOPIC_ARN_ENV, "");
        }

        let result = RelayConfig::from_env();
        assert_eq!(
            result,
            Err(RelayConfigError::EmptyValue(TOPIC_ARN_ENV.to_string()))
        );

        cleanup();
    }
}
