use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};
use aws_sdk_sqs::{config::Region, Client as SqsClient};

/// Builds an SQS client for `region` with retry and timeout settings
///
/// # Arguments
///
/// * `region` - AWS region hosting the queue
/// * `endpoint_url` - Optional endpoint override, e.g. `LocalStack`
pub async fn sqs_client(region: &str, endpoint_url: Option<&str>) -> SqsClient {
    let retry_config = RetryConfig::standard()
        .with_max_attempts(3)
        .with_initial_backoff(Duration::from_millis(50));

    // Must exceed the longest long-poll wait (20 seconds)
    let timeout_config = TimeoutConfig::builder()
        .operation_timeout(Duration::from_secs(30))
        .build();

    let mut config_builder = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .retry_config(retry_config)
        .timeout_config(timeout_config);

    if let Some(endpoint_url) = endpoint_url {
        config_builder = config_builder.endpoint_url(endpoint_url);
    }

    SqsClient::new(&config_builder.load().await)
}
