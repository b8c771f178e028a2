//! Environment configuration for different deployment stages

use std::env;

use aws_sdk_sqs::Client as SqsClient;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the endpoint URL to use for SQS
    ///
    /// `AWS_ENDPOINT_URL_SQS` takes precedence in every environment.
    #[must_use]
    pub fn override_aws_endpoint_url(&self) -> Option<String> {
        if let Ok(endpoint_url) = env::var("AWS_ENDPOINT_URL_SQS") {
            return Some(endpoint_url);
        }

        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566".to_string()),
        }
    }

    /// SQS client for `region` with retry and timeout settings
    pub async fn sqs_client(&self, region: &str) -> SqsClient {
        message_queue::sqs_client(region, self.override_aws_endpoint_url().as_deref()).await
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
        };
        f.write_str(name)
    }
}
