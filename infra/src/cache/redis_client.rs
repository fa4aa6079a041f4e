//! Redis client implementation
//!
//! Wraps a reconnecting async connection with retry logic. Every command is
//! retried with exponential backoff when the failure is transient; anything
//! else, or a transient failure that outlives the retry budget, is returned
//! to the caller. A dropped socket is replaced before the next attempt.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError, RedisResult, Script};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::CacheConfig;
use crate::InfrastructureError;

use super::scripts;

/// Upper bound for a single backoff delay
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Last script argument: `1` when the call may be a replay of an attempt
/// whose reply was lost
const FIRST_ATTEMPT: &str = "0";
const REPLAYED_ATTEMPT: &str = "1";

/// Redis client with retry logic
///
/// Cheap to clone; clones share the underlying connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Multiplexed connection that re-dials after the socket drops
    connection: ConnectionManager,
    /// Maximum number of attempts per operation
    max_retries: u32,
    /// Base delay between retries (exponential backoff)
    retry_delay_ms: u64,
    /// Check-and-set script for registration
    conditional_set: Script,
    /// Consume-and-promote script for authentication
    take_and_promote: Script,
}

impl RedisClient {
    /// Connect to Redis using the given configuration
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings; the access token, if any,
    ///   is injected into the connection URL and never logged
    ///
    /// # Example
    /// ```no_run
    /// use pv_infra::cache::{CacheConfig, RedisClient};
    ///
    /// async fn create_client() -> Result<RedisClient, pv_infra::InfrastructureError> {
    ///     let token = std::env::var("REDIS_TOKEN").unwrap_or_default();
    ///     let config = CacheConfig::new("rediss://cache.example.com:6379").with_token(token);
    ///     RedisClient::new(config).await
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        let max_retries = config.max_retries.max(1);
        let retry_delay_ms = config.retry_delay_ms;

        info!(
            url = %mask_url(&config.url),
            max_retries = max_retries,
            "Creating Redis client"
        );

        let client = Client::open(config.connection_url()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, max_retries, retry_delay_ms).await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            max_retries,
            retry_delay_ms,
            conditional_set: Script::new(scripts::CONDITIONAL_SET),
            take_and_promote: Script::new(scripts::TAKE_AND_PROMOTE),
        })
    }

    /// Create the managed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<ConnectionManager, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match ConnectionManager::new(client.clone()).await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Get a value
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Getting key '{}'", key);

        let key = key.to_string();
        self.execute_with_retry(move |mut conn, _| {
            let key = key.clone();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(|e| Self::log_failure("get", e))
    }

    /// Set a value without expiry
    pub async fn set(&self, key: &str, value: &str) -> Result<(), InfrastructureError> {
        debug!("Setting key '{}'", key);

        let (key, value) = (key.to_string(), value.to_string());
        self.execute_with_retry(move |mut conn, _| {
            let (key, value) = (key.clone(), value.clone());
            Box::pin(async move { conn.set::<_, _, ()>(key, value).await })
        })
        .await
        .map_err(|e| Self::log_failure("set", e))
    }

    /// Delete a key
    ///
    /// # Returns
    /// * `Result<bool, InfrastructureError>` - True if key was deleted, false if not found
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Deleting key '{}'", key);

        let key = key.to_string();
        let deleted = self
            .execute_with_retry(move |mut conn, _| {
                let key = key.clone();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(|e| Self::log_failure("delete", e))?;

        Ok(deleted > 0)
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Checking if key '{}' exists", key);

        let key = key.to_string();
        self.execute_with_retry(move |mut conn, _| {
            let key = key.clone();
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
        .map_err(|e| Self::log_failure("exists", e))
    }

    /// Add a member to a set
    pub async fn set_add(&self, set_name: &str, member: &str) -> Result<(), InfrastructureError> {
        debug!("Adding member to set '{}'", set_name);

        let (set_name, member) = (set_name.to_string(), member.to_string());
        self.execute_with_retry(move |mut conn, _| {
            let (set_name, member) = (set_name.clone(), member.clone());
            Box::pin(async move { conn.sadd::<_, _, ()>(set_name, member).await })
        })
        .await
        .map_err(|e| Self::log_failure("set_add", e))
    }

    /// Check set membership
    pub async fn set_contains(
        &self,
        set_name: &str,
        member: &str,
    ) -> Result<bool, InfrastructureError> {
        debug!("Checking membership in set '{}'", set_name);

        let (set_name, member) = (set_name.to_string(), member.to_string());
        self.execute_with_retry(move |mut conn, _| {
            let (set_name, member) = (set_name.clone(), member.clone());
            Box::pin(async move { conn.sismember::<_, _, bool>(set_name, member).await })
        })
        .await
        .map_err(|e| Self::log_failure("set_contains", e))
    }

    /// Run the registration check-and-set script.
    ///
    /// Returns the raw script status: 0 written, 1 key exists, 2 already a member.
    pub(crate) async fn run_conditional_set(
        &self,
        key: &str,
        value: &str,
        set_name: &str,
        member: &str,
    ) -> Result<i64, InfrastructureError> {
        self.run_script(
            &self.conditional_set,
            "conditional_set",
            [key, set_name],
            [value, member],
        )
        .await
    }

    /// Run the authentication consume-and-promote script.
    ///
    /// Returns the raw script status: 0 promoted, 1 missing, 2 mismatch.
    pub(crate) async fn run_take_and_promote(
        &self,
        key: &str,
        expected: &str,
        set_name: &str,
        member: &str,
    ) -> Result<i64, InfrastructureError> {
        self.run_script(
            &self.take_and_promote,
            "take_and_promote",
            [key, set_name],
            [expected, member],
        )
        .await
    }

    /// Invoke a compound-operation script
    ///
    /// Retries past the first attempt tell the script the earlier call may
    /// have been applied, so it reports that outcome instead of a conflict.
    async fn run_script(
        &self,
        script: &Script,
        name: &'static str,
        keys: [&str; 2],
        args: [&str; 2],
    ) -> Result<i64, InfrastructureError> {
        debug!(script = name, key = keys[0], "Running Redis script");

        let script = script.clone();
        let keys = keys.map(str::to_string);
        let args = args.map(str::to_string);
        self.execute_with_retry(move |mut conn, attempt| {
            let script = script.clone();
            let (keys, args) = (keys.clone(), args.clone());
            Box::pin(async move {
                let mut invocation = script.prepare_invoke();
                for key in &keys {
                    invocation.key(key);
                }
                for arg in &args {
                    invocation.arg(arg);
                }
                invocation.arg(if attempt > 1 {
                    REPLAYED_ATTEMPT
                } else {
                    FIRST_ATTEMPT
                });
                let status: RedisResult<i64> = invocation.invoke_async(&mut conn).await;
                status
            })
        })
        .await
        .map_err(|e| Self::log_failure(name, e))
    }

    /// Execute a Redis operation with automatic retry logic
    ///
    /// Retries only errors [`is_retriable_error`] accepts, doubling the delay
    /// each time up to [`MAX_RETRY_DELAY_MS`]. `operation` receives the
    /// 1-based attempt number.
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(ConnectionManager, u32) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match operation(conn, attempts).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => {
                    error!("Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let result = self
            .execute_with_retry(|mut conn, _| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await;

        match result {
            Ok(response) if response == "PONG" => {
                debug!("Redis health check passed");
                Ok(true)
            }
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!("Redis health check failed: {}", e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    fn log_failure(operation: &'static str, e: RedisError) -> InfrastructureError {
        error!(operation = operation, error = %e, "Redis command failed");
        InfrastructureError::Cache(e)
    }
}

/// Doubled delay, capped at [`MAX_RETRY_DELAY_MS`]
pub(crate) fn next_delay(delay_ms: u64) -> u64 {
    delay_ms.saturating_mul(2).min(MAX_RETRY_DELAY_MS)
}

/// Check if a Redis error is retriable
///
/// Determines if an error is transient and the operation should be retried.
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
