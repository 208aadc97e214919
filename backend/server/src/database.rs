//! # Redis
//!
//! Document store for submitted surveys.
//!
//! ## Requirements
//!
//! - Append-only, one document per submission
//! - Count and full read for aggregation
//! - Small dataset, a single organization's internal surveys
//!
//! ## Implementation
//!
//! - Redis list: 1 key, one serialized JSON document per entry
//! - `RPUSH` to insert, `LLEN` to count, `LRANGE 0 -1` to read everything
//! - Documents are stored verbatim, no schema enforced by the store
//! - No isolation between a count and the following read, a submission in
//!   between is counted in one and not the other
use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client, RedisError,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Corrupt survey document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[async_trait]
pub trait SurveyStore: Send + Sync {
    async fn insert_one(&self, document: &Value) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    async fn find_all(&self) -> Result<Vec<Value>, StoreError>;
}

/// Text stored in the Redis list for one document.
pub fn encode_entry(document: &Value) -> Result<String, StoreError> {
    Ok(serde_json::to_string(document)?)
}

/// Documents back from `LRANGE`, a single non-JSON entry fails the read.
pub fn decode_entries(entries: &[String]) -> Result<Vec<Value>, StoreError> {
    entries
        .iter()
        .map(|entry| serde_json::from_str(entry).map_err(StoreError::from))
        .collect()
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, RedisError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;

    client.get_connection_manager_with_config(config).await
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    key: String,
}

impl RedisStore {
    pub async fn connect(redis_url: &str, key: &str) -> Result<Self, StoreError> {
        let connection = init_redis(redis_url).await?;

        Ok(Self {
            connection,
            key: key.to_string(),
        })
    }
}

#[async_trait]
impl SurveyStore for RedisStore {
    async fn insert_one(&self, document: &Value) -> Result<(), StoreError> {
        let payload = encode_entry(document)?;
        let mut connection = self.connection.clone();

        connection.rpush::<_, _, ()>(&self.key, payload).await?;

        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let mut connection = self.connection.clone();

        Ok(connection.llen::<_, u64>(&self.key).await?)
    }

    async fn find_all(&self) -> Result<Vec<Value>, StoreError> {
        let mut connection = self.connection.clone();
        let entries: Vec<String> = connection.lrange(&self.key, 0, -1).await?;

        decode_entries(&entries)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Value>) -> Self {
        Self {
            documents: Mutex::new(documents),
        }
    }
}

#[async_trait]
impl SurveyStore for MemoryStore {
    async fn insert_one(&self, document: &Value) -> Result<(), StoreError> {
        self.documents.lock().await.push(document.clone());

        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.documents.lock().await.len() as u64)
    }

    async fn find_all(&self) -> Result<Vec<Value>, StoreError> {
        Ok(self.documents.lock().await.clone())
    }
}
