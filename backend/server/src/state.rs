use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::{
    config::Config,
    database::{RedisStore, SurveyStore},
};

pub struct State {
    pub config: Config,
    pub store: Arc<dyn SurveyStore>,
}

impl State {
    pub fn new(config: Config, store: Arc<dyn SurveyStore>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }

    pub async fn connect() -> Result<Arc<Self>> {
        let config = Config::load()?;

        info!("Connecting to survey store...");
        let store = RedisStore::connect(&config.redis_url, &config.survey_key).await?;

        Ok(Self::new(config, Arc::new(store)))
    }
}
