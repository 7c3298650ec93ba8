use std::sync::Arc;

use crate::config_manager::Config;
use crate::translate::{TranslateInterface, TranslatorFactory};

/// Shared, read-only state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub translator: Arc<dyn TranslateInterface>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let translator = TranslatorFactory::create_translator(&config.translation_config)?;
        Ok(Self::with_translator(config, translator))
    }

    pub fn with_translator(config: Config, translator: Arc<dyn TranslateInterface>) -> Self {
        Self {
            config: Arc::new(config),
            translator,
        }
    }
}
