use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::template::{EngineOptions, TemplateResult, TeraEngine};
use crate::transform::TransformService;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub transform: Arc<TransformService>,
    pub start_time: Instant,
}

impl AppState {
    /// Build the shared state; creates the template directory if it is missing
    pub fn new(settings: Settings) -> TemplateResult<Self> {
        let engine = TeraEngine::new(EngineOptions::from(&settings.templates))?;
        tracing::info!(
            path = %engine.store().root().display(),
            "Template engine configured"
        );

        Ok(Self {
            settings: Arc::new(settings),
            transform: Arc::new(TransformService::new(engine)),
            start_time: Instant::now(),
        })
    }
}
