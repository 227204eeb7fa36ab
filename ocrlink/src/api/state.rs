use std::sync::Arc;

use crate::config::Config;
use crate::services::RecognitionService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recognition: RecognitionService,
}

impl AppState {
    pub fn new(config: Config, recognition: RecognitionService) -> Self {
        Self {
            config: Arc::new(config),
            recognition,
        }
    }
}
