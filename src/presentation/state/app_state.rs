use std::sync::Arc;

use crate::application::ports::MediaStore;
use crate::application::services::AnalysisService;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub analysis_service: Arc<AnalysisService>,
    pub media_store: Arc<dyn MediaStore>,
    pub settings: Settings,
}
