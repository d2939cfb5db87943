use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::store::Store;
use crate::study_plan::StudyPlanSlot;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub study_plan: Arc<Mutex<StudyPlanSlot>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            study_plan: Arc::new(Mutex::new(StudyPlanSlot::new())),
            config: Arc::new(config),
        }
    }
}
