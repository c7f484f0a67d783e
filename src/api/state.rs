use std::sync::Arc;

use crate::config::AnalyticsConfig;
use crate::storage::MatchStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MatchStore>,
    pub analytics: Arc<AnalyticsConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn MatchStore>, analytics: AnalyticsConfig) -> Self {
        Self {
            store,
            analytics: Arc::new(analytics),
        }
    }
}
