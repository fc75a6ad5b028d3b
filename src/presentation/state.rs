use std::sync::Arc;

use crate::Cohort;

#[derive(Clone)]
pub struct AppState {
    pub cohort: Arc<Cohort>,
}

impl AppState {
    pub fn new(cohort: Cohort) -> Self {
        Self {
            cohort: Arc::new(cohort),
        }
    }
}
