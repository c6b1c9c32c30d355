use crate::clock::Clock;
use crate::config::BenchConfig;
use std::sync::Arc;

pub struct AppState {
    pub clock: Arc<dyn Clock>,
    pub report_prefix: String,
}

impl AppState {
    pub fn new(config: &BenchConfig, clock: Arc<dyn Clock>) -> Self {
        AppState {
            clock,
            report_prefix: config.report_prefix.clone(),
        }
    }
}
