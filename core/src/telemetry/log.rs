use log::{debug, info, warn};

/// Stage-scoped logger; prefixes every line with the owning stage name.
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.target, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.target, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.target, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("pipeline")
    }
}
