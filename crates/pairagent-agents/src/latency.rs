//! Artificial response latency

use rand::Rng;
use std::time::Duration;

/// Inclusive millisecond range an agent "thinks" for before answering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl LatencyProfile {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: max_ms.max(min_ms),
        }
    }

    pub fn sample(&self) -> Duration {
        let ms = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    pub async fn wait(&self) {
        tokio::time::sleep(self.sample()).await;
    }
}
