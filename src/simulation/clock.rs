use tokio::time::Instant;

/// Seconds elapsed since the simulation started. Follows tokio's clock, so
/// paused test time is respected.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    start: Instant,
}

impl SimClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn tracks_virtual_time() {
        let clock = SimClock::start();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let elapsed = clock.elapsed_secs();
        assert!((1.5..1.6).contains(&elapsed), "elapsed {elapsed}");
    }
}
