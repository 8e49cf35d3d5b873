use std::time::{Duration, Instant};

/// Paces sequential requests against the source site. Replaces inline
/// sleeps so tests can run with a zero-delay policy.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    pub fn zero() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Blocks until at least `delay` has passed since the previous call.
    /// The first call never blocks.
    pub fn pause(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                std::thread::sleep(self.delay - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}
