use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

/// Simulated ledger round-trips that pause before completing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimulatedCall {
    /// Identity provider sign-in.
    Connect,
    /// Registry update call.
    Register,
    /// Registry query call.
    Verify,
}

/// Artificial latency for simulated ledger calls.
///
/// Waits always complete and never fail; there is no timeout or cancellation
/// path. Tests inject [`NoDelay`].
#[async_trait]
pub trait NetworkDelay: Send + Sync {
    async fn wait(&self, call: SimulatedCall);
}

/// Sleeps a fixed duration per call kind on the tokio timer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedDelay {
    pub connect: Duration,
    pub register: Duration,
    pub verify: Duration,
}

impl FixedDelay {
    pub fn duration_for(&self, call: SimulatedCall) -> Duration {
        match call {
            SimulatedCall::Connect => self.connect,
            SimulatedCall::Register => self.register,
            SimulatedCall::Verify => self.verify,
        }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self {
            connect: Duration::from_millis(2000),
            register: Duration::from_millis(3000),
            verify: Duration::from_millis(2000),
        }
    }
}

#[async_trait]
impl NetworkDelay for FixedDelay {
    async fn wait(&self, call: SimulatedCall) {
        let duration = self.duration_for(call);
        debug!(?call, ms = duration.as_millis() as u64, "simulating ledger latency");
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Completes immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDelay;

#[async_trait]
impl NetworkDelay for NoDelay {
    async fn wait(&self, _call: SimulatedCall) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn default_durations() {
        let d = FixedDelay::default();
        assert_eq!(d.duration_for(SimulatedCall::Connect), Duration::from_secs(2));
        assert_eq!(d.duration_for(SimulatedCall::Register), Duration::from_secs(3));
        assert_eq!(d.duration_for(SimulatedCall::Verify), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn fixed_delay_sleeps() {
        let d = FixedDelay {
            connect: Duration::from_millis(5),
            register: Duration::ZERO,
            verify: Duration::ZERO,
        };
        let start = Instant::now();
        d.wait(SimulatedCall::Connect).await;
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[tokio::test]
    async fn no_delay_completes() {
        NoDelay.wait(SimulatedCall::Register).await;
    }
}
