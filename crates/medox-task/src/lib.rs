//! medox-task: bounded, cancellable polling for long-running server tasks.
//!
//! The server runs speech synthesis and transcription as background jobs; a
//! client submits, then repeatedly asks a status endpoint until the job is
//! done. The two endpoints signal completion differently (a status field vs.
//! the presence of a result field), so terminality is abstracted behind
//! [`TaskProbe`] and the loop itself is written once.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A status payload that knows whether its task has finished.
pub trait TaskProbe {
    /// True when no further polling is required.
    fn is_terminal(&self) -> bool;
}

/// How often and how long to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between consecutive status requests. The first request is
    /// issued immediately after submission.
    pub interval: Duration,
    /// Hard ceiling on status requests; the loop fails with
    /// [`PollError::Exhausted`] once it is reached.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 100,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

/// Why a polling loop stopped without a terminal status.
#[derive(Debug, Error)]
pub enum PollError<E> {
    #[error("polling cancelled")]
    Cancelled,
    #[error("task not finished after {attempts} status checks")]
    Exhausted { attempts: u32 },
    /// A status request failed. Polling does not resume after an error.
    #[error(transparent)]
    Probe(E),
}

/// Poll `probe` until it reports a terminal status.
///
/// One status request per tick, the first immediately. Any probe error
/// aborts the loop; the error keeps its original classification so a
/// rate-limit can still be told apart from a transport failure upstream.
/// Cancelling `cancel` stops the loop before the next request.
pub async fn poll_until_terminal<S, E, F, Fut>(
    policy: PollPolicy,
    cancel: &CancellationToken,
    mut probe: F,
) -> Result<S, PollError<E>>
where
    S: TaskProbe,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, E>>,
{
    let mut interval = tokio::time::interval(policy.interval);
    // A probe slower than the interval must not cause back-to-back requests
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    for attempt in 1..=policy.max_attempts {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(attempt, "polling cancelled");
                return Err(PollError::Cancelled);
            }
            _ = interval.tick() => {}
        }

        let status = probe().await.map_err(PollError::Probe)?;
        if status.is_terminal() {
            debug!(attempt, "task reached terminal state");
            return Ok(status);
        }
        debug!(attempt, "task still running");
    }

    Err(PollError::Exhausted {
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FakeStatus {
        done: bool,
    }

    impl TaskProbe for FakeStatus {
        fn is_terminal(&self) -> bool {
            self.done
        }
    }

    /// Probe that reports done on the n-th call.
    fn probe_done_after(
        n: u32,
        calls: Arc<AtomicU32>,
    ) -> impl FnMut() -> std::future::Ready<Result<FakeStatus, &'static str>> {
        move || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(Ok(FakeStatus { done: call >= n }))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_on_first_probe() {
        let calls = Arc::new(AtomicU32::new(0));
        let cancel = CancellationToken::new();
        let status = poll_until_terminal(
            PollPolicy::default(),
            &cancel,
            probe_done_after(1, calls.clone()),
        )
        .await
        .unwrap();
        assert!(status.done);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_n_plus_one_probes_until_terminal() {
        let calls = Arc::new(AtomicU32::new(0));
        let cancel = CancellationToken::new();
        // 4 non-terminal polls, then a terminal one
        let status = poll_until_terminal(
            PollPolicy::default(),
            &cancel,
            probe_done_after(5, calls.clone()),
        )
        .await
        .unwrap();
        assert!(status.done);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_error_aborts_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let cancel = CancellationToken::new();
        let result: Result<FakeStatus, _> =
            poll_until_terminal(PollPolicy::default(), &cancel, || {
                calls.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Err("boom"))
            })
            .await;
        assert!(matches!(result, Err(PollError::Probe("boom"))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let cancel = CancellationToken::new();
        let policy = PollPolicy::new(Duration::from_secs(3), 7);
        let result = poll_until_terminal(policy, &cancel, probe_done_after(u32::MAX, calls.clone()))
            .await;
        assert!(matches!(
            result,
            Err(PollError::Exhausted { attempts: 7 })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_probe_keeps_interval_spacing() {
        // A probe slower than the interval misses ticks; the following
        // probes must still be spaced a full interval apart, not fired
        // back-to-back to catch up.
        let times = Arc::new(std::sync::Mutex::new(Vec::new()));
        let cancel = CancellationToken::new();
        let times_in_probe = times.clone();
        let policy = PollPolicy::new(Duration::from_secs(3), 10);
        let status = poll_until_terminal(policy, &cancel, move || {
            let times = times_in_probe.clone();
            async move {
                let mut times = times.lock().unwrap();
                times.push(tokio::time::Instant::now());
                let call = times.len();
                drop(times);
                if call == 1 {
                    tokio::time::sleep(Duration::from_secs(7)).await;
                }
                Ok::<_, &'static str>(FakeStatus { done: call >= 3 })
            }
        })
        .await
        .unwrap();
        assert!(status.done);
        let times = times.lock().unwrap();
        assert_eq!(times.len(), 3);
        assert!(times[2] - times[1] >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_first_probe() {
        let calls = Arc::new(AtomicU32::new(0));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = poll_until_terminal(
            PollPolicy::default(),
            &cancel,
            probe_done_after(u32::MAX, calls.clone()),
        )
        .await;
        assert!(matches!(result, Err(PollError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_between_probes() {
        let calls = Arc::new(AtomicU32::new(0));
        let cancel = CancellationToken::new();
        let calls_in_probe = calls.clone();
        let cancel_in_probe = cancel.clone();
        let result = poll_until_terminal(PollPolicy::default(), &cancel, move || {
            let call = calls_in_probe.fetch_add(1, Ordering::SeqCst) + 1;
            if call == 3 {
                cancel_in_probe.cancel();
            }
            std::future::ready(Ok::<_, &'static str>(FakeStatus { done: false }))
        })
        .await;
        assert!(matches!(result, Err(PollError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
