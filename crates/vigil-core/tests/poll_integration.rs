//! End-to-end polling scenarios through the public API

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use vigil_core::poll::{PollerBuilder, StatsObserver, TracingObserver};
use vigil_core::types::PollPolicy;
use vigil_core::{poll, ConditionOutcome, Error, PollConfig, PollResult};

/// A fake service that becomes healthy once `ready` is set
#[derive(Clone, Default)]
struct FakeService {
    ready: Arc<AtomicBool>,
    probes: Arc<AtomicU32>,
}

impl FakeService {
    async fn health(&self) -> Result<bool, std::io::Error> {
        let probe = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
        if probe == 1 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ));
        }
        Ok(self.ready.load(Ordering::SeqCst))
    }
}

#[tokio::test(start_paused = true)]
async fn test_service_becomes_healthy_while_polling() {
    let service = FakeService::default();

    let starter = service.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(4500)).await;
        starter.ready.store(true, Ordering::SeqCst);
    });

    let config = PollPolicy {
        timeout_ms: 60_000,
        initial_interval_ms: 1000,
        max_interval_ms: Some(4000),
        backoff_multiplier: Some(2.0),
    }
    .to_config()
    .unwrap();

    let probe = service.clone();
    let result = PollerBuilder::new()
        .with_config(config)
        .with_observer(TracingObserver::new("fake-service"))
        .build()
        .poll(
            move || {
                let service = probe.clone();
                async move { ConditionOutcome::from(service.health().await) }
            },
            None,
        )
        .await
        .unwrap();

    // Probes at 0s (refused), 1s, 3s, then 7s once the service is ready.
    assert_eq!(result.attempts(), service.probes.load(Ordering::SeqCst));
    assert_eq!(result.attempts(), 4);
    assert_eq!(result.into_result().unwrap(), Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_all_pending_polls() {
    let shutdown = CancellationToken::new();
    let observer = Arc::new(StatsObserver::new());
    let poller = PollerBuilder::new()
        .with_config(PollConfig::new(Duration::from_secs(300), Duration::from_secs(5)))
        .with_observer(observer.clone())
        .build();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(12)).await;
        trigger.cancel();
    });

    let never = || async { ConditionOutcome::<String>::NotMet };
    let (a, b, c) = tokio::join!(
        poller.poll(never, Some(&shutdown)),
        poller.poll(never, Some(&shutdown)),
        poller.poll(never, Some(&shutdown)),
    );

    for result in [a, b, c] {
        let result = result.unwrap();
        assert!(result.is_cancelled());
        assert_eq!(result.attempts(), 3);
    }
    assert_eq!(observer.cancellations(), 3);
    assert_eq!(observer.timeouts(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_dependency_times_out_with_cause() {
    let config = PollConfig::new(Duration::from_secs(10), Duration::from_secs(2));

    let result = poll(
        || async {
            ConditionOutcome::EvalFailed(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "network error",
            ))
        },
        &config,
        None,
    )
    .await
    .unwrap();

    match &result {
        PollResult::TimedOut {
            elapsed,
            attempts,
            last_error,
        } => {
            assert_eq!(*elapsed, Duration::from_secs(10));
            assert_eq!(*attempts, 5);
            assert_eq!(last_error.as_ref().unwrap().to_string(), "network error");
        }
        other => panic!("expected timeout, got {:?}", other),
    }

    let err = result.into_result().unwrap_err();
    assert!(matches!(err, Error::TimedOut { .. }));
}

#[tokio::test]
async fn test_invalid_config_is_reported_at_call_time() {
    let config = PollConfig {
        backoff_multiplier: Some(0.5),
        ..PollConfig::new(Duration::from_secs(1), Duration::from_millis(10))
    };

    let err = poll(|| async { ConditionOutcome::<String>::Met }, &config, None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("backoff multiplier"));
}
