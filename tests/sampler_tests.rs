// Counter sampling, wraparound and tick-commit tests

mod common;

use common::{MockTransport, Request, identity, push_counters, sample};
use ifwatch::models::{CounterDelta, CounterSample};
use ifwatch::monitor::{Monitor, MonitorError, TickOutcome};
use ifwatch::sampler::{self, CounterSampler, SampleError, counter_oids};
use ifwatch::snmp::{ErrorStatus, Value};
use ifwatch::utilization::UtilizationError;

#[test]
fn test_delta_is_plain_subtraction_without_wrap() {
    let prev = CounterSample {
        in_octets: 1_000,
        in_discards: 1,
        in_errors: 2,
        out_octets: 5_000,
        out_discards: 3,
        out_errors: 4,
    };
    let cur = CounterSample {
        in_octets: 13_501_000,
        in_discards: 1,
        in_errors: 7,
        out_octets: 5_500,
        out_discards: 10,
        out_errors: 4,
    };
    assert_eq!(
        cur.delta_since(&prev),
        CounterDelta {
            in_octets: 13_500_000,
            in_discards: 0,
            in_errors: 5,
            out_octets: 500,
            out_discards: 7,
            out_errors: 0,
        }
    );
}

#[test]
fn test_delta_corrects_wraparound() {
    let prev = sample(u64::MAX - 99, 10);
    let cur = sample(400, 10);
    let delta = cur.delta_since(&prev);
    // current - previous + 2^64
    let expected = (400i128 - (u64::MAX - 99) as i128 + (1i128 << 64)) as u64;
    assert_eq!(delta.in_octets, expected);
    assert_eq!(delta.in_octets, 500);
    assert_eq!(delta.out_octets, 0);
}

#[test]
fn test_delta_handles_values_above_signed_range() {
    let prev = sample(1 << 63, 0);
    let cur = sample((1 << 63) + 12_500_000, 0);
    assert_eq!(cur.delta_since(&prev).in_octets, 12_500_000);
}

#[tokio::test]
async fn test_sample_requests_six_counters_for_index() {
    let transport = MockTransport::new();
    push_counters(&transport, 9, sample(100, 200));

    let (current, delta) = sampler::sample(&transport, &identity(9, 1_000), None)
        .await
        .unwrap();
    assert_eq!(current, sample(100, 200));
    assert!(delta.is_none(), "first tick has no delta");
    assert_eq!(
        transport.requests(),
        vec![Request::Get(counter_oids(9).to_vec())]
    );
}

#[tokio::test]
async fn test_sample_with_previous_returns_delta() {
    let transport = MockTransport::new();
    push_counters(&transport, 9, sample(1_100, 2_300));

    let prev = sample(100, 300);
    let (_, delta) = sampler::sample(&transport, &identity(9, 1_000), Some(&prev))
        .await
        .unwrap();
    let delta = delta.unwrap();
    assert_eq!(delta.in_octets, 1_000);
    assert_eq!(delta.out_octets, 2_000);
}

#[tokio::test]
async fn test_sample_rejects_missing_or_exception_counter() {
    let transport = MockTransport::new();
    let oids = counter_oids(2);
    transport.push_varbinds(vec![
        (oids[0].clone(), Value::Counter64(1)),
        (oids[1].clone(), Value::Counter32(0)),
        (oids[2].clone(), Value::Counter32(0)),
        (oids[3].clone(), Value::NoSuchInstance),
        (oids[4].clone(), Value::Counter32(0)),
        (oids[5].clone(), Value::Counter32(0)),
    ]);

    let err = sampler::sample(&transport, &identity(2, 100), None)
        .await
        .unwrap_err();
    assert!(matches!(err, SampleError::MissingCounter { ref oid } if *oid == oids[3]));
}

#[tokio::test]
async fn test_sample_error_status_is_propagated() {
    let transport = MockTransport::new();
    transport.push_status(ErrorStatus::GenErr, 1);
    let err = sampler::sample(&transport, &identity(2, 100), None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed - GenError(1)");
}

#[tokio::test]
async fn test_sampler_observe_does_not_move_baseline() {
    let transport = MockTransport::new();
    push_counters(&transport, 1, sample(10, 10));
    let mut sampler = CounterSampler::new(identity(1, 100));

    let (current, _) = sampler.observe(&transport).await.unwrap();
    assert!(sampler.previous().is_none());
    sampler.commit(current);
    assert_eq!(sampler.previous(), Some(&sample(10, 10)));
}

#[tokio::test]
async fn test_first_tick_is_baseline_not_zero() {
    let transport = MockTransport::new();
    push_counters(&transport, 3, sample(1_000, 1_000));
    push_counters(&transport, 3, sample(1_000, 1_000));
    let mut monitor = Monitor::new(identity(3, 1_000), 1, 120).unwrap();

    let first = monitor.tick(&transport).await.unwrap();
    assert!(matches!(first, TickOutcome::Baseline(_)));
    assert!(monitor.history().is_empty());

    // an idle link yields a genuine zero, which is recorded
    let second = monitor.tick(&transport).await.unwrap();
    match second {
        TickOutcome::Sampled { utilization, .. } => {
            assert_eq!(utilization.rx_percent, 0.0);
            assert_eq!(utilization.tx_percent, 0.0);
        }
        other => panic!("expected a sampled tick, got {other:?}"),
    }
    assert_eq!(monitor.history().len(), 1);
}

#[tokio::test]
async fn test_tick_computes_utilization_from_delta() {
    let transport = MockTransport::new();
    push_counters(&transport, 3, sample(0, 0));
    push_counters(&transport, 3, sample(12_500_000, 125_000_000));
    let mut monitor = Monitor::new(identity(3, 1_000), 1, 120).unwrap();

    monitor.tick(&transport).await.unwrap();
    let outcome = monitor.tick(&transport).await.unwrap();
    let TickOutcome::Sampled { utilization, delta, .. } = outcome else {
        panic!("expected a sampled tick");
    };
    assert_eq!(delta.in_octets, 12_500_000);
    assert_eq!(utilization.rx_percent, 10.0);
    assert_eq!(utilization.tx_percent, 100.0);
}

#[tokio::test]
async fn test_failed_tick_leaves_history_and_baseline_unchanged() {
    let transport = MockTransport::new();
    push_counters(&transport, 3, sample(1_000, 0));
    push_counters(&transport, 3, sample(2_000, 0));
    transport.push_timeout();
    push_counters(&transport, 3, sample(5_000, 0));
    let mut monitor = Monitor::new(identity(3, 1_000), 1, 120).unwrap();

    monitor.tick(&transport).await.unwrap();
    monitor.tick(&transport).await.unwrap();
    let history_before = monitor.history().snapshot();
    let baseline_before = monitor.previous().copied();

    let err = monitor.tick(&transport).await.unwrap_err();
    assert!(matches!(err, MonitorError::Sample(_)));
    assert!(!err.is_config());
    assert_eq!(monitor.history().snapshot(), history_before);
    assert_eq!(monitor.previous().copied(), baseline_before);

    // next success diffs against the last committed sample (2_000), not the failed one
    let TickOutcome::Sampled { delta, .. } = monitor.tick(&transport).await.unwrap() else {
        panic!("expected a sampled tick");
    };
    assert_eq!(delta.in_octets, 3_000);
    assert_eq!(monitor.history().len(), 2);
}

#[tokio::test]
async fn test_failed_first_tick_keeps_monitor_in_baseline_state() {
    let transport = MockTransport::new();
    transport.push_status(ErrorStatus::GenErr, 1);
    push_counters(&transport, 3, sample(1_000, 0));
    let mut monitor = Monitor::new(identity(3, 1_000), 1, 120).unwrap();

    assert!(monitor.tick(&transport).await.is_err());
    assert!(monitor.previous().is_none());
    assert!(matches!(
        monitor.tick(&transport).await.unwrap(),
        TickOutcome::Baseline(_)
    ));
}

#[test]
fn test_monitor_rejects_zero_speed_and_interval() {
    assert!(Monitor::new(identity(3, 0), 1, 120).is_err());
    assert!(Monitor::new(identity(3, 1_000), 0, 120).is_err());
}

#[test]
fn test_monitor_rejects_capacity_that_overflows() {
    assert!(matches!(
        Monitor::new(identity(3, u64::MAX), u64::MAX, 120),
        Err(UtilizationError::CapacityOverflow)
    ));
}
