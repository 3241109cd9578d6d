use super::*;

#[test]
fn effective_workers_is_bounded_three_ways() {
    let caps = EncoderCapabilities {
        parallel_workers: true,
        available_parallelism: 8,
    };
    assert_eq!(caps.effective_workers(2), 2);
    assert_eq!(caps.effective_workers(16), MAX_WORKERS);
    assert_eq!(caps.effective_workers(0), 0);

    let small = EncoderCapabilities {
        parallel_workers: true,
        available_parallelism: 3,
    };
    assert_eq!(small.effective_workers(4), 3);
}

#[test]
fn unavailable_workers_force_inline() {
    let caps = EncoderCapabilities::inline_only();
    assert_eq!(caps.effective_workers(4), 0);
    let caps = EncoderCapabilities {
        parallel_workers: false,
        available_parallelism: 16,
    };
    assert_eq!(caps.effective_workers(4), 0);
}

#[test]
fn probe_reports_at_least_one_core() {
    let caps = EncoderCapabilities::probe();
    assert!(caps.available_parallelism >= 1);
}
