//! Thread safety integration tests for `duration_reporter`.
//!
//! These tests hammer one reporter from many threads and verify that no report is lost
//! or corrupted.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use duration_reporter::DurationReporter;

const THREADS: usize = 16;
const EVENTS_PER_THREAD: usize = 50;
const CYCLES_PER_EVENT: usize = 5;

#[test]
fn disjoint_events_from_many_threads() {
    let reporter = Arc::new(DurationReporter::<usize>::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_index| {
            let reporter = Arc::clone(&reporter);
            thread::spawn(move || {
                for event_index in 0..EVENTS_PER_THREAD {
                    let event = format!("thread{thread_index}-event{event_index}");
                    for cycle in 0..CYCLES_PER_EVENT {
                        reporter
                            .begin_with_payload(&event, "Work", cycle)
                            .unwrap();
                        reporter.end(&event, "Work").unwrap();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let data = reporter.report_data();
    assert_eq!(data.events().count(), THREADS * EVENTS_PER_THREAD);

    for (event, reports) in data.events() {
        assert_eq!(reports.len(), CYCLES_PER_EVENT, "event {event} lost reports");

        for (cycle, report) in reports.iter().enumerate() {
            let expected_title = if cycle == 0 {
                "Work".to_string()
            } else {
                format!("Work{}", cycle + 1)
            };

            assert_eq!(report.title(), expected_title);
            assert_eq!(report.begin_payload(), Some(&cycle));
            assert!(report.is_complete());
        }
    }
}

#[test]
fn shared_event_from_many_threads() {
    let reporter = Arc::new(DurationReporter::<()>::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_index| {
            let reporter = Arc::clone(&reporter);
            thread::spawn(move || {
                let action = format!("worker{thread_index}");
                for _ in 0..CYCLES_PER_EVENT {
                    reporter.begin("Shared", &action).unwrap();
                    reporter.end("Shared", &action).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let data = reporter.report_data();
    let reports = data.event("Shared").unwrap();
    assert_eq!(reports.len(), THREADS * CYCLES_PER_EVENT);

    for thread_index in 0..THREADS {
        let action = format!("worker{thread_index}");
        let titles: Vec<_> = reports
            .iter()
            .filter(|report| report.action() == action)
            .map(|report| report.title().to_string())
            .collect();

        let expected: Vec<_> = (0..CYCLES_PER_EVENT)
            .map(|cycle| {
                if cycle == 0 {
                    action.clone()
                } else {
                    format!("{action}{}", cycle + 1)
                }
            })
            .collect();

        assert_eq!(titles, expected);
    }
}

#[test]
fn hooks_run_on_calling_threads_without_deadlock() {
    let ends = Arc::new(AtomicUsize::new(0));

    let reporter = Arc::new(
        DurationReporter::<()>::builder()
            .on_report_end({
                let ends = Arc::clone(&ends);
                move |_, _| {
                    ends.fetch_add(1, Ordering::Relaxed);
                }
            })
            .build(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_index| {
            let reporter = Arc::clone(&reporter);
            thread::spawn(move || {
                let event = format!("event{thread_index}");
                for _ in 0..CYCLES_PER_EVENT {
                    reporter.begin(&event, "Work").unwrap();
                    reporter.end(&event, "Work").unwrap();
                    // Readers interleave with writers.
                    let _report = reporter.generate_report();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(ends.load(Ordering::Relaxed), THREADS * CYCLES_PER_EVENT);
}

#[test]
fn report_data_can_be_sent_to_other_threads() {
    let reporter = DurationReporter::<()>::new();
    reporter.begin("Play", "Buffering").unwrap();
    reporter.end("Play", "Buffering").unwrap();

    let data = reporter.report_data();
    let handle = thread::spawn(move || data.total_duration("Play"));

    assert!(handle.join().unwrap().is_some());
}
