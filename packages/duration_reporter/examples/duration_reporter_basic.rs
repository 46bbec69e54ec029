//! Example demonstrating key `duration_reporter` types working together.
//!
//! This example shows how to use the main types in the `duration_reporter` package:
//! - `DurationReporter`: Tracks actions grouped under events
//! - `ActionSpan`: Ends an action when dropped
//! - `ReportData`: Snapshot for custom processing
//!
//! Run with: `cargo run --example duration_reporter_basic`.

use std::thread;
use std::time::Duration;

use duration_reporter::{DurationReporter, DurationUnit};

fn main() -> Result<(), duration_reporter::Error> {
    let reporter = DurationReporter::<&'static str>::builder()
        .time_unit(DurationUnit::MILLISECONDS)
        .on_report_end(|event, report| {
            println!(
                "finished {event}/{} ({:?}) with payload {:?}",
                report.title(),
                report.duration(),
                report.end_payload()
            );
        })
        .build();

    // Buffer twice during playback.
    for chunk in ["chunk-1", "chunk-2"] {
        reporter.begin_with_payload("Play", "Buffering", chunk)?;
        thread::sleep(Duration::from_millis(15));
        reporter.end_with_payload("Play", "Buffering", "ok")?;
    }

    {
        let _span = reporter.span("Play", "Decoding")?;
        thread::sleep(Duration::from_millis(30));
    }

    // Starting an action that is already in flight is rejected.
    reporter.begin("Startup", "Load")?;
    if let Err(error) = reporter.begin("Startup", "Load") {
        println!("rejected: {error}");
    }

    println!();
    reporter.print_to_stdout();

    let data = reporter.report_data();
    for (event, reports) in data.events() {
        let incomplete = reports.iter().filter(|report| !report.is_complete()).count();
        println!("{event}: {} reports, {incomplete} still in flight", reports.len());
    }

    Ok(())
}
