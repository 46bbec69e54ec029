#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Track how long named actions take, grouped under named events.
//!
//! Callers mark the beginning and end of an action inside an event. The reporter keeps
//! every such action as a [`DurationReport`] and can render a human-readable summary with
//! the total duration of each event and the share of that total taken by each action.
//!
//! The core functionality includes:
//! - [`DurationReporter`] - Owns the registry of events and their action reports
//! - [`DurationReport`] - A single timed action instance
//! - [`DurationUnit`] - Display unit used when rendering durations
//! - [`ReportData`] - Owned snapshot of everything the reporter has captured
//! - [`ActionSpan`] - Ends an action when dropped
//!
//! # Simple usage
//!
//! ```
//! use duration_reporter::DurationReporter;
//!
//! let reporter = DurationReporter::<()>::new();
//!
//! reporter.begin("Play", "Buffering")?;
//! // Buffer some content...
//! reporter.end("Play", "Buffering")?;
//!
//! println!("{}", reporter.generate_report());
//! # Ok::<(), duration_reporter::Error>(())
//! ```
//!
//! # Repeated actions
//!
//! The same action may be tracked any number of times within one event, as long as the
//! previous instance has ended. Repeated instances are numbered in the order they began:
//!
//! ```
//! use duration_reporter::DurationReporter;
//!
//! let reporter = DurationReporter::<()>::new();
//!
//! for _ in 0..3 {
//!     reporter.begin("Play", "Buffering")?;
//!     reporter.end("Play", "Buffering")?;
//! }
//!
//! let data = reporter.report_data();
//! let titles: Vec<_> = data
//!     .event("Play")
//!     .unwrap()
//!     .iter()
//!     .map(|report| report.title())
//!     .collect();
//!
//! assert_eq!(titles, ["Buffering", "Buffering2", "Buffering3"]);
//! # Ok::<(), duration_reporter::Error>(())
//! ```
//!
//! Beginning an action that is still in flight is rejected with [`Error::DuplicateAction`]
//! and ending an action that is not in flight is rejected with [`Error::ActionNotFound`].
//! Neither changes the state of the reporter. Both are also logged via `tracing`.
//!
//! # Scoped measurement
//!
//! ```
//! use duration_reporter::DurationReporter;
//!
//! let reporter = DurationReporter::<()>::new();
//!
//! {
//!     let _span = reporter.span("Startup", "Load configuration")?;
//!     // Load the configuration...
//! } // The action ends here.
//!
//! let sum = reporter.measure("Startup", "Warm up", || (0..1000_u64).sum::<u64>());
//! assert_eq!(sum, 499_500);
//! # Ok::<(), duration_reporter::Error>(())
//! ```
//!
//! # Threading
//!
//! All operations on a [`DurationReporter`] are serialized through one lock, so the same
//! reporter can be shared by any number of threads. Observer hooks and report generators
//! are invoked after that lock has been released, which means they may call back into the
//! reporter.
//!
//! A process-wide instance is available via [`global()`] for code that cannot pass a
//! reporter around explicitly.

mod action_span;
mod duration_report;
mod duration_reporter;
mod duration_reporter_builder;
mod duration_unit;
mod error;
mod global;
mod pal;
mod report_data;

pub use action_span::ActionSpan;
pub use duration_report::DurationReport;
pub use duration_reporter::DurationReporter;
pub(crate) use duration_reporter::{ReportGenerator, ReportHook};
pub use duration_reporter_builder::DurationReporterBuilder;
pub use duration_unit::DurationUnit;
pub use error::{Error, Result};
pub use global::{Payload, global};
pub use report_data::ReportData;

pub(crate) const ERR_POISONED_LOCK: &str =
    "poisoned lock - a panic occurred while the reporter state was being modified";
