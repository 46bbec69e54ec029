//! Snapshots of captured reports.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::{DurationReport, DurationUnit};

/// Owned snapshot of everything a [`DurationReporter`](crate::DurationReporter) has captured.
///
/// A snapshot is not affected by any later activity on the reporter and can be sent to other
/// threads for processing. Events are ordered by name, reports within an event in the order
/// their actions began.
///
/// The snapshot also carries the [`DurationUnit`] the reporter was configured with when the
/// snapshot was taken, which is the unit used by the [`Display`](fmt::Display) implementation.
///
/// # Examples
///
/// ```
/// use duration_reporter::DurationReporter;
///
/// let reporter = DurationReporter::<()>::new();
/// reporter.begin("Play", "Buffering")?;
/// reporter.end("Play", "Buffering")?;
/// reporter.begin("Play", "Decoding")?;
///
/// let data = reporter.report_data();
///
/// for (event, reports) in data.events() {
///     for report in reports {
///         println!("{event}/{}: {:?}", report.title(), report.duration());
///     }
/// }
///
/// // Only the completed action contributes to the total.
/// let buffering = data.event("Play").unwrap().first().unwrap().duration().unwrap();
/// assert_eq!(data.total_duration("Play"), Some(buffering));
/// # Ok::<(), duration_reporter::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct ReportData<P> {
    events: BTreeMap<String, Vec<DurationReport<P>>>,
    time_unit: DurationUnit,
}

impl<P> ReportData<P> {
    pub(crate) fn new(
        events: BTreeMap<String, Vec<DurationReport<P>>>,
        time_unit: DurationUnit,
    ) -> Self {
        Self { events, time_unit }
    }

    /// Whether the snapshot contains no reports at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.values().all(Vec::is_empty)
    }

    /// Returns an iterator over the event names and their reports, ordered by event name.
    pub fn events(&self) -> impl Iterator<Item = (&str, &[DurationReport<P>])> {
        self.events
            .iter()
            .map(|(name, reports)| (name.as_str(), reports.as_slice()))
    }

    /// Returns the reports of one event, in the order their actions began.
    #[must_use]
    pub fn event(&self, name: &str) -> Option<&[DurationReport<P>]> {
        self.events.get(name).map(Vec::as_slice)
    }

    /// Sums the durations of all completed reports of one event.
    ///
    /// Incomplete reports contribute nothing. Returns `None` if the event is unknown.
    #[must_use]
    pub fn total_duration(&self, event: &str) -> Option<Duration> {
        self.events.get(event).map(|reports| sum_completed(reports))
    }

    /// The unit the reporter was configured to present durations in.
    #[must_use]
    pub fn time_unit(&self) -> &DurationUnit {
        &self.time_unit
    }

    /// Consumes the snapshot, returning the underlying map from event name to reports.
    #[must_use]
    pub fn into_events(self) -> BTreeMap<String, Vec<DurationReport<P>>> {
        self.events
    }
}

fn sum_completed<P>(reports: &[DurationReport<P>]) -> Duration {
    reports
        .iter()
        .filter_map(DurationReport::duration)
        .fold(Duration::ZERO, |total, duration| {
            total.checked_add(duration).expect(
                "event duration accumulation overflows Duration - this indicates an unrealistic scenario",
            )
        })
}

/// Share of `total` taken by `part`, in percent.
#[expect(
    clippy::cast_precision_loss,
    reason = "percentages are only rendered with two decimals, so losing precision on huge values is harmless"
)]
fn percentage(part: Duration, total: Duration) -> Option<f64> {
    if total.is_zero() {
        return None;
    }

    Some(part.as_nanos() as f64 / total.as_nanos() as f64 * 100.0)
}

/// Renders the default report layout.
///
/// ```text
/// Play - 100ms
///   1. Buffering 30ms 30.00%
///   2. Buffering2 70ms 70.00%
/// ```
///
/// Incomplete reports are marked as such and have no percentage. If the total of an event is
/// zero, percentages are rendered as `n/a`.
impl<P> fmt::Display for ReportData<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No duration reports captured.");
        }

        for (event, reports) in &self.events {
            if reports.is_empty() {
                continue;
            }

            let total = sum_completed(reports);
            writeln!(f, "{event} - {}", self.time_unit.display(total))?;

            for (index, report) in (1_usize..).zip(reports) {
                write!(f, "  {index}. {}", report.title())?;

                match report.duration() {
                    Some(duration) => {
                        write!(f, " {}", self.time_unit.display(duration))?;

                        match percentage(duration, total) {
                            Some(share) => writeln!(f, " {share:.2}%")?,
                            None => writeln!(f, " n/a")?,
                        }
                    }
                    None => writeln!(f, " (incomplete)")?,
                }
            }
        }

        Ok(())
    }
}
