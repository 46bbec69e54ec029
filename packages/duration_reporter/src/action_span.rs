//! Scoped tracking of a single action.

use tracing::debug;

use crate::{DurationReporter, Result};

/// Ends a tracked action when dropped.
///
/// Returned by [`DurationReporter::span()`], which has already begun the action.
///
/// # Examples
///
/// ```
/// use duration_reporter::DurationReporter;
///
/// let reporter = DurationReporter::new();
///
/// let span = reporter.span("Upload", "Compress")?;
/// // Compress the data...
/// span.end_with_payload(4096_usize)?;
///
/// let data = reporter.report_data();
/// let report = data.event("Upload").unwrap().first().unwrap();
/// assert_eq!(report.end_payload(), Some(&4096));
/// # Ok::<(), duration_reporter::Error>(())
/// ```
#[derive(Debug)]
#[must_use = "The action ends when the span is dropped"]
pub struct ActionSpan<'a, P>
where
    P: Clone,
{
    reporter: &'a DurationReporter<P>,
    event: String,
    action: String,
    generation: u64,
    ended: bool,
}

impl<'a, P> ActionSpan<'a, P>
where
    P: Clone,
{
    pub(crate) fn new(
        reporter: &'a DurationReporter<P>,
        event: &str,
        action: &str,
        generation: u64,
    ) -> Self {
        Self {
            reporter,
            event: event.to_string(),
            action: action.to_string(),
            generation,
            ended: false,
        }
    }

    /// Ends the action now, attaching `payload` to its report.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionNotFound`](crate::Error::ActionNotFound) if the action is no
    /// longer in flight, which happens if the reporter was cleared while the span was alive.
    /// An instance of the same action begun after the clear is left untouched.
    pub fn end_with_payload(mut self, payload: P) -> Result<()> {
        self.ended = true;
        self.reporter
            .end_in_generation(&self.event, &self.action, Some(payload), self.generation)
    }
}

impl<P> Drop for ActionSpan<'_, P>
where
    P: Clone,
{
    fn drop(&mut self) {
        if self.ended {
            return;
        }

        if let Err(error) =
            self.reporter
                .end_in_generation(&self.event, &self.action, None, self.generation)
        {
            debug!(%error, "action span outlived its action");
        }
    }
}
