//! A single timed action instance.

use std::time::{Duration, Instant};

/// The record of one action: when it began, when it ended and what payloads were attached.
///
/// Reports are created by [`DurationReporter::begin()`](crate::DurationReporter::begin) and
/// completed by the matching [`DurationReporter::end()`](crate::DurationReporter::end). Once
/// complete, a report never changes again. Callers only ever see reports through snapshots
/// and observer hooks.
///
/// # Examples
///
/// ```
/// use duration_reporter::DurationReporter;
///
/// let reporter = DurationReporter::new();
/// reporter.begin_with_payload("Download", "Fetch", "https://example.com")?;
/// reporter.end("Download", "Fetch")?;
///
/// let data = reporter.report_data();
/// let report = data.event("Download").unwrap().first().unwrap();
///
/// assert_eq!(report.title(), "Fetch");
/// assert!(report.is_complete());
/// assert_eq!(report.begin_payload(), Some(&"https://example.com"));
/// assert_eq!(report.end_payload(), None);
/// assert!(report.duration().is_some());
/// # Ok::<(), duration_reporter::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct DurationReport<P> {
    action: String,
    title: String,
    begin_timestamp: Option<Instant>,
    end_timestamp: Option<Instant>,
    begin_payload: Option<P>,
    end_payload: Option<P>,
}

impl<P> DurationReport<P> {
    pub(crate) fn new(action: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            title: title.into(),
            begin_timestamp: None,
            end_timestamp: None,
            begin_payload: None,
            end_payload: None,
        }
    }

    /// Records `now` as the beginning of the action.
    ///
    /// Has no effect if the report has already begun.
    pub(crate) fn begin(&mut self, now: Instant, payload: Option<P>) {
        if self.begin_timestamp.is_some() {
            return;
        }

        self.begin_timestamp = Some(now);
        self.begin_payload = payload;
    }

    /// Records `now` as the end of the action.
    ///
    /// Has no effect if the report is already complete.
    pub(crate) fn end(&mut self, now: Instant, payload: Option<P>) {
        if self.is_complete() {
            return;
        }

        self.end_timestamp = Some(now);
        self.end_payload = payload;
    }

    /// The base action name this report was begun with.
    ///
    /// Repeated instances of the same action share the base name but have distinct titles.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The title of the report, unique among the instances of its action within one event.
    ///
    /// The first instance of an action is titled with the bare action name. Later instances
    /// get the 1-based instance number appended: `Buffering`, `Buffering2`, `Buffering3`.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// When the action began.
    #[must_use]
    pub fn begin_timestamp(&self) -> Option<Instant> {
        self.begin_timestamp
    }

    /// When the action ended, if it has ended.
    #[must_use]
    pub fn end_timestamp(&self) -> Option<Instant> {
        self.end_timestamp
    }

    /// The payload attached when the action began.
    #[must_use]
    pub fn begin_payload(&self) -> Option<&P> {
        self.begin_payload.as_ref()
    }

    /// The payload attached when the action ended.
    #[must_use]
    pub fn end_payload(&self) -> Option<&P> {
        self.end_payload.as_ref()
    }

    /// How long the action took, or `None` if it has not both begun and ended.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        match (self.begin_timestamp, self.end_timestamp) {
            (Some(begin), Some(end)) => Some(end.saturating_duration_since(begin)),
            _ => None,
        }
    }

    /// Whether the action has ended.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.end_timestamp.is_some()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn instants() -> (Instant, Instant) {
        let begin = Instant::now();
        let end = begin
            .checked_add(Duration::from_millis(30))
            .expect("tiny offset cannot overflow");
        (begin, end)
    }

    #[test]
    fn new_report_has_no_duration() {
        let report = DurationReport::<()>::new("Buffering", "Buffering");

        assert!(report.begin_timestamp().is_none());
        assert!(report.duration().is_none());
        assert!(!report.is_complete());
    }

    #[test]
    fn begun_report_is_incomplete() {
        let (begin, _) = instants();
        let mut report = DurationReport::<()>::new("Buffering", "Buffering");

        report.begin(begin, None);

        assert_eq!(report.begin_timestamp(), Some(begin));
        assert!(!report.is_complete());
        assert!(report.duration().is_none());
    }

    #[test]
    fn ended_report_has_duration() {
        let (begin, end) = instants();
        let mut report = DurationReport::new("Buffering", "Buffering2");

        report.begin(begin, Some(1));
        report.end(end, Some(2));

        assert!(report.is_complete());
        assert_eq!(report.duration(), Some(Duration::from_millis(30)));
        assert_eq!(report.action(), "Buffering");
        assert_eq!(report.title(), "Buffering2");
        assert_eq!(report.begin_payload(), Some(&1));
        assert_eq!(report.end_payload(), Some(&2));
    }

    #[test]
    fn second_begin_is_ignored() {
        let (begin, later) = instants();
        let mut report = DurationReport::new("Load", "Load");

        report.begin(begin, Some("first"));
        report.begin(later, Some("second"));

        assert_eq!(report.begin_timestamp(), Some(begin));
        assert_eq!(report.begin_payload(), Some(&"first"));
    }

    #[test]
    fn second_end_is_ignored() {
        let (begin, end) = instants();
        let mut report = DurationReport::new("Load", "Load");

        report.begin(begin, None);
        report.end(end, Some("first"));
        report.end(
            end.checked_add(Duration::from_secs(1))
                .expect("tiny offset cannot overflow"),
            Some("second"),
        );

        assert_eq!(report.duration(), Some(Duration::from_millis(30)));
        assert_eq!(report.end_payload(), Some(&"first"));
    }

    #[test]
    fn end_without_begin_has_no_duration() {
        let (_, end) = instants();
        let mut report = DurationReport::<()>::new("Load", "Load");

        report.end(end, None);

        assert!(report.is_complete());
        assert!(report.duration().is_none());
    }

    static_assertions::assert_impl_all!(DurationReport<()>: Send, Sync);
}
