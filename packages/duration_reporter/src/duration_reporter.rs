use std::any::type_name;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{debug, trace, warn};

use crate::pal::{Platform, PlatformFacade};
use crate::{
    ActionSpan, DurationReport, DurationReporterBuilder, DurationUnit, ERR_POISONED_LOCK, Error,
    ReportData, Result,
};

/// Observer invoked with the event name and a copy of a report that just began or ended.
pub(crate) type ReportHook<P> = Arc<dyn Fn(&str, &DurationReport<P>) + Send + Sync>;

/// Renders a snapshot of the reporter into a string.
///
/// The default generator renders the layout of [`ReportData`]'s `Display` implementation.
pub(crate) type ReportGenerator<P> = Arc<dyn Fn(&ReportData<P>) -> String + Send + Sync>;

/// Tracks the duration of named actions grouped under named events.
///
/// Each event holds the reports of its actions in the order they began. An action may be
/// tracked any number of times within one event, but only one instance of it may be in flight
/// at a time. Repeated instances are titled `action`, `action2`, `action3` and so on.
///
/// The type parameter `P` is the type of the optional payloads callers may attach when an
/// action begins or ends. The reporter never looks at payloads.
///
/// # Examples
///
/// ```
/// use duration_reporter::{DurationReporter, DurationUnit};
///
/// let reporter = DurationReporter::<()>::builder()
///     .time_unit(DurationUnit::MICROSECONDS)
///     .on_report_end(|event, report| {
///         println!("{event}/{} took {:?}", report.title(), report.duration());
///     })
///     .build();
///
/// reporter.begin("Play", "Buffering")?;
/// reporter.end("Play", "Buffering")?;
///
/// // Beginning an action that is already in flight is rejected.
/// reporter.begin("Play", "Decoding")?;
/// assert!(reporter.begin("Play", "Decoding").is_err());
///
/// reporter.print_to_stdout();
/// # Ok::<(), duration_reporter::Error>(())
/// ```
pub struct DurationReporter<P = ()> {
    state: Mutex<ReporterState<P>>,
    platform: PlatformFacade,
}

struct ReporterState<P> {
    events: BTreeMap<String, Vec<DurationReport<P>>>,
    // Bumped by every `clear()` so spans can tell that their action is gone.
    generation: u64,
    time_unit: DurationUnit,
    on_report_begin: Option<ReportHook<P>>,
    on_report_end: Option<ReportHook<P>>,
    report_generator: Option<ReportGenerator<P>>,
}

impl<P> DurationReporter<P>
where
    P: Clone,
{
    /// Creates a reporter with the default configuration.
    ///
    /// Durations are presented in milliseconds, there are no observer hooks and reports are
    /// rendered with the default generator.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder to configure a new reporter.
    #[must_use]
    pub fn builder() -> DurationReporterBuilder<P> {
        DurationReporterBuilder::new()
    }

    pub(crate) fn from_parts(
        time_unit: DurationUnit,
        on_report_begin: Option<ReportHook<P>>,
        on_report_end: Option<ReportHook<P>>,
        report_generator: Option<ReportGenerator<P>>,
        platform: PlatformFacade,
    ) -> Self {
        Self {
            state: Mutex::new(ReporterState {
                events: BTreeMap::new(),
                generation: 0,
                time_unit,
                on_report_begin,
                on_report_end,
                report_generator,
            }),
            platform,
        }
    }

    /// Begins tracking `action` within `event`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateAction`] if an instance of `action` is already in flight
    /// within `event`. The reporter is not modified in that case.
    pub fn begin(&self, event: &str, action: &str) -> Result<()> {
        self.begin_core(event, action, None).map(|_| ())
    }

    /// Begins tracking `action` within `event`, attaching `payload` to the new report.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateAction`] if an instance of `action` is already in flight
    /// within `event`. The reporter is not modified in that case.
    pub fn begin_with_payload(&self, event: &str, action: &str, payload: P) -> Result<()> {
        self.begin_core(event, action, Some(payload)).map(|_| ())
    }

    /// Returns the generation the action was begun in.
    fn begin_core(&self, event: &str, action: &str, payload: Option<P>) -> Result<u64> {
        let (hook, report, generation) = {
            let mut state = self.state.lock().expect(ERR_POISONED_LOCK);
            // Taken under the lock so that timestamps follow the order of the operations.
            let now = self.platform.now();

            let previous_instances = match state.events.get(event) {
                Some(reports) => {
                    let family = reports.iter().filter(|report| report.action() == action);

                    if family.clone().any(|report| !report.is_complete()) {
                        warn!(event, action, "action is already being tracked");

                        return Err(Error::DuplicateAction {
                            event: event.to_string(),
                            action: action.to_string(),
                        });
                    }

                    family.count()
                }
                None => 0,
            };

            let mut report = DurationReport::new(action, instance_title(action, previous_instances));
            report.begin(now, payload);

            debug!(event, title = report.title(), "action began");

            let hook = state.on_report_begin.clone();
            let hook_report = hook.as_ref().map(|_| report.clone());

            state
                .events
                .entry(event.to_string())
                .or_default()
                .push(report);

            (hook, hook_report, state.generation)
        };

        if let (Some(hook), Some(report)) = (hook, report) {
            hook(event, &report);
        }

        Ok(generation)
    }

    /// Ends the in-flight instance of `action` within `event`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionNotFound`] if no instance of `action` is in flight within
    /// `event`. The reporter is not modified in that case.
    pub fn end(&self, event: &str, action: &str) -> Result<()> {
        self.end_core(event, action, None, None)
    }

    /// Ends the in-flight instance of `action` within `event`, attaching `payload` to its report.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionNotFound`] if no instance of `action` is in flight within
    /// `event`. The reporter is not modified in that case.
    pub fn end_with_payload(&self, event: &str, action: &str, payload: P) -> Result<()> {
        self.end_core(event, action, Some(payload), None)
    }

    /// Ends the in-flight instance of `action` that was begun in `generation`.
    ///
    /// Fails with [`Error::ActionNotFound`] if the reporter has been cleared since then, even
    /// if a new instance of the action has been begun after the clear.
    pub(crate) fn end_in_generation(
        &self,
        event: &str,
        action: &str,
        payload: Option<P>,
        generation: u64,
    ) -> Result<()> {
        self.end_core(event, action, payload, Some(generation))
    }

    fn end_core(
        &self,
        event: &str,
        action: &str,
        payload: Option<P>,
        generation: Option<u64>,
    ) -> Result<()> {
        let (hook, report) = {
            let mut state = self.state.lock().expect(ERR_POISONED_LOCK);
            let now = self.platform.now();
            let hook = state.on_report_end.clone();
            let current_generation = state.generation;

            let Some(report) = state
                .events
                .get_mut(event)
                .filter(|_| generation.is_none_or(|generation| generation == current_generation))
                .and_then(|reports| {
                    reports
                        .iter_mut()
                        .rev()
                        .find(|report| report.action() == action && !report.is_complete())
                })
            else {
                warn!(event, action, "action to end is not being tracked");

                return Err(Error::ActionNotFound {
                    event: event.to_string(),
                    action: action.to_string(),
                });
            };

            report.end(now, payload);

            debug!(
                event,
                title = report.title(),
                duration = ?report.duration(),
                "action ended"
            );

            let hook_report = hook.as_ref().map(|_| report.clone());
            (hook, hook_report)
        };

        if let (Some(hook), Some(report)) = (hook, report) {
            hook(event, &report);
        }

        Ok(())
    }

    /// Begins tracking `action` within `event` and returns a span that ends it when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateAction`] if an instance of `action` is already in flight
    /// within `event`.
    ///
    /// # Examples
    ///
    /// ```
    /// use duration_reporter::DurationReporter;
    ///
    /// let reporter = DurationReporter::<()>::new();
    ///
    /// {
    ///     let _span = reporter.span("Play", "Buffering")?;
    ///     // Buffer some content...
    /// }
    ///
    /// let data = reporter.report_data();
    /// assert!(data.event("Play").unwrap().first().unwrap().is_complete());
    /// # Ok::<(), duration_reporter::Error>(())
    /// ```
    pub fn span(&self, event: &str, action: &str) -> Result<ActionSpan<'_, P>> {
        let generation = self.begin_core(event, action, None)?;

        Ok(ActionSpan::new(self, event, action, generation))
    }

    /// Tracks `action` within `event` for as long as `f` runs and returns the result of `f`.
    ///
    /// `f` is always executed. If the action cannot be tracked because an instance of it is
    /// already in flight, the failure is logged and `f` runs untracked.
    pub fn measure<R>(&self, event: &str, action: &str, f: impl FnOnce() -> R) -> R {
        match self.span(event, action) {
            Ok(_span) => f(),
            Err(error) => {
                debug!(%error, "running measured function untracked");
                f()
            }
        }
    }

    /// Returns an owned snapshot of all captured reports.
    #[must_use]
    pub fn report_data(&self) -> ReportData<P> {
        let state = self.state.lock().expect(ERR_POISONED_LOCK);

        trace!(events = state.events.len(), "taking report snapshot");

        ReportData::new(state.events.clone(), state.time_unit.clone())
    }

    /// Renders all captured reports with the configured report generator.
    #[must_use]
    pub fn generate_report(&self) -> String {
        let (data, generator) = {
            let state = self.state.lock().expect(ERR_POISONED_LOCK);

            (
                ReportData::new(state.events.clone(), state.time_unit.clone()),
                state.report_generator.clone(),
            )
        };

        trace!(custom_generator = generator.is_some(), "generating report");

        match generator {
            Some(generator) => generator(&data),
            None => data.to_string(),
        }
    }

    /// Prints the generated report to stdout.
    ///
    /// Prints nothing if no reports were captured.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        if self.is_empty() {
            return;
        }

        println!("{}", self.generate_report());
    }

    /// Whether no reports have been captured since creation or the last [`clear()`](Self::clear).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state
            .lock()
            .expect(ERR_POISONED_LOCK)
            .events
            .values()
            .all(Vec::is_empty)
    }

    /// Removes all captured reports, including in-flight ones.
    ///
    /// Numbering of repeated actions starts over afterwards. Configuration is kept.
    pub fn clear(&self) {
        let mut state = self.state.lock().expect(ERR_POISONED_LOCK);

        debug!(events = state.events.len(), "clearing all reports");

        state.events.clear();
        state.generation = state.generation.wrapping_add(1);
    }

    /// The unit durations are presented in.
    #[must_use]
    pub fn time_unit(&self) -> DurationUnit {
        self.state.lock().expect(ERR_POISONED_LOCK).time_unit.clone()
    }

    /// Sets the unit durations are presented in.
    pub fn set_time_unit(&self, time_unit: DurationUnit) {
        self.state.lock().expect(ERR_POISONED_LOCK).time_unit = time_unit;
    }

    /// Sets the observer invoked whenever an action begins, replacing any previous one.
    ///
    /// The observer runs on the thread that began the action, after the reporter has been
    /// updated and its lock released.
    ///
    /// Observers of operations racing on different threads may run in a different order than
    /// the operations were applied to the reporter.
    pub fn set_on_report_begin(
        &self,
        hook: impl Fn(&str, &DurationReport<P>) + Send + Sync + 'static,
    ) {
        self.state.lock().expect(ERR_POISONED_LOCK).on_report_begin = Some(Arc::new(hook));
    }

    /// Sets the observer invoked whenever an action ends, replacing any previous one.
    ///
    /// The observer runs on the thread that ended the action, after the reporter has been
    /// updated and its lock released.
    ///
    /// Observers of operations racing on different threads may run in a different order than
    /// the operations were applied to the reporter.
    pub fn set_on_report_end(
        &self,
        hook: impl Fn(&str, &DurationReport<P>) + Send + Sync + 'static,
    ) {
        self.state.lock().expect(ERR_POISONED_LOCK).on_report_end = Some(Arc::new(hook));
    }

    /// Removes both observers.
    pub fn clear_hooks(&self) {
        let mut state = self.state.lock().expect(ERR_POISONED_LOCK);
        state.on_report_begin = None;
        state.on_report_end = None;
    }

    /// Replaces the function used by [`generate_report()`](Self::generate_report).
    pub fn set_report_generator(
        &self,
        generator: impl Fn(&ReportData<P>) -> String + Send + Sync + 'static,
    ) {
        self.state.lock().expect(ERR_POISONED_LOCK).report_generator = Some(Arc::new(generator));
    }

    /// Goes back to rendering reports with the default layout.
    pub fn reset_report_generator(&self) {
        self.state.lock().expect(ERR_POISONED_LOCK).report_generator = None;
    }
}

impl<P> Default for DurationReporter<P>
where
    P: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for DurationReporter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event_count = self.state.lock().expect(ERR_POISONED_LOCK).events.len();

        f.debug_struct(type_name::<Self>())
            .field("event_count", &event_count)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl<P> fmt::Display for DurationReporter<P>
where
    P: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.generate_report())
    }
}

/// Title of the instance of `action` that follows `previous_instances` earlier ones.
fn instance_title(action: &str, previous_instances: usize) -> String {
    if previous_instances == 0 {
        return action.to_string();
    }

    let number = previous_instances
        .checked_add(1)
        .expect("instance count overflows usize - this indicates an unrealistic scenario");

    format!("{action}{number}")
}
