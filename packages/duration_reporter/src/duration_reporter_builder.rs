use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::pal::PlatformFacade;
use crate::{
    DurationReport, DurationReporter, DurationUnit, ReportData, ReportGenerator, ReportHook,
};

/// Creates instances of [`DurationReporter`].
///
/// Required parameters:
///
/// * None. Every option has a default.
///
/// Use `DurationReporter::builder()` to create a new instance of this builder.
///
/// See [crate-level documentation](crate) for more details on how to track actions.
#[must_use]
pub struct DurationReporterBuilder<P> {
    time_unit: DurationUnit,
    on_report_begin: Option<ReportHook<P>>,
    on_report_end: Option<ReportHook<P>>,
    report_generator: Option<ReportGenerator<P>>,
}

impl<P> DurationReporterBuilder<P>
where
    P: Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            time_unit: DurationUnit::default(),
            on_report_begin: None,
            on_report_end: None,
            report_generator: None,
        }
    }

    /// Sets the unit durations are presented in. Defaults to milliseconds.
    pub fn time_unit(mut self, time_unit: DurationUnit) -> Self {
        self.time_unit = time_unit;
        self
    }

    /// Sets the observer invoked after each accepted `begin()`.
    pub fn on_report_begin(
        mut self,
        hook: impl Fn(&str, &DurationReport<P>) + Send + Sync + 'static,
    ) -> Self {
        self.on_report_begin = Some(Arc::new(hook));
        self
    }

    /// Sets the observer invoked after each accepted `end()`.
    pub fn on_report_end(
        mut self,
        hook: impl Fn(&str, &DurationReport<P>) + Send + Sync + 'static,
    ) -> Self {
        self.on_report_end = Some(Arc::new(hook));
        self
    }

    /// Replaces the default report layout with a custom generator.
    pub fn report_generator(
        mut self,
        generator: impl Fn(&ReportData<P>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.report_generator = Some(Arc::new(generator));
        self
    }

    /// Builds the reporter with the provided configuration.
    #[must_use]
    pub fn build(self) -> DurationReporter<P> {
        DurationReporter::from_parts(
            self.time_unit,
            self.on_report_begin,
            self.on_report_end,
            self.report_generator,
            PlatformFacade::real(),
        )
    }

    /// Builds the reporter on top of a specific platform, typically a fake clock.
    #[cfg(test)]
    pub(crate) fn build_with_platform(self, platform: PlatformFacade) -> DurationReporter<P> {
        DurationReporter::from_parts(
            self.time_unit,
            self.on_report_begin,
            self.on_report_end,
            self.report_generator,
            platform,
        )
    }
}

impl<P> fmt::Debug for DurationReporterBuilder<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("time_unit", &self.time_unit)
            .field("on_report_begin", &self.on_report_begin.is_some())
            .field("on_report_end", &self.on_report_end.is_some())
            .field("report_generator", &self.report_generator.is_some())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn defaults_to_milliseconds() {
        let reporter = DurationReporter::<()>::builder().build();

        assert_eq!(reporter.time_unit(), DurationUnit::MILLISECONDS);
    }

    #[test]
    fn configures_everything() {
        let begins = Arc::new(AtomicUsize::new(0));
        let ends = Arc::new(AtomicUsize::new(0));

        let reporter = DurationReporter::<()>::builder()
            .time_unit(DurationUnit::SECONDS)
            .on_report_begin({
                let begins = Arc::clone(&begins);
                move |_, _| {
                    begins.fetch_add(1, Ordering::Relaxed);
                }
            })
            .on_report_end({
                let ends = Arc::clone(&ends);
                move |_, _| {
                    ends.fetch_add(1, Ordering::Relaxed);
                }
            })
            .report_generator(|_| "custom".to_string())
            .build();

        reporter.begin("Play", "Buffering").unwrap();
        reporter.end("Play", "Buffering").unwrap();

        assert_eq!(reporter.time_unit(), DurationUnit::SECONDS);
        assert_eq!(begins.load(Ordering::Relaxed), 1);
        assert_eq!(ends.load(Ordering::Relaxed), 1);
        assert_eq!(reporter.generate_report(), "custom");
    }

    #[test]
    fn debug_shows_which_options_are_set() {
        let builder = DurationReporter::<()>::builder().report_generator(|_| String::new());

        let debug = format!("{builder:?}");

        assert!(debug.contains("report_generator: true"));
        assert!(debug.contains("on_report_begin: false"));
    }
}
