//! Process-wide reporter instance.

use std::any::Any;
use std::sync::{Arc, LazyLock};

use crate::DurationReporter;

/// Payload type of the [`global()`] reporter, able to carry any thread-safe value.
pub type Payload = Arc<dyn Any + Send + Sync>;

static GLOBAL: LazyLock<DurationReporter<Payload>> = LazyLock::new(DurationReporter::new);

/// Returns the process-wide reporter.
///
/// The instance is created with the default configuration on first use and lives for the
/// rest of the process. Prefer passing an explicit [`DurationReporter`] around where possible.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use duration_reporter::global;
///
/// global().begin_with_payload("Request", "Parse", Arc::new(512_usize))?;
/// global().end("Request", "Parse")?;
///
/// let data = global().report_data();
/// let report = data.event("Request").unwrap().first().unwrap();
/// let size = report.begin_payload().and_then(|p| p.downcast_ref::<usize>());
/// assert_eq!(size, Some(&512));
/// # Ok::<(), duration_reporter::Error>(())
/// ```
#[must_use]
pub fn global() -> &'static DurationReporter<Payload> {
    &GLOBAL
}
