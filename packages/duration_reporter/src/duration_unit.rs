//! Units used when presenting durations.

use std::borrow::Cow;
use std::fmt;
use std::num::NonZero;
use std::time::Duration;

/// Describes how to present a duration: the number of nanoseconds in one unit and the
/// symbol printed after the converted value.
///
/// The default unit is [`DurationUnit::MILLISECONDS`].
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
/// use std::time::Duration;
///
/// use duration_reporter::DurationUnit;
///
/// let elapsed = Duration::from_micros(2_500);
///
/// assert_eq!(DurationUnit::MILLISECONDS.convert(elapsed), 2);
/// assert_eq!(DurationUnit::MICROSECONDS.convert(elapsed), 2_500);
///
/// // Custom units are possible, too.
/// let frames = DurationUnit::new(NonZero::new(16_666_667).unwrap(), " frames");
/// assert_eq!(frames.convert(Duration::from_secs(1)), 59);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DurationUnit {
    divider: NonZero<u64>,
    symbol: Cow<'static, str>,
}

impl DurationUnit {
    /// Presents durations in nanoseconds.
    pub const NANOSECONDS: Self = Self::from_static(1, "ns");

    /// Presents durations in microseconds.
    pub const MICROSECONDS: Self = Self::from_static(1_000, "μs");

    /// Presents durations in milliseconds.
    pub const MILLISECONDS: Self = Self::from_static(1_000_000, "ms");

    /// Presents durations in seconds.
    pub const SECONDS: Self = Self::from_static(1_000_000_000, "s");

    /// Creates a unit with `divider` nanoseconds per unit, rendered with `symbol`.
    #[must_use]
    pub fn new(divider: NonZero<u64>, symbol: impl Into<Cow<'static, str>>) -> Self {
        Self {
            divider,
            symbol: symbol.into(),
        }
    }

    const fn from_static(divider: u64, symbol: &'static str) -> Self {
        let Some(divider) = NonZero::new(divider) else {
            panic!("unit divider must be non-zero");
        };

        Self {
            divider,
            symbol: Cow::Borrowed(symbol),
        }
    }

    /// The number of nanoseconds in one unit.
    #[must_use]
    pub fn divider(&self) -> NonZero<u64> {
        self.divider
    }

    /// The symbol printed after a converted value.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Converts `duration` into a whole number of units, rounding down.
    #[must_use]
    pub fn convert(&self, duration: Duration) -> u128 {
        duration
            .as_nanos()
            .checked_div(u128::from(self.divider.get()))
            .expect("divider is non-zero")
    }

    /// Returns a value that renders `duration` in this unit, e.g. `30ms`.
    #[must_use]
    pub fn display(&self, duration: Duration) -> impl fmt::Display {
        DisplayDuration {
            value: self.convert(duration),
            symbol: &self.symbol,
        }
    }
}

impl Default for DurationUnit {
    fn default() -> Self {
        Self::MILLISECONDS
    }
}

struct DisplayDuration<'a> {
    value: u128,
    symbol: &'a str,
}

impl fmt::Display for DisplayDuration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.symbol)
    }
}
