//! Platform abstraction layer for the monotonic clock.
//!
//! This module allows switching between the real clock (backed by `std::time::Instant`)
//! and a fake clock that tests can move forward by hand.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Platform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
