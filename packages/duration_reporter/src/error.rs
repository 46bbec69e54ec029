use thiserror::Error;

/// Errors that can occur when beginning or ending an action.
///
/// Neither error leaves any trace in the reporter: the call that produced it had no effect.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller tried to begin an action that is already in flight within the same event.
    #[error("action '{action}' is already being tracked in event '{event}'")]
    DuplicateAction {
        /// The event the action was requested in.
        event: String,

        /// The base name of the action that is already in flight.
        action: String,
    },

    /// The caller tried to end an action that is not in flight within the named event.
    #[error("no action '{action}' is being tracked in event '{event}'")]
    ActionNotFound {
        /// The event the action was requested in.
        event: String,

        /// The base name of the action that could not be found.
        action: String,
    },
}

/// A specialized `Result` type for reporter operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
