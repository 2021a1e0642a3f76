//! Request lifecycle logging.
//!
//! [`log_lifecycle`] wraps any fallible future: it logs the start and end of
//! the request and, on failure, tags the error with a fresh id that appears
//! both in the log line and in the error returned to the caller.

use std::fmt;
use std::future::Future;

use tracing::{error, info};
use uuid::Uuid;

use crate::error::LifecycleError;

/// Action name used when the caller supplies none.
pub const DEFAULT_ACTION: &str = "Perform Operation";

/// Phase of a logged request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeCycle {
    /// The request was received.
    Start,
    /// The result is being sent.
    End,
}

impl LifeCycle {
    /// The phase name as logged.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::End => "End",
        }
    }
}

impl fmt::Display for LifeCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run `future`, logging its lifecycle under `action`.
///
/// # Examples
///
/// ```
/// use querystack_dynamodb_core::lifecycle::log_lifecycle;
///
/// let err = tokio_test::block_on(log_lifecycle("load user", Some("User not found"), async {
///     Err::<(), _>("no such item")
/// }))
/// .unwrap_err();
/// assert!(err.to_string().starts_with("Error: Failed to load user. User not found. Error Id: "));
/// assert!(err.to_string().ends_with(". no such item"));
/// ```
pub async fn log_lifecycle<F, T, E>(
    action: &str,
    custom_message: Option<&str>,
    future: F,
) -> Result<T, LifecycleError>
where
    F: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let action = if action.is_empty() { DEFAULT_ACTION } else { action };
    info!(action, life_cycle = %LifeCycle::Start, "Request Received");

    match future.await {
        Ok(result) => {
            info!(action, life_cycle = %LifeCycle::End, "Sending Result");
            Ok(result)
        }
        Err(cause) => {
            let error_id = Uuid::new_v4();
            let message = failure_message(action, custom_message, error_id, &cause);
            error!(action, %error_id, "{message}");
            Err(LifecycleError { error_id, message })
        }
    }
}

fn failure_message(
    action: &str,
    custom_message: Option<&str>,
    error_id: Uuid,
    cause: &dyn fmt::Display,
) -> String {
    match custom_message {
        Some(custom) => {
            format!("Error: Failed to {action}. {custom}. Error Id: {error_id}. {cause}")
        }
        None => format!("Error: Failed to {action}. Error Id: {error_id}. {cause}"),
    }
}
