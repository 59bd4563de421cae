use std::{any::Any, error::Error as StdError, fmt, panic::PanicHookInfo};

/// A panic, turned into an error so it can be reported.
///
/// Panics are unrecoverable: the default level policy reports them as
/// [`Level::Critical`](crate::models::Level::Critical).
///
/// ```no_run
/// # fn report(_: &rollbar_reporter::PanicError) {}
/// std::panic::set_hook(Box::new(|info| {
///     let error = rollbar_reporter::PanicError::from_hook_info(info);
///     report(&error);
/// }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicError {
    message: String,
    location: Option<String>,
}

impl PanicError {
    /// Create an error from the payload of a panic, e.g. as returned by
    /// [`catch_unwind`](std::panic::catch_unwind).
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        PanicError {
            message: payload_message(payload),
            location: None,
        }
    }

    /// Create an error inside a panic hook, including where the panic happened.
    pub fn from_hook_info(info: &PanicHookInfo<'_>) -> Self {
        PanicError {
            message: payload_message(info.payload()),
            location: info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
        }
    }

    /// The panic message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source location of the panic as `file:line:column`, if known.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

impl fmt::Display for PanicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "panicked at {}: {}", location, self.message),
            None => write!(f, "panicked: {}", self.message),
        }
    }
}

impl StdError for PanicError {}

/// Returns `true` if `error` is unrecoverable, i.e. a [`PanicError`].
pub fn is_fatal(error: &(dyn StdError + 'static)) -> bool {
    error.is::<PanicError>()
}
