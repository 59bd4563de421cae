use crate::{
    convert::{capture_frames, error_class_name},
    models::{not_blank, Frame},
    Error,
};
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error as StdError;

/// Non-stack information about an error: its type, message, and a human description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExceptionInfo")]
pub struct ExceptionInfo {
    #[serde(rename = "class")]
    class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ExceptionInfo {
    /// Create exception info for the error type `class_name`, which must not be blank.
    pub fn new(class_name: impl Into<String>) -> Result<Self, Error> {
        ExceptionInfo::with_details(class_name, None, None)
    }

    /// Create exception info with message and description.
    pub fn with_details(
        class_name: impl Into<String>,
        message: Option<String>,
        description: Option<String>,
    ) -> Result<Self, Error> {
        let class_name = class_name.into();
        not_blank(&class_name, "class_name")?;
        Ok(ExceptionInfo {
            class_name,
            message,
            description,
        })
    }

    /// Describe a single error, ignoring its sources.
    pub fn from_error(error: &(dyn StdError + 'static), description: Option<&str>) -> Self {
        let message = error.to_string();
        ExceptionInfo {
            class_name: error_class_name(error),
            message: Some(message).filter(|m| !m.is_empty()),
            description: description.map(str::to_string),
        }
    }

    /// Name of the error type.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The error message.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// A human readable description of the error.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Copy with a different error type name.
    pub fn with_class_name(self, class_name: impl Into<String>) -> Result<Self, Error> {
        ExceptionInfo::with_details(class_name, self.message, self.description)
    }

    /// Copy with a different message.
    pub fn with_message(self, message: Option<String>) -> Self {
        ExceptionInfo { message, ..self }
    }

    /// Copy with a different description.
    pub fn with_description(self, description: Option<String>) -> Self {
        ExceptionInfo {
            description,
            ..self
        }
    }
}

#[derive(Deserialize)]
struct RawExceptionInfo {
    class: String,
    message: Option<String>,
    description: Option<String>,
}

impl TryFrom<RawExceptionInfo> for ExceptionInfo {
    type Error = Error;

    fn try_from(raw: RawExceptionInfo) -> Result<Self, Self::Error> {
        ExceptionInfo::with_details(raw.class, raw.message, raw.description)
    }
}

/// A stack trace together with the error that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    frames: Vec<Frame>,
    exception: ExceptionInfo,
}

impl Trace {
    /// Create a trace. Frames are ordered outermost call first.
    pub fn new(frames: Vec<Frame>, exception: ExceptionInfo) -> Self {
        Trace { frames, exception }
    }

    /// Describe `error` with the call stack captured right now.
    ///
    /// Sources of `error` are ignored; use [`TraceChain::from_error`] to keep them.
    pub fn from_error(error: &(dyn StdError + 'static), description: Option<&str>) -> Self {
        Trace::new(
            capture_frames(),
            ExceptionInfo::from_error(error, description),
        )
    }

    /// The frames, outermost call first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Information about the error.
    pub fn exception(&self) -> &ExceptionInfo {
        &self.exception
    }

    /// Copy with different frames.
    pub fn with_frames(self, frames: Vec<Frame>) -> Self {
        Trace { frames, ..self }
    }

    /// Copy with different exception info.
    pub fn with_exception(self, exception: ExceptionInfo) -> Self {
        Trace { exception, ..self }
    }
}

/// A chain of traces, one per error in a chain of [`source`](StdError::source)s, outermost
/// error first. Never empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Trace>")]
pub struct TraceChain(Vec<Trace>);

impl TraceChain {
    /// Create a chain. Fails if `traces` is empty.
    pub fn new(traces: Vec<Trace>) -> Result<Self, Error> {
        if traces.is_empty() {
            return Err(Error::validation(
                "traces",
                "must contain at least one trace",
            ));
        }
        Ok(TraceChain(traces))
    }

    /// Walk the sources of `error`, one trace per error.
    ///
    /// The call stack is captured once and attached to the outermost trace, as is the
    /// `description`. Traces of the sources carry no frames.
    pub fn from_error(error: &(dyn StdError + 'static), description: Option<&str>) -> Self {
        let mut traces = vec![Trace::from_error(error, description)];
        let mut source = error.source();
        while let Some(cause) = source {
            traces.push(Trace::new(Vec::new(), ExceptionInfo::from_error(cause, None)));
            source = cause.source();
        }
        TraceChain(traces)
    }

    /// The traces, outermost error first.
    pub fn traces(&self) -> &[Trace] {
        &self.0
    }

    /// Copy with different traces. Fails if `traces` is empty.
    pub fn with_traces(self, traces: Vec<Trace>) -> Result<Self, Error> {
        TraceChain::new(traces)
    }
}

impl TryFrom<Vec<Trace>> for TraceChain {
    type Error = Error;

    fn try_from(traces: Vec<Trace>) -> Result<Self, Self::Error> {
        TraceChain::new(traces)
    }
}

impl Serialize for TraceChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
