use crate::{
    models::{not_blank, Message, Trace, TraceChain},
    Error,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error as StdError;

/// Raw crash report text, for platforms without a catchable error representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCrashReport")]
pub struct CrashReport {
    raw: String,
}

impl CrashReport {
    /// Create a crash report. `raw` must not be blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        not_blank(&raw, "raw")?;
        Ok(CrashReport { raw })
    }

    /// The crash report text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Copy with different text.
    pub fn with_raw(self, raw: impl Into<String>) -> Result<Self, Error> {
        CrashReport::new(raw)
    }
}

#[derive(Deserialize)]
struct RawCrashReport {
    raw: String,
}

impl TryFrom<RawCrashReport> for CrashReport {
    type Error = Error;

    fn try_from(raw: RawCrashReport) -> Result<Self, Self::Error> {
        CrashReport::new(raw.raw)
    }
}

/// The main content of an item. Exactly one kind of content is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    /// A single stack trace.
    Trace(Trace),
    /// A chain of stack traces, outermost error first.
    TraceChain(TraceChain),
    /// A text message.
    Message(Message),
    /// Raw crash report text.
    CrashReport(CrashReport),
}

impl Body {
    /// Describe `error`. Produces a [`TraceChain`] if the error has a source, otherwise a
    /// single [`Trace`]. `description` is attached to the outermost error.
    pub fn from_error(error: &(dyn StdError + 'static), description: Option<&str>) -> Self {
        if error.source().is_some() {
            Body::TraceChain(TraceChain::from_error(error, description))
        } else {
            Body::Trace(Trace::from_error(error, description))
        }
    }

    /// A message body carrying `custom` as additional members.
    pub fn from_message(
        message: impl Into<String>,
        custom: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Self, Error> {
        Message::with_members(message, custom).map(Body::Message)
    }

    /// A crash report body.
    pub fn from_crash_report(raw: impl Into<String>) -> Result<Self, Error> {
        CrashReport::new(raw).map(Body::CrashReport)
    }

    /// The trace, if this is a trace body.
    pub fn trace(&self) -> Option<&Trace> {
        match self {
            Body::Trace(trace) => Some(trace),
            _ => None,
        }
    }

    /// The trace chain, if this is a trace chain body.
    pub fn trace_chain(&self) -> Option<&TraceChain> {
        match self {
            Body::TraceChain(chain) => Some(chain),
            _ => None,
        }
    }

    /// The message, if this is a message body.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Body::Message(message) => Some(message),
            _ => None,
        }
    }

    /// The crash report, if this is a crash report body.
    pub fn crash_report(&self) -> Option<&CrashReport> {
        match self {
            Body::CrashReport(report) => Some(report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Extensible;
    use serde_json::json;

    #[derive(Debug, thiserror::Error)]
    #[error("TRICKY!")]
    struct Tricky;

    #[derive(Debug, thiserror::Error)]
    #[error("Nested Tricky!")]
    struct Nested(#[source] Tricky);

    #[test]
    fn error_without_source_is_single_trace() {
        let body = Body::from_error(&Tricky, None);
        let trace = body.trace().expect("body is a trace");
        assert_eq!("Tricky", trace.exception().class_name());
        assert_eq!(Some("TRICKY!"), trace.exception().message());
        assert!(body.trace_chain().is_none());
        assert!(body.message().is_none());
        assert!(body.crash_report().is_none());
    }

    #[test]
    fn error_with_source_is_chain() {
        let body = Body::from_error(&Nested(Tricky), None);
        let chain = body.trace_chain().expect("body is a trace chain");
        assert_eq!(2, chain.traces().len());
        assert_eq!("Nested", chain.traces()[0].exception().class_name());
        assert_eq!("Tricky", chain.traces()[1].exception().class_name());
    }

    #[test]
    fn message_with_extras() {
        let body =
            Body::from_message("Send a message", vec![("HELLO".into(), json!("WORLD"))]).unwrap();
        let message = body.message().expect("body is a message");
        assert_eq!("Send a message", message.body());
        assert_eq!(Some(json!("WORLD")), message.get("HELLO"));
    }

    #[test]
    fn serialization_format() {
        let raw = "A CRASH REPORT WOULD BE WAY MORE COMPLICATED THAN THIS";
        let body = Body::from_crash_report(raw).unwrap();
        assert_eq!(raw, body.crash_report().unwrap().raw());
        assert_eq!(
            json!({"crash_report": {"raw": raw}}),
            serde_json::to_value(&body).unwrap()
        );

        let body = Body::from_message("hi", Vec::new()).unwrap();
        assert_eq!(
            r#"{"message":{"body":"hi"}}"#,
            serde_json::to_string(&body).unwrap()
        );
    }

    #[test]
    fn deserialize_trace_chain() {
        let body: Body = serde_json::from_value(json!({
            "trace_chain": [
                {"frames": [{"filename": "src/lib.rs", "lineno": 3}], "exception": {"class": "Outer"}},
                {"frames": [], "exception": {"class": "Inner", "message": "boom"}},
            ]
        }))
        .unwrap();
        let chain = body.trace_chain().unwrap();
        assert_eq!(2, chain.traces().len());
        assert_eq!(Some(3), chain.traces()[0].frames()[0].line_number());
        assert_eq!(Some("boom"), chain.traces()[1].exception().message());
    }
}
