use crate::models::Frame;
use once_cell::sync::Lazy;
use std::{error::Error as StdError, io};

pub(crate) static PLATFORM: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
});

const IO_ERROR_CLASS: &str = "io::Error";

#[cfg(feature = "backtrace")]
const UNKNOWN_FILENAME: &str = "<unknown>";

/// Name of the error type, taken from the start of its `Debug` output.
///
/// Derived `Debug` implementations start with the type (or variant) name. Anything else falls
/// back to `"Error"`. [`std::io::Error`] prints its internal representation, so it is named
/// explicitly.
pub(crate) fn error_class_name(error: &(dyn StdError + 'static)) -> String {
    if error.is::<io::Error>() {
        return IO_ERROR_CLASS.to_string();
    }
    let debug = format!("{:?}", error);
    let name = debug
        .split(|c: char| c == ' ' || c == '(' || c == '{' || c == '\n' || c == '\r')
        .next()
        .unwrap_or_default();
    let is_identifier = name.starts_with(|c: char| c.is_alphabetic() || c == '_')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == ':');
    if is_identifier {
        name.to_string()
    } else {
        "Error".to_string()
    }
}

/// Capture the current call stack, outermost call first.
///
/// Frames inside this crate and the capturing library are left out.
#[cfg(feature = "backtrace")]
pub(crate) fn capture_frames() -> Vec<Frame> {
    let backtrace = backtrace::Backtrace::new();
    let mut frames: Vec<Frame> = backtrace
        .frames()
        .iter()
        .flat_map(|frame| frame.symbols())
        .filter_map(symbol_to_frame)
        .skip_while(|frame| frame.method().map_or(true, is_internal))
        .collect();
    frames.reverse();
    frames
}

#[cfg(not(feature = "backtrace"))]
pub(crate) fn capture_frames() -> Vec<Frame> {
    Vec::new()
}

#[cfg(feature = "backtrace")]
fn symbol_to_frame(symbol: &backtrace::BacktraceSymbol) -> Option<Frame> {
    let filename = symbol
        .filename()
        .map(|path| path.display().to_string())
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_FILENAME.to_string());
    let mut frame = Frame::new(filename).ok()?;
    if let Some(name) = symbol.name() {
        frame = frame.with_method(format!("{:#}", name));
    }
    if let Some(line_number) = symbol.lineno() {
        frame = frame.with_line_number(line_number);
    }
    if let Some(column_number) = symbol.colno() {
        frame = frame.with_column_number(column_number);
    }
    Some(frame)
}

#[cfg(feature = "backtrace")]
fn is_internal(method: &str) -> bool {
    let method = method.trim_start_matches('<');
    method.starts_with("backtrace::") || method.starts_with("rollbar_reporter::")
}
