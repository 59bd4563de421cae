use crate::{models::not_blank, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Lines of code around the one that triggered the error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pre: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    post: Option<Vec<String>>,
}

impl CodeContext {
    /// Lines before (`pre`) and after (`post`) the line that triggered the error.
    pub fn new(pre: Option<Vec<String>>, post: Option<Vec<String>>) -> Self {
        CodeContext { pre, post }
    }

    /// The lines of code before the one that triggered the error.
    pub fn pre(&self) -> Option<&[String]> {
        self.pre.as_deref()
    }

    /// The lines of code after the one that triggered the error.
    pub fn post(&self) -> Option<&[String]> {
        self.post.as_deref()
    }
}

/// A single frame of a stack trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame")]
pub struct Frame {
    filename: String,
    #[serde(rename = "lineno", skip_serializing_if = "Option::is_none")]
    line_number: Option<u32>,
    #[serde(rename = "colno", skip_serializing_if = "Option::is_none")]
    column_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<CodeContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<Vec<Value>>,
    #[serde(rename = "kwargs", skip_serializing_if = "Option::is_none")]
    keyword_args: Option<BTreeMap<String, Value>>,
}

impl Frame {
    /// Create a frame in the file `filename`, which must not be blank.
    pub fn new(filename: impl Into<String>) -> Result<Self, Error> {
        let filename = filename.into();
        not_blank(&filename, "filename")?;
        Ok(Frame {
            filename,
            line_number: None,
            column_number: None,
            method: None,
            code: None,
            context: None,
            args: None,
            keyword_args: None,
        })
    }

    /// The name of the file in which the error occurred.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The line number on which the error occurred.
    pub fn line_number(&self) -> Option<u32> {
        self.line_number
    }

    /// The column number on which the error occurred.
    pub fn column_number(&self) -> Option<u32> {
        self.column_number
    }

    /// The method in which the error occurred.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// The line of code that triggered the error.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Code around the line that triggered the error.
    pub fn context(&self) -> Option<&CodeContext> {
        self.context.as_ref()
    }

    /// Positional arguments of the call.
    pub fn args(&self) -> Option<&[Value]> {
        self.args.as_deref()
    }

    /// Keyword arguments of the call.
    pub fn keyword_args(&self) -> Option<&BTreeMap<String, Value>> {
        self.keyword_args.as_ref()
    }

    /// Copy of this frame in a different file.
    pub fn with_filename(self, filename: impl Into<String>) -> Result<Self, Error> {
        let filename = filename.into();
        not_blank(&filename, "filename")?;
        Ok(Frame { filename, ..self })
    }

    /// Copy of this frame with the line number set.
    pub fn with_line_number(self, line_number: u32) -> Self {
        Frame {
            line_number: Some(line_number),
            ..self
        }
    }

    /// Copy of this frame with the column number set.
    pub fn with_column_number(self, column_number: u32) -> Self {
        Frame {
            column_number: Some(column_number),
            ..self
        }
    }

    /// Copy of this frame with the method set.
    pub fn with_method(self, method: impl Into<String>) -> Self {
        Frame {
            method: Some(method.into()),
            ..self
        }
    }

    /// Copy of this frame with the offending line of code set.
    pub fn with_code(self, code: impl Into<String>) -> Self {
        Frame {
            code: Some(code.into()),
            ..self
        }
    }

    /// Copy of this frame with the surrounding code set.
    pub fn with_context(self, context: CodeContext) -> Self {
        Frame {
            context: Some(context),
            ..self
        }
    }

    /// Copy of this frame with the positional arguments set.
    pub fn with_args(self, args: Vec<Value>) -> Self {
        Frame {
            args: Some(args),
            ..self
        }
    }

    /// Copy of this frame with the keyword arguments set.
    pub fn with_keyword_args(self, keyword_args: BTreeMap<String, Value>) -> Self {
        Frame {
            keyword_args: Some(keyword_args),
            ..self
        }
    }
}

#[derive(Deserialize)]
struct RawFrame {
    filename: String,
    lineno: Option<u32>,
    colno: Option<u32>,
    method: Option<String>,
    code: Option<String>,
    context: Option<CodeContext>,
    args: Option<Vec<Value>>,
    kwargs: Option<BTreeMap<String, Value>>,
}

impl TryFrom<RawFrame> for Frame {
    type Error = Error;

    fn try_from(raw: RawFrame) -> Result<Self, Self::Error> {
        let mut frame = Frame::new(raw.filename)?;
        frame.line_number = raw.lineno;
        frame.column_number = raw.colno;
        frame.method = raw.method;
        frame.code = raw.code;
        frame.context = raw.context;
        frame.args = raw.args;
        frame.keyword_args = raw.kwargs;
        Ok(frame)
    }
}
