use serde::{Deserialize, Serialize};

/// Information about the library that reported the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notifier {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl Notifier {
    /// Describe a notifier, e.g. a framework specific integration built on top of this crate.
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Notifier {
            name: name.into(),
            version,
        }
    }

    /// Name of the notifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version of the notifier.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// This crate, with its name and version.
impl Default for Notifier {
    fn default() -> Self {
        Notifier::new(
            env!("CARGO_PKG_NAME"),
            Some(env!("CARGO_PKG_VERSION").to_string()),
        )
    }
}
