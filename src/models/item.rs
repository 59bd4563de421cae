use crate::{
    models::{not_blank, Data},
    Error,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, error::Error as StdError};

/// The envelope sent to Rollbar: an access token and the detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawItem")]
pub struct Item {
    access_token: String,
    data: Data,
}

impl Item {
    /// Wrap a record. `access_token` must not be blank.
    pub fn new(access_token: impl Into<String>, data: Data) -> Result<Self, Error> {
        let access_token = access_token.into();
        not_blank(&access_token, "access_token")?;
        Ok(Item { access_token, data })
    }

    /// Shortcut for [`Data::from_error`] wrapped in an item.
    pub fn from_error(
        access_token: impl Into<String>,
        environment: impl Into<String>,
        error: &(dyn StdError + 'static),
        custom: BTreeMap<String, Value>,
    ) -> Result<Self, Error> {
        Item::new(access_token, Data::from_error(environment, error, custom)?)
    }

    /// Shortcut for [`Data::from_message`] wrapped in an item.
    pub fn from_message(
        access_token: impl Into<String>,
        environment: impl Into<String>,
        message: impl Into<String>,
        custom: BTreeMap<String, Value>,
    ) -> Result<Self, Error> {
        Item::new(access_token, Data::from_message(environment, message, custom)?)
    }

    /// The project access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The detail record.
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Take the detail record out of the envelope.
    pub fn into_data(self) -> Data {
        self.data
    }

    /// Copy with a different access token.
    pub fn with_access_token(self, access_token: impl Into<String>) -> Result<Self, Error> {
        Item::new(access_token, self.data)
    }

    /// Copy with a different detail record.
    pub fn with_data(self, data: Data) -> Self {
        Item { data, ..self }
    }
}

#[derive(Deserialize)]
struct RawItem {
    access_token: String,
    data: Data,
}

impl TryFrom<RawItem> for Item {
    type Error = Error;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        Item::new(raw.access_token, raw.data)
    }
}
