use crate::{
    models::{
        deserialize_extensible, not_blank, put_all, serialize_extensible, Extensible, Members,
        Sealed,
    },
    Error,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A text message, possibly with additional information attached as custom members.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    body: String,
    members: Members,
}

impl Message {
    /// Create a message. `body` must not be blank.
    pub fn new(body: impl Into<String>) -> Result<Self, Error> {
        let body = body.into();
        not_blank(&body, "body")?;
        Ok(Message {
            body,
            members: Members::default(),
        })
    }

    /// Create a message carrying the given custom members.
    ///
    /// Fails with [`Error::ReservedKey`] if one of them is called `body`.
    pub fn with_members(
        body: impl Into<String>,
        members: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Self, Error> {
        put_all(Message::new(body)?, members)
    }

    /// The text of the message.
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Extensible for Message {
    const KNOWN_KEYS: &'static [&'static str] = &["body"];

    fn known_value(&self, key: &str) -> Option<Value> {
        match key {
            "body" => Some(Value::from(self.body.as_str())),
            _ => None,
        }
    }

    fn members(&self) -> &Members {
        &self.members
    }
}

impl Sealed for Message {
    fn members_mut(&mut self) -> &mut Members {
        &mut self.members
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_extensible(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (mut known, members) = deserialize_extensible(deserializer, Self::KNOWN_KEYS)?;
        let body: String = known
            .take::<_, D::Error>("body")?
            .ok_or_else(|| <D::Error as de::Error>::missing_field("body"))?;
        not_blank(&body, "body").map_err(<D::Error as de::Error>::custom)?;
        Ok(Message { body, members })
    }
}
