use crate::{
    models::{max_length_opt, not_blank},
    Error,
};
use serde::{Deserialize, Serialize};

/// The user affected by an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPerson")]
pub struct Person {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

impl Person {
    /// Create a person. `id` must not be blank.
    pub fn new(id: impl Into<String>) -> Result<Self, Error> {
        Person::with_details(id, None, None)
    }

    /// Create a person with username and email. Both are limited to 255 characters.
    pub fn with_details(
        id: impl Into<String>,
        username: Option<String>,
        email: Option<String>,
    ) -> Result<Self, Error> {
        let id = id.into();
        not_blank(&id, "id")?;
        max_length_opt(username.as_deref(), 255, "username")?;
        max_length_opt(email.as_deref(), 255, "email")?;
        Ok(Person {
            id,
            username,
            email,
        })
    }

    /// The affected user's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The affected user's username.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The affected user's email address.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Copy of this person with a different id.
    pub fn with_id(self, id: impl Into<String>) -> Result<Self, Error> {
        Person::with_details(id, self.username, self.email)
    }

    /// Copy of this person with a different username.
    pub fn with_username(self, username: impl Into<String>) -> Result<Self, Error> {
        Person::with_details(self.id, Some(username.into()), self.email)
    }

    /// Copy of this person with a different email address.
    pub fn with_email(self, email: impl Into<String>) -> Result<Self, Error> {
        Person::with_details(self.id, self.username, Some(email.into()))
    }
}

#[derive(Deserialize)]
struct RawPerson {
    id: String,
    username: Option<String>,
    email: Option<String>,
}

impl TryFrom<RawPerson> for Person {
    type Error = Error;

    fn try_from(raw: RawPerson) -> Result<Self, Self::Error> {
        Person::with_details(raw.id, raw.username, raw.email)
    }
}
