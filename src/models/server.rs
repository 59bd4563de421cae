use crate::models::{deserialize_extensible, serialize_extensible, Extensible, Members, Sealed};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// The machine on which the item occurred.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Server {
    host: Option<String>,
    root: Option<String>,
    branch: Option<String>,
    code_version: Option<String>,
    members: Members,
}

impl Server {
    /// Start building a server description.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The host the code is running on.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// File system root of the code.
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Current source control branch.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Current source control version (SHA or name).
    pub fn code_version(&self) -> Option<&str> {
        self.code_version.as_deref()
    }
}

/// Builder for [`Server`].
#[derive(Debug, Clone, Default)]
pub struct ServerBuilder {
    inner: Server,
}

impl ServerBuilder {
    /// Set the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.inner.host = Some(host.into());
        self
    }

    /// Set the file system root.
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.inner.root = Some(root.into());
        self
    }

    /// Set the source control branch.
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.inner.branch = Some(branch.into());
        self
    }

    /// Set the source control version.
    pub fn code_version(mut self, code_version: impl Into<String>) -> Self {
        self.inner.code_version = Some(code_version.into());
        self
    }

    /// Finish the server description.
    pub fn build(self) -> Server {
        self.inner
    }
}

impl Extensible for Server {
    const KNOWN_KEYS: &'static [&'static str] = &["host", "root", "branch", "code_version"];

    fn known_value(&self, key: &str) -> Option<Value> {
        let value = match key {
            "host" => &self.host,
            "root" => &self.root,
            "branch" => &self.branch,
            "code_version" => &self.code_version,
            _ => return None,
        };
        value.as_deref().map(Value::from)
    }

    fn members(&self) -> &Members {
        &self.members
    }
}

impl Sealed for Server {
    fn members_mut(&mut self) -> &mut Members {
        &mut self.members
    }
}

impl Serialize for Server {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_extensible(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Server {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (mut known, members) = deserialize_extensible(deserializer, Self::KNOWN_KEYS)?;
        Ok(Server {
            host: known.take::<_, D::Error>("host")?,
            root: known.take::<_, D::Error>("root")?,
            branch: known.take::<_, D::Error>("branch")?,
            code_version: known.take::<_, D::Error>("code_version")?,
            members,
        })
    }
}
