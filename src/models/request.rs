use crate::models::{deserialize_extensible, serialize_extensible, Extensible, Members, Sealed};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::{collections::BTreeMap, net::IpAddr};

/// The HTTP request that triggered the item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Request {
    url: Option<String>,
    method: Option<String>,
    headers: Option<BTreeMap<String, String>>,
    params: Option<BTreeMap<String, String>>,
    get: Option<BTreeMap<String, String>>,
    query_string: Option<String>,
    post: Option<BTreeMap<String, Value>>,
    body: Option<String>,
    user_ip: Option<IpAddr>,
    members: Members,
}

impl Request {
    /// Start building a request. Known members can only be set here.
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// The url.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The HTTP method.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// The HTTP headers.
    pub fn headers(&self) -> Option<&BTreeMap<String, String>> {
        self.headers.as_ref()
    }

    /// The routing parameters, typically parsed out of the URL by your routing module.
    pub fn params(&self) -> Option<&BTreeMap<String, String>> {
        self.params.as_ref()
    }

    /// The parsed query string parameters.
    pub fn get_params(&self) -> Option<&BTreeMap<String, String>> {
        self.get.as_ref()
    }

    /// The raw query string.
    pub fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    /// The parsed POST parameters.
    pub fn post_params(&self) -> Option<&BTreeMap<String, Value>> {
        self.post.as_ref()
    }

    /// The raw request body.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// IP address of the affected user.
    pub fn user_ip(&self) -> Option<IpAddr> {
        self.user_ip
    }
}

/// Builder for [`Request`].
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    inner: Request,
}

impl RequestBuilder {
    /// Set the url.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.inner.url = Some(url.into());
        self
    }

    /// Set the HTTP method.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.inner.method = Some(method.into());
        self
    }

    /// Set the HTTP headers.
    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.inner.headers = Some(headers);
        self
    }

    /// Set the routing parameters.
    pub fn params(mut self, params: BTreeMap<String, String>) -> Self {
        self.inner.params = Some(params);
        self
    }

    /// Set the parsed query string parameters.
    pub fn get_params(mut self, get: BTreeMap<String, String>) -> Self {
        self.inner.get = Some(get);
        self
    }

    /// Set the raw query string.
    pub fn query_string(mut self, query_string: impl Into<String>) -> Self {
        self.inner.query_string = Some(query_string.into());
        self
    }

    /// Set the parsed POST parameters.
    pub fn post_params(mut self, post: BTreeMap<String, Value>) -> Self {
        self.inner.post = Some(post);
        self
    }

    /// Set the raw request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.inner.body = Some(body.into());
        self
    }

    /// Set the IP address of the affected user.
    pub fn user_ip(mut self, user_ip: IpAddr) -> Self {
        self.inner.user_ip = Some(user_ip);
        self
    }

    /// Finish the request.
    pub fn build(self) -> Request {
        self.inner
    }
}

impl Extensible for Request {
    const KNOWN_KEYS: &'static [&'static str] = &[
        "url",
        "method",
        "headers",
        "params",
        "GET",
        "query_string",
        "POST",
        "body",
        "user_ip",
    ];

    fn known_value(&self, key: &str) -> Option<Value> {
        match key {
            "url" => self.url.as_deref().map(Value::from),
            "method" => self.method.as_deref().map(Value::from),
            "headers" => self.headers.as_ref().and_then(to_value),
            "params" => self.params.as_ref().and_then(to_value),
            "GET" => self.get.as_ref().and_then(to_value),
            "query_string" => self.query_string.as_deref().map(Value::from),
            "POST" => self.post.as_ref().and_then(to_value),
            "body" => self.body.as_deref().map(Value::from),
            "user_ip" => self.user_ip.map(|ip| Value::from(ip.to_string())),
            _ => None,
        }
    }

    fn members(&self) -> &Members {
        &self.members
    }
}

impl Sealed for Request {
    fn members_mut(&mut self) -> &mut Members {
        &mut self.members
    }
}

fn to_value<T: Serialize>(value: T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

impl Serialize for Request {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_extensible(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Request {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (mut known, members) = deserialize_extensible(deserializer, Self::KNOWN_KEYS)?;
        Ok(Request {
            url: known.take::<_, D::Error>("url")?,
            method: known.take::<_, D::Error>("method")?,
            headers: known.take::<_, D::Error>("headers")?,
            params: known.take::<_, D::Error>("params")?,
            get: known.take::<_, D::Error>("GET")?,
            query_string: known.take::<_, D::Error>("query_string")?,
            post: known.take::<_, D::Error>("POST")?,
            body: known.take::<_, D::Error>("body")?,
            user_ip: known.take::<_, D::Error>("user_ip")?,
            members,
        })
    }
}
