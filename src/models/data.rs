use crate::{
    models::{
        max_length, max_length_opt, not_blank, required, Body, Level, Notifier, Person, Request,
        Server,
    },
    panic::is_fatal,
    Error,
};
use chrono::{serde::ts_seconds_option, DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, error::Error as StdError};
use uuid::Uuid;

/// The detail record of an item: what happened, where and to whom.
///
/// Create one with [`Data::builder`] or one of the convenience factories. Once built, a record
/// is never modified; the `with_*` methods return changed copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DataBuilder")]
pub struct Data {
    environment: String,
    body: Body,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<Level>,
    #[serde(with = "ts_seconds_option", skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    framework: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request: Option<Request>,
    #[serde(skip_serializing_if = "Option::is_none")]
    person: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    server: Option<Server>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    custom: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notifier: Option<Notifier>,
}

impl Data {
    /// Start building a record.
    pub fn builder() -> DataBuilder {
        DataBuilder::default()
    }

    /// Describe an error.
    ///
    /// The level is [`Level::Critical`] for fatal errors (see [`is_fatal`](crate::is_fatal))
    /// and [`Level::Error`] otherwise. `custom` is attached to the record.
    pub fn from_error(
        environment: impl Into<String>,
        error: &(dyn StdError + 'static),
        custom: BTreeMap<String, Value>,
    ) -> Result<Self, Error> {
        let level = if is_fatal(error) {
            Level::Critical
        } else {
            Level::Error
        };
        Data::builder()
            .environment(environment)
            .body(Body::from_error(error, None))
            .level(level)
            .timestamp(Utc::now())
            .custom(custom)
            .build()
    }

    /// Describe a message at [`Level::Warning`]. `custom` is attached to the message.
    pub fn from_message(
        environment: impl Into<String>,
        message: impl Into<String>,
        custom: BTreeMap<String, Value>,
    ) -> Result<Self, Error> {
        Data::builder()
            .environment(environment)
            .body(Body::from_message(message, custom)?)
            .level(Level::Warning)
            .timestamp(Utc::now())
            .build()
    }

    /// Reopen this record in a builder.
    pub fn to_builder(&self) -> DataBuilder {
        DataBuilder {
            environment: Some(self.environment.clone()),
            body: Some(self.body.clone()),
            level: self.level,
            timestamp: self.timestamp,
            code_version: self.code_version.clone(),
            platform: self.platform.clone(),
            language: self.language.clone(),
            framework: self.framework.clone(),
            context: self.context.clone(),
            request: self.request.clone(),
            person: self.person.clone(),
            server: self.server.clone(),
            custom: self.custom.clone(),
            fingerprint: self.fingerprint.clone(),
            title: self.title.clone(),
            uuid: self.uuid.clone(),
            notifier: self.notifier.clone(),
        }
    }

    /// The name of the environment in which the item occurred, e.g. `production`.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// The main content of the item.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Severity of the item.
    pub fn level(&self) -> Option<Level> {
        self.level
    }

    /// When the item occurred.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Version of the application code.
    pub fn code_version(&self) -> Option<&str> {
        self.code_version.as_deref()
    }

    /// Platform the application runs on.
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Programming language of the application.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Framework the application uses.
    pub fn framework(&self) -> Option<&str> {
        self.framework.as_deref()
    }

    /// Identifier of the application state at the time of the item, e.g. a route.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// The HTTP request being handled.
    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    /// The affected user.
    pub fn person(&self) -> Option<&Person> {
        self.person.as_ref()
    }

    /// The server the application runs on.
    pub fn server(&self) -> Option<&Server> {
        self.server.as_ref()
    }

    /// Arbitrary additional data.
    pub fn custom(&self) -> &BTreeMap<String, Value> {
        &self.custom
    }

    /// Overrides the grouping of items.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Overrides the title of the item.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Client supplied identifier of the item.
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// The library that reported the item.
    pub fn notifier(&self) -> Option<&Notifier> {
        self.notifier.as_ref()
    }

    /// Copy in a different environment.
    pub fn with_environment(self, environment: impl Into<String>) -> Result<Self, Error> {
        let environment = environment.into();
        validate_environment(&environment)?;
        Ok(Data {
            environment,
            ..self
        })
    }

    /// Copy with a different body.
    pub fn with_body(self, body: Body) -> Self {
        Data { body, ..self }
    }

    /// Copy with a different level.
    pub fn with_level(self, level: Level) -> Self {
        Data {
            level: Some(level),
            ..self
        }
    }

    /// Copy with a different timestamp.
    pub fn with_timestamp(self, timestamp: DateTime<Utc>) -> Self {
        Data {
            timestamp: Some(timestamp),
            ..self
        }
    }

    /// Copy with different request details.
    pub fn with_request(self, request: Request) -> Self {
        Data {
            request: Some(request),
            ..self
        }
    }

    /// Copy with a different affected user.
    pub fn with_person(self, person: Person) -> Self {
        Data {
            person: Some(person),
            ..self
        }
    }

    /// Copy with different server details.
    pub fn with_server(self, server: Server) -> Self {
        Data {
            server: Some(server),
            ..self
        }
    }

    /// Copy with the custom data replaced.
    pub fn with_custom(self, custom: BTreeMap<String, Value>) -> Self {
        Data { custom, ..self }
    }

    /// Copy with a different title. At most 255 characters.
    pub fn with_title(self, title: impl Into<String>) -> Result<Self, Error> {
        let title = title.into();
        max_length(&title, 255, "title")?;
        Ok(Data {
            title: Some(title),
            ..self
        })
    }

    /// Copy with a different client supplied identifier. At most 32 characters.
    pub fn with_uuid(self, uuid: impl Into<String>) -> Result<Self, Error> {
        let uuid = uuid.into();
        max_length(&uuid, 32, "uuid")?;
        Ok(Data {
            uuid: Some(uuid),
            ..self
        })
    }

    /// Copy with a different notifier.
    pub fn with_notifier(self, notifier: Notifier) -> Self {
        Data {
            notifier: Some(notifier),
            ..self
        }
    }
}

fn validate_environment(environment: &str) -> Result<(), Error> {
    not_blank(environment, "environment")?;
    max_length(environment, 255, "environment")
}

/// Accumulates the fields of a [`Data`] record.
///
/// Nothing is validated until [`build`](DataBuilder::build) is called.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataBuilder {
    environment: Option<String>,
    body: Option<Body>,
    level: Option<Level>,
    #[serde(default, with = "ts_seconds_option")]
    timestamp: Option<DateTime<Utc>>,
    code_version: Option<String>,
    platform: Option<String>,
    language: Option<String>,
    framework: Option<String>,
    context: Option<String>,
    request: Option<Request>,
    person: Option<Person>,
    server: Option<Server>,
    #[serde(default)]
    custom: BTreeMap<String, Value>,
    fingerprint: Option<String>,
    title: Option<String>,
    uuid: Option<String>,
    notifier: Option<Notifier>,
}

impl DataBuilder {
    /// Set the environment. Required, must not be blank.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Set the body. Required.
    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the point in time the item occurred.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the version of the application code.
    pub fn code_version(mut self, code_version: impl Into<String>) -> Self {
        self.code_version = Some(code_version.into());
        self
    }

    /// Set the platform.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the programming language.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the framework.
    pub fn framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    /// Set the context, e.g. the route being handled.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the HTTP request being handled.
    pub fn request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    /// Set the affected user.
    pub fn person(mut self, person: Person) -> Self {
        self.person = Some(person);
        self
    }

    /// Set the server.
    pub fn server(mut self, server: Server) -> Self {
        self.server = Some(server);
        self
    }

    /// Replace the custom data.
    pub fn custom(mut self, custom: BTreeMap<String, Value>) -> Self {
        self.custom = custom;
        self
    }

    /// Merge entries into the custom data. Later entries overwrite earlier ones with the same
    /// key.
    pub fn merge_custom(mut self, custom: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.custom.extend(custom);
        self
    }

    /// Set the fingerprint used to group items.
    pub fn fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Set the title. At most 255 characters.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the client supplied identifier. At most 32 characters.
    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    /// Set the client supplied identifier from a [`Uuid`], in its 32 character form.
    pub fn client_uuid(self, uuid: Uuid) -> Self {
        self.uuid(uuid.simple().to_string())
    }

    /// Set the notifier.
    pub fn notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Validate the accumulated fields and produce the record.
    pub fn build(self) -> Result<Data, Error> {
        let environment = required(self.environment, "environment")?;
        validate_environment(&environment)?;
        let body = required(self.body, "body")?;
        max_length_opt(self.title.as_deref(), 255, "title")?;
        max_length_opt(self.uuid.as_deref(), 32, "uuid")?;
        Ok(Data {
            environment,
            body,
            level: self.level,
            timestamp: self.timestamp,
            code_version: self.code_version,
            platform: self.platform,
            language: self.language,
            framework: self.framework,
            context: self.context,
            request: self.request,
            person: self.person,
            server: self.server,
            custom: self.custom,
            fingerprint: self.fingerprint,
            title: self.title,
            uuid: self.uuid,
            notifier: self.notifier,
        })
    }
}

impl TryFrom<DataBuilder> for Data {
    type Error = Error;

    fn try_from(builder: DataBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{ExceptionInfo, Extensible, Frame, Trace, TraceChain},
        PanicError,
    };
    use chrono::TimeZone;
    use serde_json::json;
    use test_case::test_case;

    fn message_body() -> Body {
        Body::from_message("hello", Vec::new()).unwrap()
    }

    #[test_case(Data::builder().body(message_body()), "environment" ; "missing environment")]
    #[test_case(Data::builder().environment("  ").body(message_body()), "environment" ; "blank environment")]
    #[test_case(Data::builder().environment("e".repeat(256)).body(message_body()), "environment" ; "long environment")]
    #[test_case(Data::builder().environment("production"), "body" ; "missing body")]
    #[test_case(Data::builder().environment("production").body(message_body()).title("t".repeat(256)), "title" ; "long title")]
    #[test_case(Data::builder().environment("production").body(message_body()).uuid("0".repeat(33)), "uuid" ; "long uuid")]
    fn build_validates(builder: DataBuilder, expected_field: &str) {
        match builder.build() {
            Err(Error::Validation { field, .. }) => assert_eq!(expected_field, field),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn client_uuid_fits() {
        let uuid = Uuid::parse_str("66e675f0-b37f-4a45-ae96-96359aa13700").unwrap();
        let data = Data::builder()
            .environment("production")
            .body(message_body())
            .client_uuid(uuid)
            .build()
            .unwrap();
        assert_eq!(Some("66e675f0b37f4a45ae9696359aa13700"), data.uuid());
    }

    #[test]
    fn from_message_attaches_custom_to_message() {
        let custom = BTreeMap::from([("HELLO".to_string(), json!("WORLD"))]);
        let data = Data::from_message("production", "Send a message", custom).unwrap();
        assert_eq!(Some(Level::Warning), data.level());
        assert!(data.custom().is_empty());
        let message = data.body().message().unwrap();
        assert_eq!(Some(json!("WORLD")), message.get("HELLO"));
    }

    #[test]
    fn from_message_with_reserved_key_fails() {
        let custom = BTreeMap::from([("body".to_string(), json!("sneaky"))]);
        match Data::from_message("production", "Send a message", custom) {
            Err(Error::ReservedKey(key)) => assert_eq!("body", key),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn from_error_picks_level() {
        #[derive(Debug, thiserror::Error)]
        #[error("recoverable")]
        struct Recoverable;

        let data = Data::from_error("production", &Recoverable, BTreeMap::new()).unwrap();
        assert_eq!(Some(Level::Error), data.level());

        let panic = PanicError::from_payload(&"boom");
        let data = Data::from_error("production", &panic, BTreeMap::new()).unwrap();
        assert_eq!(Some(Level::Critical), data.level());
    }

    #[test]
    fn with_functions_leave_original_untouched() {
        let data = Data::from_message("production", "hi", BTreeMap::new()).unwrap();
        let copy = data.clone().with_level(Level::Info).with_title("A title").unwrap();
        assert_eq!(Some(Level::Warning), data.level());
        assert_eq!(None, data.title());
        assert_eq!(Some(Level::Info), copy.level());
        assert_eq!(Some("A title"), copy.title());
        data.clone().with_environment("").unwrap_err();
    }

    #[test]
    fn serialization_format() {
        let data = Data::builder()
            .environment("production")
            .body(message_body())
            .level(Level::Info)
            .timestamp(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
            .code_version("3da541559918a808c2402bba5012f6c60b27661c")
            .language("rust")
            .merge_custom([("b".to_string(), json!(2)), ("a".to_string(), json!(1))])
            .notifier(Notifier::new("my-notifier", Some("1.0.0".into())))
            .build()
            .unwrap();
        assert_eq!(
            concat!(
                r#"{"environment":"production","body":{"message":{"body":"hello"}},"level":"info","#,
                r#""timestamp":1704164645,"code_version":"3da541559918a808c2402bba5012f6c60b27661c","#,
                r#""language":"rust","custom":{"a":1,"b":2},"#,
                r#""notifier":{"name":"my-notifier","version":"1.0.0"}}"#
            ),
            serde_json::to_string(&data).unwrap()
        );

        let parsed: Data = serde_json::from_str(&serde_json::to_string(&data).unwrap()).unwrap();
        assert_eq!(data, parsed);
    }

    #[test]
    fn fully_populated_record_round_trips() {
        let request = Request::builder()
            .url("https://example.com/orders?id=7")
            .method("GET")
            .headers(BTreeMap::from([("Accept".to_string(), "text/html".to_string())]))
            .get_params(BTreeMap::from([("id".to_string(), "7".to_string())]))
            .query_string("id=7")
            .user_ip("10.0.0.1".parse().unwrap())
            .build()
            .put("trace_id", "abc123")
            .unwrap();
        let person = Person::with_details(
            "42",
            Some("marry".to_string()),
            Some("marry@example.com".to_string()),
        )
        .unwrap();
        let server = Server::builder()
            .host("web-1")
            .root("/srv/app")
            .branch("main")
            .code_version("v1")
            .build();
        let frame = Frame::new("src/orders.rs")
            .unwrap()
            .with_method("orders::load")
            .with_line_number(17)
            .with_column_number(9);
        let chain = TraceChain::new(vec![
            Trace::new(
                vec![frame],
                ExceptionInfo::with_details(
                    "IllegalState",
                    Some("Nested Tricky!".to_string()),
                    Some("while loading".to_string()),
                )
                .unwrap(),
            ),
            Trace::new(
                Vec::new(),
                ExceptionInfo::with_details("Tricky", Some("TRICKY!".to_string()), None).unwrap(),
            ),
        ])
        .unwrap();
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let custom = BTreeMap::from([("shard".to_string(), json!(2))]);

        let data = Data::builder()
            .environment("production")
            .body(Body::TraceChain(chain.clone()))
            .level(Level::Critical)
            .timestamp(timestamp)
            .code_version("3da541559918a808c2402bba5012f6c60b27661c")
            .platform("linux-x86_64")
            .language("rust")
            .framework("axum")
            .context("orders#load")
            .request(request.clone())
            .person(person.clone())
            .server(server.clone())
            .custom(custom.clone())
            .fingerprint("orders-load")
            .title("Loading orders failed")
            .uuid("66e675f0b37f4a45ae9696359aa13700")
            .notifier(Notifier::new("my-notifier", Some("1.0.0".into())))
            .build()
            .unwrap();

        assert_eq!("production", data.environment());
        assert_eq!(Some(&chain), data.body().trace_chain());
        assert_eq!(Some(Level::Critical), data.level());
        assert_eq!(Some(timestamp), data.timestamp());
        assert_eq!(
            Some("3da541559918a808c2402bba5012f6c60b27661c"),
            data.code_version()
        );
        assert_eq!(Some("linux-x86_64"), data.platform());
        assert_eq!(Some("rust"), data.language());
        assert_eq!(Some("axum"), data.framework());
        assert_eq!(Some("orders#load"), data.context());
        assert_eq!(Some(&request), data.request());
        assert_eq!(Some(json!("abc123")), data.request().unwrap().get("trace_id"));
        assert_eq!(Some(&person), data.person());
        assert_eq!(Some("marry@example.com"), data.person().unwrap().email());
        assert_eq!(Some(&server), data.server());
        assert_eq!(&custom, data.custom());
        assert_eq!(Some("orders-load"), data.fingerprint());
        assert_eq!(Some("Loading orders failed"), data.title());
        assert_eq!(Some("66e675f0b37f4a45ae9696359aa13700"), data.uuid());
        assert_eq!(Some("my-notifier"), data.notifier().map(Notifier::name));

        let json = serde_json::to_string(&data).unwrap();
        let parsed: Data = serde_json::from_str(&json).unwrap();
        assert_eq!(data, parsed);
    }

    #[test]
    fn deserialize_validates() {
        serde_json::from_value::<Data>(json!({"environment": "production"})).unwrap_err();
        serde_json::from_value::<Data>(json!({
            "environment": "",
            "body": {"message": {"body": "hi"}},
        }))
        .unwrap_err();
    }

    #[test]
    fn to_builder_round_trips() {
        let data = Data::from_message("production", "hi", BTreeMap::new()).unwrap();
        let rebuilt = data.to_builder().framework("axum").build().unwrap();
        assert_eq!(Some("axum"), rebuilt.framework());
        assert_eq!(data.timestamp(), rebuilt.timestamp());
        assert_eq!(data.body(), rebuilt.body());
    }
}
