use crate::{
    convert::PLATFORM,
    models::{Body, Data, DataBuilder, Item, Level, Notifier},
    panic::is_fatal,
    uploader, Error, HttpClient,
};
use chrono::Utc;
use futures_util::future::{self, BoxFuture, FutureExt};
use http::Uri;
use serde_json::Value;
use std::{collections::BTreeMap, error::Error as StdError, fmt, sync::Arc};
use uuid::Uuid;

/// Outcome of reporting an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Rollbar accepted the item and assigned it this identifier.
    Success(Uuid),
    /// The filter rejected the item. Nothing was sent.
    Filtered,
}

impl Response {
    /// The identifier Rollbar assigned to the item, if it was sent.
    pub fn uuid(&self) -> Option<Uuid> {
        match self {
            Response::Success(uuid) => Some(*uuid),
            Response::Filtered => None,
        }
    }
}

/// Future resolving once Rollbar answered, or right away if the item was filtered.
pub type ResponseFuture = BoxFuture<'static, Result<Response, Error>>;

/// Replaces an item right before it is filtered and sent. Receives the error and description
/// the item was built from, if any.
pub type TransformFn =
    dyn Fn(Item, Option<&(dyn StdError + 'static)>, Option<&str>) -> Item + Send + Sync;

/// Decides whether an item is sent. Returning `false` drops it.
pub type FilterFn =
    dyn Fn(&Item, Option<&(dyn StdError + 'static)>, Option<&str>) -> bool + Send + Sync;

/// Picks the level of an item without an explicit one. Receives `None` for messages.
pub type LevelPolicyFn = dyn Fn(Option<&(dyn StdError + 'static)>) -> Level + Send + Sync;

/// Provides the fields every item starts from.
pub type DataSupplierFn = dyn Fn() -> DataBuilder + Send + Sync;

/// The default level policy: [`Level::Warning`] for messages, [`Level::Critical`] for fatal
/// errors and [`Level::Error`] for all other errors.
pub fn default_level_policy(error: Option<&(dyn StdError + 'static)>) -> Level {
    match error {
        None => Level::Warning,
        Some(error) if is_fatal(error) => Level::Critical,
        Some(_) => Level::Error,
    }
}

/// The default data supplier: platform, language and notifier.
pub fn default_data_supplier() -> DataBuilder {
    Data::builder()
        .platform(PLATFORM.as_str())
        .language("rust")
        .notifier(Notifier::default())
}

/// Something that happened and should be reported: an error, a message, or an error with a
/// description.
#[derive(Debug, Clone, Default)]
pub struct Occurrence<'a> {
    error: Option<&'a (dyn StdError + 'static)>,
    message: Option<String>,
    custom: BTreeMap<String, Value>,
    level: Option<Level>,
}

impl<'a> Occurrence<'a> {
    /// An error.
    pub fn from_error(error: &'a (dyn StdError + 'static)) -> Self {
        Occurrence {
            error: Some(error),
            ..Default::default()
        }
    }

    /// A message.
    pub fn from_message(message: impl Into<String>) -> Self {
        Occurrence {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Set the error. An existing message becomes its description.
    pub fn with_error(self, error: &'a (dyn StdError + 'static)) -> Self {
        Occurrence {
            error: Some(error),
            ..self
        }
    }

    /// Set the message, or the description if there is an error.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        Occurrence {
            message: Some(message.into()),
            ..self
        }
    }

    /// Add custom data. Overwrites default custom data with the same keys.
    pub fn with_custom(mut self, custom: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.custom.extend(custom);
        self
    }

    /// Override the level policy.
    pub fn with_level(self, level: Level) -> Self {
        Occurrence {
            level: Some(level),
            ..self
        }
    }

    /// The error.
    pub fn error(&self) -> Option<&'a (dyn StdError + 'static)> {
        self.error
    }

    /// The message, or description of the error.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Custom data.
    pub fn custom(&self) -> &BTreeMap<String, Value> {
        &self.custom
    }

    /// The explicit level.
    pub fn level(&self) -> Option<Level> {
        self.level
    }
}

/// Builds items and reports them to Rollbar.
///
/// Create one with a [`ReporterBuilder`](crate::ReporterBuilder). Cloning is cheap; clones
/// share the HTTP client.
pub struct Reporter<C> {
    pub(crate) client: Arc<C>,
    pub(crate) endpoint: Uri,
    pub(crate) access_token: String,
    pub(crate) environment: String,
    pub(crate) transform: Option<Arc<TransformFn>>,
    pub(crate) filter: Option<Arc<FilterFn>>,
    pub(crate) level_policy: Arc<LevelPolicyFn>,
    pub(crate) data_supplier: Arc<DataSupplierFn>,
}

impl<C> Clone for Reporter<C> {
    fn clone(&self) -> Self {
        Reporter {
            client: Arc::clone(&self.client),
            endpoint: self.endpoint.clone(),
            access_token: self.access_token.clone(),
            environment: self.environment.clone(),
            transform: self.transform.clone(),
            filter: self.filter.clone(),
            level_policy: Arc::clone(&self.level_policy),
            data_supplier: Arc::clone(&self.data_supplier),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for Reporter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("client", &self.client)
            .field("endpoint", &self.endpoint)
            .field("environment", &self.environment)
            .field("transform", &self.transform.is_some())
            .field("filter", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

impl<C> Reporter<C> {
    /// The endpoint items are sent to.
    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    /// The environment items are reported in.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Build an item from an occurrence.
    ///
    /// The data supplier provides the starting fields. Body, level, timestamp, and
    /// environment are always set here. For errors the custom data is merged into the
    /// record's custom data and the message becomes the description of the outermost error.
    /// For messages it is attached to the message body instead, and the record's custom data
    /// is left empty.
    pub fn build_item(&self, occurrence: &Occurrence<'_>) -> Result<Item, Error> {
        let level = occurrence
            .level
            .unwrap_or_else(|| (self.level_policy)(occurrence.error));
        let defaults = (self.data_supplier)();
        let builder = match (occurrence.error, occurrence.message.as_deref()) {
            (Some(error), description) => defaults
                .body(Body::from_error(error, description))
                .merge_custom(occurrence.custom.clone()),
            (None, Some(message)) => defaults
                .body(Body::from_message(message, occurrence.custom.clone())?)
                .custom(BTreeMap::new()),
            (None, None) => return Err(Error::MissingContent),
        };
        let data = builder
            .environment(self.environment.as_str())
            .level(level)
            .timestamp(Utc::now())
            .build()?;
        Item::new(self.access_token.as_str(), data)
    }
}

impl<C: HttpClient + 'static> Reporter<C> {
    /// Transform, filter and send an item.
    ///
    /// Transform and filter run before this returns. The returned future performs the
    /// request when polled.
    pub fn send(
        &self,
        item: Item,
        error: Option<&(dyn StdError + 'static)>,
        description: Option<&str>,
    ) -> ResponseFuture {
        let item = match &self.transform {
            Some(transform) => transform(item, error, description),
            None => item,
        };
        if let Some(filter) = &self.filter {
            if !filter(&item, error, description) {
                #[cfg(feature = "internal-logs")]
                tracing::debug!(name: "rollbar.filtered", "item rejected by filter, not sending it");
                return future::ready(Ok(Response::Filtered)).boxed();
            }
        }
        let payload = match uploader::serialize(&item) {
            Ok(payload) => payload,
            Err(err) => return future::ready(Err(err)).boxed(),
        };

        let client = Arc::clone(&self.client);
        let endpoint = self.endpoint.clone();
        async move {
            #[cfg(feature = "internal-logs")]
            tracing::debug!(name: "rollbar.send", endpoint = %endpoint, bytes = payload.len(), "sending item");
            let result = uploader::send(client.as_ref(), &endpoint, payload).await;
            #[cfg(feature = "internal-logs")]
            if let Err(err) = &result {
                tracing::warn!(name: "rollbar.send.failed", error = %err, "reporting item failed");
            }
            result
        }
        .boxed()
    }

    /// Build and send an item for the occurrence.
    pub fn report(&self, occurrence: Occurrence<'_>) -> Result<ResponseFuture, Error> {
        let item = self.build_item(&occurrence)?;
        Ok(self.send(item, occurrence.error, occurrence.message.as_deref()))
    }

    /// Report a message at the given level.
    pub fn log(&self, message: impl Into<String>, level: Level) -> Result<ResponseFuture, Error> {
        self.report(Occurrence::from_message(message).with_level(level))
    }

    /// Report a message at [`Level::Critical`].
    pub fn critical(&self, message: impl Into<String>) -> Result<ResponseFuture, Error> {
        self.log(message, Level::Critical)
    }

    /// Report a message at [`Level::Error`].
    pub fn error(&self, message: impl Into<String>) -> Result<ResponseFuture, Error> {
        self.log(message, Level::Error)
    }

    /// Report a message at [`Level::Warning`].
    pub fn warning(&self, message: impl Into<String>) -> Result<ResponseFuture, Error> {
        self.log(message, Level::Warning)
    }

    /// Report a message at [`Level::Info`].
    pub fn info(&self, message: impl Into<String>) -> Result<ResponseFuture, Error> {
        self.log(message, Level::Info)
    }

    /// Report a message at [`Level::Debug`].
    pub fn debug(&self, message: impl Into<String>) -> Result<ResponseFuture, Error> {
        self.log(message, Level::Debug)
    }

    /// Report an error, with the level picked by the level policy.
    pub fn log_error(
        &self,
        error: &(dyn StdError + 'static),
        description: Option<&str>,
    ) -> Result<ResponseFuture, Error> {
        let mut occurrence = Occurrence::from_error(error);
        occurrence.message = description.map(str::to_string);
        self.report(occurrence)
    }

    /// Send a prebuilt record with this reporter's access token.
    pub fn log_data(&self, data: Data) -> Result<ResponseFuture, Error> {
        let item = Item::new(self.access_token.as_str(), data)?;
        Ok(self.send(item, None, None))
    }
}
