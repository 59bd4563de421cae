use crate::{
    config::{parse_endpoint, EnvConfig},
    models::{not_blank, DataBuilder, Item, Level},
    reporter::{
        default_data_supplier, default_level_policy, DataSupplierFn, FilterFn, LevelPolicyFn,
        TransformFn,
    },
    uploader::DEFAULT_ENDPOINT,
    Error, Reporter,
};
use std::{error::Error as StdError, fmt, sync::Arc};

/// Configures a [`Reporter`].
///
/// ```no_run
/// # #[cfg(feature = "reqwest-client")]
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use rollbar_reporter::{models::Level, ReporterBuilder};
///
/// let reporter = ReporterBuilder::new(reqwest::Client::new(), "POST_SERVER_ITEM_TOKEN", "production")
///     .with_filter(|item, _, _| item.data().level() >= Some(Level::Warning))
///     .build()?;
/// reporter.error("Something went wrong")?.await?;
/// # Ok(())
/// # }
/// ```
pub struct ReporterBuilder<C> {
    client: C,
    access_token: String,
    environment: String,
    endpoint: Option<String>,
    transform: Option<Arc<TransformFn>>,
    filter: Option<Arc<FilterFn>>,
    level_policy: Arc<LevelPolicyFn>,
    data_supplier: Arc<DataSupplierFn>,
}

impl<C> ReporterBuilder<C> {
    /// Create a builder that reports items with the given project access token into
    /// `environment`.
    pub fn new(
        client: C,
        access_token: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        ReporterBuilder {
            client,
            access_token: access_token.into(),
            environment: environment.into(),
            endpoint: None,
            transform: None,
            filter: None,
            level_policy: Arc::new(default_level_policy),
            data_supplier: Arc::new(default_data_supplier),
        }
    }

    /// Create a builder from the environment variables `ROLLBAR_ACCESS_TOKEN`,
    /// `ROLLBAR_ENVIRONMENT` and optionally `ROLLBAR_ENDPOINT`.
    pub fn from_env(client: C) -> Result<Self, Error> {
        let config = EnvConfig::from_env()?;
        let builder = ReporterBuilder::new(client, config.access_token, config.environment);
        Ok(match config.endpoint {
            Some(endpoint) => builder.with_endpoint(endpoint),
            None => builder,
        })
    }

    /// Send items somewhere other than the Rollbar API, e.g. a proxy.
    ///
    /// Default: `https://api.rollbar.com/api/1/item/`
    pub fn with_endpoint(self, endpoint: impl Into<String>) -> Self {
        ReporterBuilder {
            endpoint: Some(endpoint.into()),
            ..self
        }
    }

    /// Replace every item before it is filtered and sent.
    pub fn with_transform<F>(self, transform: F) -> Self
    where
        F: Fn(Item, Option<&(dyn StdError + 'static)>, Option<&str>) -> Item
            + Send
            + Sync
            + 'static,
    {
        ReporterBuilder {
            transform: Some(Arc::new(transform)),
            ..self
        }
    }

    /// Only send items for which `filter` returns `true`.
    pub fn with_filter<F>(self, filter: F) -> Self
    where
        F: Fn(&Item, Option<&(dyn StdError + 'static)>, Option<&str>) -> bool
            + Send
            + Sync
            + 'static,
    {
        ReporterBuilder {
            filter: Some(Arc::new(filter)),
            ..self
        }
    }

    /// Pick the level of items without an explicit one.
    ///
    /// Default: [`default_level_policy`](crate::default_level_policy)
    pub fn with_level_policy<F>(self, level_policy: F) -> Self
    where
        F: Fn(Option<&(dyn StdError + 'static)>) -> Level + Send + Sync + 'static,
    {
        ReporterBuilder {
            level_policy: Arc::new(level_policy),
            ..self
        }
    }

    /// Provide the fields every item starts from, e.g. server, person or code version.
    ///
    /// The supplier is called once per item. Default:
    /// [`default_data_supplier`](crate::default_data_supplier)
    pub fn with_data_supplier<F>(self, data_supplier: F) -> Self
    where
        F: Fn() -> DataBuilder + Send + Sync + 'static,
    {
        ReporterBuilder {
            data_supplier: Arc::new(data_supplier),
            ..self
        }
    }

    /// Validate the configuration and create the reporter.
    pub fn build(self) -> Result<Reporter<C>, Error> {
        not_blank(&self.access_token, "access_token")?;
        not_blank(&self.environment, "environment")?;
        let endpoint = parse_endpoint(self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;
        Ok(Reporter {
            client: Arc::new(self.client),
            endpoint,
            access_token: self.access_token,
            environment: self.environment,
            transform: self.transform,
            filter: self.filter,
            level_policy: self.level_policy,
            data_supplier: self.data_supplier,
        })
    }
}

impl<C: fmt::Debug> fmt::Debug for ReporterBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterBuilder")
            .field("client", &self.client)
            .field("environment", &self.environment)
            .field("endpoint", &self.endpoint)
            .field("transform", &self.transform.is_some())
            .field("filter", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}
