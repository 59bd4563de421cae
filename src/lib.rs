//! Build error and message items and report them to [Rollbar].
//!
//! [Rollbar]: https://rollbar.com
//!
//! **Disclaimer**: This is not an official Rollbar product.
//!
//! # Usage
//!
//! Configure a reporter with an HTTP client, a project access token with the
//! `post_server_item` scope and the name of the environment:
//!
//! ```no_run
//! # #[cfg(feature = "reqwest-client")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let reporter = rollbar_reporter::ReporterBuilder::new(
//!     reqwest::Client::new(),
//!     "POST_SERVER_ITEM_TOKEN",
//!     "production",
//! )
//! .build()?;
//!
//! // Report a message.
//! let response = reporter.info("Deployment finished")?.await?;
//! println!("reported as {:?}", response.uuid());
//!
//! // Report an error, including its sources.
//! if let Err(err) = std::fs::read("missing.toml") {
//!     reporter.log_error(&err, Some("reading config"))?.await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or read the configuration from the environment variables `ROLLBAR_ACCESS_TOKEN`,
//! `ROLLBAR_ENVIRONMENT` and (optionally) `ROLLBAR_ENDPOINT`:
//!
//! ```no_run
//! # #[cfg(feature = "reqwest-client")]
//! # fn run() -> Result<(), rollbar_reporter::Error> {
//! let reporter = rollbar_reporter::ReporterBuilder::from_env(reqwest::Client::new())?.build()?;
//! # Ok(())
//! # }
//! ```
//!
//! Reporting never blocks. `report`, `log_error` and the message shortcuts build the item and
//! run the transform and filter right away. The returned [`ResponseFuture`] performs a single
//! HTTP request when awaited. There are no retries.
//!
//! # Items
//!
//! An [`Item`](models::Item) is built from an [`Occurrence`]:
//!
//! - Errors become a [`Trace`](models::Trace), or a [`TraceChain`](models::TraceChain) if the
//!   error has a [`source`](std::error::Error::source). The exception class is the type name
//!   at the start of the error's `Debug` output. With the `backtrace` feature, the call stack
//!   is captured when the item is built and attached to the outermost error.
//! - Messages become a [`Message`](models::Message). Custom data is attached to the message,
//!   and the record-level custom data from the data supplier is dropped.
//!
//! The starting fields of every item come from the data supplier (see
//! [`ReporterBuilder::with_data_supplier`]). The level comes from the occurrence or the level
//! policy:
//!
//! | Occurrence                 | Default level |
//! | -------------------------- | ------------- |
//! | message                    | `warning`     |
//! | [`PanicError`]             | `critical`    |
//! | any other error            | `error`       |
//!
//! # Panics
//!
//! Turn panics into errors with [`PanicError`] to report them from a panic hook or after
//! [`catch_unwind`](std::panic::catch_unwind).
//!
//! # HTTP clients
//!
//! Items are sent through an [`HttpClient`]. Implementations for [`reqwest::Client`] are
//! available with one of these features:
//!
//! - `reqwest-client`: uses native TLS
//! - `reqwest-client-vendored-tls`: uses native TLS, vendored
//! - `reqwest-client-rustls`: uses rustls
//!
//! [`reqwest::Client`]: https://docs.rs/reqwest/latest/reqwest/struct.Client.html
//!
//! # Logging
//!
//! With the `internal-logs` feature (on by default) this crate emits [`tracing`] events when it
//! sends, filters or fails to report an item.
//!
//! [`tracing`]: https://docs.rs/tracing
#![doc(html_root_url = "https://docs.rs/rollbar-reporter/0.1.0")]
#![deny(missing_docs, unreachable_pub, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(test, deny(warnings))]

mod config;
mod convert;
mod error;
mod http_client;
pub mod models;
mod panic;
mod pipeline;
mod reporter;
mod uploader;

pub use error::Error;
pub use http_client::{HttpClient, HttpError};
pub use panic::{is_fatal, PanicError};
pub use pipeline::ReporterBuilder;
pub use reporter::{
    default_data_supplier, default_level_policy, DataSupplierFn, FilterFn, LevelPolicyFn,
    Occurrence, Reporter, Response, ResponseFuture, TransformFn,
};
pub use uploader::DEFAULT_ENDPOINT;
