use crate::Error;
use http::Uri;
use std::env::VarError;

pub(crate) const ENV_ACCESS_TOKEN: &str = "ROLLBAR_ACCESS_TOKEN";
pub(crate) const ENV_ENVIRONMENT: &str = "ROLLBAR_ENVIRONMENT";
pub(crate) const ENV_ENDPOINT: &str = "ROLLBAR_ENDPOINT";

/// Reporter settings read from environment variables.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub(crate) access_token: String,
    pub(crate) environment: String,
    pub(crate) endpoint: Option<String>,
}

impl EnvConfig {
    pub(crate) fn from_env() -> Result<Self, Error> {
        EnvConfig::from_lookup(|key| std::env::var(key))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&'static str) -> Result<String, VarError>,
    {
        let required = |key| lookup(key).map_err(|err| Error::MissingEnvVar(key, err));
        let access_token = required(ENV_ACCESS_TOKEN)?;
        let environment = required(ENV_ENVIRONMENT)?;
        let endpoint = match lookup(ENV_ENDPOINT) {
            Ok(endpoint) => Some(endpoint).filter(|e| !e.trim().is_empty()),
            Err(VarError::NotPresent) => None,
            Err(err) => return Err(Error::MissingEnvVar(ENV_ENDPOINT, err)),
        };
        Ok(EnvConfig {
            access_token,
            environment,
            endpoint,
        })
    }
}

/// Parse an endpoint, which has to be an absolute URI. Surrounding whitespace is ignored.
pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Uri, Error> {
    let endpoint = endpoint.trim();
    let uri: Uri = endpoint
        .parse()
        .map_err(|err| Error::InvalidEndpoint(format!("{}: {}", endpoint, err)))?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(Error::InvalidEndpoint(format!(
            "{}: scheme and host are required",
            endpoint
        )));
    }
    Ok(uri)
}
