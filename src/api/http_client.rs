//! HTTP client construction policy for the API client.
//!
//! Applies the connect timeout, User-Agent and compression defaults, and
//! survives environments where querying system proxy settings panics.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use tracing::warn;

use super::BuildError;

/// Builds the `reqwest::Client` used when the caller does not inject one.
///
/// # Errors
///
/// Returns [`BuildError::HttpClient`] when client construction fails.
pub(crate) fn build_api_http_client(
    user_agent: &str,
    connect_timeout: Duration,
) -> Result<Client, BuildError> {
    match try_build_client(user_agent, connect_timeout, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed macOS environments panic when reading system
            // proxy settings; retry with env-proxy lookup only.
            warn!("API client hit system proxy panic; using env-proxy fallback builder");
            match try_build_client(user_agent, connect_timeout, true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Panic) => Err(BuildError::HttpClient {
                    reason: "client construction panicked while reading proxy settings"
                        .to_string(),
                }),
                Err(BuildClientFailure::Build(error)) => Err(BuildError::HttpClient {
                    reason: error.to_string(),
                }),
            }
        }
        Err(BuildClientFailure::Build(error)) => Err(BuildError::HttpClient {
            reason: error.to_string(),
        }),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(
    user_agent: &str,
    connect_timeout: Duration,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    let user_agent = user_agent.to_string();
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder(user_agent, connect_timeout);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder(user_agent: String, connect_timeout: Duration) -> ClientBuilder {
    Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(user_agent)
        .gzip(true)
}

fn apply_env_proxy_fallback(builder: ClientBuilder) -> ClientBuilder {
    apply_proxy_fallback(builder, |name| std::env::var(name).ok())
}

fn apply_proxy_fallback<F>(mut builder: ClientBuilder, lookup: F) -> ClientBuilder
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(proxy) = proxy_for_scheme("https", &lookup)
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = proxy_for_scheme("http", &lookup)
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn proxy_for_scheme<F>(scheme: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let names: &[&str] = match scheme {
        "https" => &["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"],
        "http" => &["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"],
        _ => return None,
    };
    names.iter().find_map(|name| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
