//! Merges CLI flags over the config file into client settings.
//!
//! Precedence: command line > config file > built-in defaults.

use std::time::Duration;

use openload_core::{ClientConfig, Credentials};

use crate::app_config::FileConfig;
use crate::cli::Args;

/// Everything needed to build a client and authenticate calls.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedSettings {
    pub(crate) client: ClientConfig,
    pub(crate) credentials: Option<Credentials>,
}

pub(crate) fn resolve_settings(args: &Args, file: Option<&FileConfig>) -> ResolvedSettings {
    let mut client = ClientConfig::default();

    if let Some(base_url) = args
        .base_url
        .clone()
        .or_else(|| file.and_then(|cfg| cfg.base_url.clone()))
    {
        client.base_url = base_url;
    }

    if let Some(secs) = file.and_then(|cfg| cfg.connect_timeout_secs) {
        client.connect_timeout = Duration::from_secs(secs);
    }

    client.request_timeout = args
        .timeout
        .or_else(|| file.and_then(|cfg| cfg.request_timeout_secs))
        .map(Duration::from_secs);

    // login/key travel as a pair on both sides, so never mix sources.
    let credentials = Credentials::from_parts(args.login.clone(), args.key.clone()).or_else(|| {
        file.and_then(|cfg| Credentials::from_parts(cfg.login.clone(), cfg.key.clone()))
    });

    ResolvedSettings {
        client,
        credentials,
    }
}
