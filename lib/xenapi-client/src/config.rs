// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration, either built in code ([`ClientOpts`]) or read from
//! a TOML file ([`Config`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_derive::{Deserialize, Serialize};
use slog::{o, Discard, Logger};
use thiserror::Error;

use crate::endpoint::Endpoint;
use crate::transport::TlsPolicy;

/// Everything needed to reach a pool's API.
#[derive(Clone, Debug)]
pub struct ClientOpts {
    pub endpoint: Endpoint,
    /// Deadline applied to each call unless the session overrides it.
    pub timeout: Option<Duration>,
    pub tls: TlsPolicy,
    pub log: Logger,
}

impl ClientOpts {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            timeout: None,
            tls: TlsPolicy::Strict,
            log: Logger::root(Discard, o!()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_tls(mut self, tls: TlsPolicy) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_log(mut self, log: Logger) -> Self {
        self.log = log;
        self
    }
}

/// On-disk client configuration.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Config {
    /// URL of the pool master, e.g. `https://pool.example:443/`.
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub tls: TlsConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<LoginConfig>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TlsMode {
    #[default]
    Strict,
    CustomRoots,
    Insecure,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct TlsConfig {
    #[serde(default)]
    pub mode: TlsMode,

    /// PEM files holding the trusted roots for `custom-roots`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ca_certs: Vec<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct LoginConfig {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originator: Option<String>,
}

/// Errors which may be returned when loading a configuration.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Cannot parse toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid url {0:?}: {1}")]
    Url(String, String),

    #[error("Cannot read CA certificate {path:?}: {reason}")]
    Certificate { path: PathBuf, reason: String },

    #[error("TLS mode custom-roots requires at least one entry in ca_certs")]
    NoRoots,
}

/// Parses a TOML file into a configuration object.
pub fn parse<P: AsRef<Path>>(path: P) -> Result<Config, ParseError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let cfg = toml::from_str::<Config>(&contents)?;
    Ok(cfg)
}

impl Config {
    pub fn endpoint(&self) -> Result<Endpoint, ParseError> {
        self.url
            .parse()
            .map_err(|e: crate::error::TransportError| {
                ParseError::Url(self.url.clone(), e.to_string())
            })
    }

    /// Resolves the file into options, loading any CA certificates it names.
    pub fn to_client_opts(&self) -> Result<ClientOpts, ParseError> {
        let tls = match self.tls.mode {
            TlsMode::Strict => TlsPolicy::Strict,
            TlsMode::Insecure => TlsPolicy::Insecure,
            TlsMode::CustomRoots => {
                if self.tls.ca_certs.is_empty() {
                    return Err(ParseError::NoRoots);
                }
                let mut roots = Vec::with_capacity(self.tls.ca_certs.len());
                for path in &self.tls.ca_certs {
                    let pem = std::fs::read(path).map_err(|e| {
                        ParseError::Certificate {
                            path: path.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    let cert = reqwest::Certificate::from_pem(&pem).map_err(
                        |e| ParseError::Certificate {
                            path: path.clone(),
                            reason: e.to_string(),
                        },
                    )?;
                    roots.push(cert);
                }
                TlsPolicy::CustomRoots(roots)
            }
        };
        let mut opts = ClientOpts::new(self.endpoint()?).with_tls(tls);
        if let Some(secs) = self.timeout_secs {
            opts = opts.with_timeout(Duration::from_secs(secs));
        }
        Ok(opts)
    }
}
