// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::str::FromStr;

use reqwest::Url;

use crate::error::TransportError;

/// Where the management API is served.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub path: String,
}

impl Endpoint {
    pub fn new<S: Into<String>>(host: S, port: u16, tls: bool) -> Self {
        Self { host: host.into(), port, tls, path: "/".to_string() }
    }

    /// `https://<host>:443/`.
    pub fn https<S: Into<String>>(host: S) -> Self {
        Self::new(host, 443, true)
    }

    /// `http://<host>:80/`.
    pub fn http<S: Into<String>>(host: S) -> Self {
        Self::new(host, 80, false)
    }

    pub fn with_path<S: Into<String>>(mut self, path: S) -> Self {
        let path = path.into();
        self.path =
            if path.starts_with('/') { path } else { format!("/{path}") };
        self
    }

    pub fn scheme(&self) -> &'static str {
        if self.tls {
            "https"
        } else {
            "http"
        }
    }

    /// The same endpoint on another host. A master redirect keeps scheme,
    /// port and path and only swaps the host.
    ///
    /// The master address reported by the server may itself carry a port
    /// (`host:port`, or `[v6addr]:port`), which then wins.
    pub fn with_host(&self, master: &str) -> Self {
        let (host, port) = split_host_port(master);
        Self {
            host: host.to_string(),
            port: port.unwrap_or(self.port),
            tls: self.tls,
            path: self.path.clone(),
        }
    }

    pub fn url(&self) -> String {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!("{}://{}:{}{}", self.scheme(), host, self.port, self.path)
    }
}

fn split_host_port(addr: &str) -> (&str, Option<u16>) {
    if let Some(rest) = addr.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            let port = tail.strip_prefix(':').and_then(|p| p.parse().ok());
            return (host, port);
        }
    }
    match addr.rsplit_once(':') {
        // A bare IPv6 address has more than one colon and no port.
        Some((host, port)) if !host.contains(':') => match port.parse() {
            Ok(port) => (host, Some(port)),
            Err(_) => (addr, None),
        },
        _ => (addr, None),
    }
}

impl FromStr for Endpoint {
    type Err = TransportError;

    /// Parses `http(s)://host[:port][/path]`. Without an explicit port the
    /// scheme's default is used. Domain names are normalized to lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s).map_err(|e| {
            TransportError::InvalidEndpoint(format!("{s}: {e}"))
        })?;
        let tls = match url.scheme() {
            "https" => true,
            "http" => false,
            other => {
                return Err(TransportError::InvalidEndpoint(format!(
                    "{s}: unsupported scheme {other:?}"
                )))
            }
        };
        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host
                .strip_prefix('[')
                .and_then(|h| h.strip_suffix(']'))
                .unwrap_or(host)
                .to_string(),
            _ => {
                return Err(TransportError::InvalidEndpoint(format!(
                    "{s}: no host"
                )))
            }
        };
        let port = url.port_or_known_default().unwrap_or(if tls {
            443
        } else {
            80
        });
        Ok(Self { host, port, tls, path: url.path().to_string() })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_defaults() {
        // Host names are case-insensitive and come back lowercased.
        let ep: Endpoint = "https://hostA.example".parse().unwrap();
        assert_eq!(ep, Endpoint::https("hosta.example"));
        assert_eq!(ep.url(), "https://hosta.example:443/");

        let ep: Endpoint = "http://10.0.0.1:8080/xapi".parse().unwrap();
        assert_eq!(ep.host, "10.0.0.1");
        assert_eq!(ep.port, 8080);
        assert!(!ep.tls);
        assert_eq!(ep.path, "/xapi");

        let ep: Endpoint = "https://[fd00::1]:8443/".parse().unwrap();
        assert_eq!(ep.host, "fd00::1");
        assert_eq!(ep.url(), "https://[fd00::1]:8443/");
    }

    #[test]
    fn parse_rejects_other_schemes() {
        assert!(matches!(
            "ftp://host".parse::<Endpoint>(),
            Err(TransportError::InvalidEndpoint(_))
        ));
        assert!("not a url".parse::<Endpoint>().is_err());
    }

    #[test]
    fn redirect_keeps_scheme_port_and_path() {
        let ep = Endpoint::new("hostA.example", 8443, true).with_path("xapi");
        let moved = ep.with_host("hostB.example");
        assert_eq!(moved.url(), "https://hostB.example:8443/xapi");

        let moved = ep.with_host("10.0.0.2:9443");
        assert_eq!(moved.url(), "https://10.0.0.2:9443/xapi");

        let moved = ep.with_host("fd00::2");
        assert_eq!(moved.url(), "https://[fd00::2]:8443/xapi");

        let moved = ep.with_host("[fd00::3]:1");
        assert_eq!(moved.url(), "https://[fd00::3]:1/xapi");
    }
}
