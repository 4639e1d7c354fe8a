/*
 * config_url.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Following `config_url` chains.
 */

//! `config_url` resolution.
//!
//! A document may name another document through its `config_url` key. The
//! resolver fetches that document, merges it on top of the current one, and
//! keeps going for as long as each fetched document names a further link:
//!
//! ```text
//! base (config_url: A) -> A (config_url: B) -> B (no config_url) -> done
//! ```
//!
//! A URL already visited in the same chain is an error, as is a chain longer
//! than the configured maximum depth. A fetched body without a recognized
//! header is not a configuration document; it ends the chain without being
//! merged.

use crate::error::{CollectorError, FetchError, Result};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::options::DEFAULT_MAX_CONFIG_URL_DEPTH;
use nodeconf_config::{Config, has_recognized_header};
use std::collections::HashSet;

/// Follows `config_url` links on behalf of a scan.
pub struct ConfigUrlResolver {
    fetcher: Option<Box<dyn Fetcher>>,
    max_depth: usize,
    no_logs: bool,
}

impl Default for ConfigUrlResolver {
    fn default() -> Self {
        Self {
            fetcher: None,
            max_depth: DEFAULT_MAX_CONFIG_URL_DEPTH,
            no_logs: false,
        }
    }
}

impl ConfigUrlResolver {
    /// Resolver using an HTTP fetcher, created on first use.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fetcher(fetcher: impl Fetcher + 'static) -> Self {
        Self {
            fetcher: Some(Box::new(fetcher)),
            ..Self::default()
        }
    }

    pub(crate) fn from_parts(
        fetcher: Option<Box<dyn Fetcher>>,
        max_depth: usize,
        no_logs: bool,
    ) -> Self {
        Self {
            fetcher,
            max_depth,
            no_logs,
        }
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn no_logs(mut self, no_logs: bool) -> Self {
        self.no_logs = no_logs;
        self
    }

    /// Resolve the chain starting at `current`'s own `config_url`.
    ///
    /// Each fetched document is merged with [`Config::merge_config`], so it
    /// overrides scalars already present, extends sequences and merges
    /// mappings. Any fetch, decode or merge failure aborts the resolution.
    pub fn resolve(&mut self, mut current: Config) -> Result<Config> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut next_url = current.config_url().map(str::to_string);

        while let Some(url) = next_url.take() {
            if visited.contains(&url) {
                return Err(CollectorError::ConfigUrlCycle { url });
            }
            if visited.len() >= self.max_depth {
                return Err(CollectorError::ConfigUrlDepth {
                    max_depth: self.max_depth,
                });
            }
            visited.insert(url.clone());

            tracing::debug!(url = %url, depth = visited.len(), "Fetching config_url");
            let body = self
                .fetch(&url)
                .map_err(|source| CollectorError::Fetch {
                    url: url.clone(),
                    source,
                })?;

            if !has_recognized_header(&body) {
                if !self.no_logs {
                    tracing::warn!(url = %url, "No valid header in remote config, ignoring it");
                }
                break;
            }

            let next = Config::parse_bytes(&body)
                .map_err(|source| CollectorError::RemoteDecode { url, source })?;
            next_url = next.config_url().map(str::to_string);
            current.merge_config(next)?;
        }

        Ok(current)
    }

    fn fetch(&mut self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let fetcher: Box<dyn Fetcher> = match self.fetcher.take() {
            Some(fetcher) => fetcher,
            None => Box::new(HttpFetcher::new()?),
        };
        self.fetcher.insert(fetcher).fetch(url)
    }
}

/// Resolve `config`'s `config_url` chain with `fetcher`.
pub fn resolve_config_url_chain(config: Config, fetcher: impl Fetcher + 'static) -> Result<Config> {
    ConfigUrlResolver::with_fetcher(fetcher).resolve(config)
}
