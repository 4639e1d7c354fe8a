/*
 * fetch.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Retrieval of remote documents referenced by `config_url`.
 */

use crate::error::FetchError;
use std::collections::HashMap;

/// Source of remote documents.
///
/// The collector issues one `fetch` per `config_url` link, in order, and
/// blocks on each. Timeouts, retries and TLS policy belong to the
/// implementation.
pub trait Fetcher {
    /// Return the body found at `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

/// Plain HTTP GET through a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default client.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured client, e.g. one with a timeout or a proxy.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

/// Serves documents from memory. Useful for tests and for callers that
/// already hold the remote documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    documents: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `content` under `url`, replacing any previous document.
    pub fn insert(&mut self, url: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.documents.insert(url.into(), content.into());
    }

    pub fn with(mut self, url: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(url, content);
        self
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Unavailable {
                url: url.to_string(),
            })
    }
}
