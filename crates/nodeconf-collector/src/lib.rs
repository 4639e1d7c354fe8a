/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Collection of cloud-config documents from every configured source.
 */

//! # nodeconf-collector
//!
//! Gathers provisioning documents and folds them into one [`Config`].
//!
//! ## Sources
//!
//! A scan reads, in this order:
//!
//! 1. the boot command line (`/proc/cmdline` unless configured otherwise),
//!    when [`ScanOptions::merge_boot_line`] is set
//! 2. every regular file in each configured directory, sorted by name
//! 3. each explicit reader, in the order given
//! 4. the literal override string
//!
//! Each source goes through the caller's key filter, then the header check
//! (directory files without a `#cloud-config`, `#kairos-config` or
//! `#node-config` header are skipped), then the decoder, and is merged on
//! top of everything before it.
//!
//! ## Remote documents
//!
//! Once all sources are merged, the `config_url` key is followed: the
//! document it points at is fetched and merged, and so on down the chain.
//! See [`ConfigUrlResolver`].
//!
//! ## Logging
//!
//! Events are emitted through `tracing`; installing a subscriber is left to
//! the application.

mod cmdline;
mod config_url;
mod error;
mod fetch;
mod filter;
mod options;
mod scan;
mod source;

pub use cmdline::{cmdline_document, parse_cmdline, tokenize};
pub use config_url::{ConfigUrlResolver, resolve_config_url_chain};
pub use error::{CollectorError, FetchError, Result};
pub use fetch::{Fetcher, HttpFetcher, MemoryFetcher};
pub use filter::{FilterError, allow_keys, passthrough};
pub use options::{DEFAULT_BOOT_CMDLINE_FILE, DEFAULT_MAX_CONFIG_URL_DEPTH, ScanOptions};
pub use scan::scan;
pub use source::{RawSource, SourceOrigin, collect_sources, directory_files};

pub use nodeconf_config::Config;
