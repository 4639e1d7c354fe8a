/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Scan options.
 */

use crate::error::Result;
use crate::fetch::Fetcher;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Default location of the kernel command line.
pub const DEFAULT_BOOT_CMDLINE_FILE: &str = "/proc/cmdline";

/// Default bound on the number of `config_url` links followed.
pub const DEFAULT_MAX_CONFIG_URL_DEPTH: usize = 32;

/// Which sources a scan reads, and how.
///
/// Built once before calling [`crate::scan`]:
///
/// ```rust
/// use nodeconf_collector::ScanOptions;
///
/// let options = ScanOptions::new()
///     .directories(["/oem", "/usr/local/cloud-config"])
///     .overwrites("hostname: node-1")
///     .merge_boot_line(true);
/// assert_eq!(options.directory_paths().len(), 2);
/// ```
pub struct ScanOptions {
    pub(crate) directories: Vec<PathBuf>,
    pub(crate) readers: Vec<Box<dyn Read>>,
    pub(crate) overwrites: Option<String>,
    pub(crate) boot_cmdline_file: PathBuf,
    pub(crate) merge_boot_line: bool,
    pub(crate) no_logs: bool,
    pub(crate) fetcher: Option<Box<dyn Fetcher>>,
    pub(crate) max_config_url_depth: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            readers: Vec::new(),
            overwrites: None,
            boot_cmdline_file: PathBuf::from(DEFAULT_BOOT_CMDLINE_FILE),
            merge_boot_line: false,
            no_logs: false,
            fetcher: None,
            max_config_url_depth: DEFAULT_MAX_CONFIG_URL_DEPTH,
        }
    }
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory to scan. Directories are read in the order added.
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.push(dir.into());
        self
    }

    pub fn directories<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.directories.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Add an explicit document source. It is read to the end during the
    /// scan and must decode, header or not.
    pub fn reader(mut self, reader: impl Read + 'static) -> Self {
        self.readers.push(Box::new(reader));
        self
    }

    /// A literal document merged after every other source.
    pub fn overwrites(mut self, yaml: impl Into<String>) -> Self {
        self.overwrites = Some(yaml.into());
        self
    }

    pub fn boot_cmdline_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.boot_cmdline_file = path.into();
        self
    }

    /// Read the boot command line as the first source.
    pub fn merge_boot_line(mut self, enabled: bool) -> Self {
        self.merge_boot_line = enabled;
        self
    }

    /// Silence the warnings logged for skipped sources.
    pub fn no_logs(mut self, enabled: bool) -> Self {
        self.no_logs = enabled;
        self
    }

    /// Fetcher for `config_url` links. Without one, an HTTP fetcher is
    /// created the first time a link has to be followed.
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    pub fn max_config_url_depth(mut self, depth: usize) -> Self {
        self.max_config_url_depth = depth;
        self
    }

    /// Apply functional options in order, stopping at the first error.
    ///
    /// ```rust
    /// use nodeconf_collector::ScanOptions;
    ///
    /// let mut options = ScanOptions::new();
    /// options
    ///     .apply(|o| {
    ///         o.set_no_logs(true);
    ///         Ok(())
    ///     })
    ///     .unwrap();
    /// assert!(options.is_no_logs());
    /// ```
    pub fn apply<F>(&mut self, option: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut ScanOptions) -> Result<()>,
    {
        option(self)?;
        Ok(self)
    }

    pub fn set_no_logs(&mut self, enabled: bool) {
        self.no_logs = enabled;
    }

    pub fn set_merge_boot_line(&mut self, enabled: bool) {
        self.merge_boot_line = enabled;
    }

    pub fn directory_paths(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn boot_cmdline_path(&self) -> &Path {
        &self.boot_cmdline_file
    }

    pub fn is_merge_boot_line(&self) -> bool {
        self.merge_boot_line
    }

    pub fn is_no_logs(&self) -> bool {
        self.no_logs
    }
}

impl fmt::Debug for ScanOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanOptions")
            .field("directories", &self.directories)
            .field("readers", &self.readers.len())
            .field("overwrites", &self.overwrites)
            .field("boot_cmdline_file", &self.boot_cmdline_file)
            .field("merge_boot_line", &self.merge_boot_line)
            .field("no_logs", &self.no_logs)
            .field("fetcher", &self.fetcher.is_some())
            .field("max_config_url_depth", &self.max_config_url_depth)
            .finish()
    }
}
