/*
 * source.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Gathering raw configuration blobs in merge order.
 */

use crate::cmdline::cmdline_document;
use crate::error::{CollectorError, Result};
use crate::options::ScanOptions;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where a raw source came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// The synthetic document built from the boot command line file.
    BootCmdline(PathBuf),
    /// A regular file found in a configured directory.
    File(PathBuf),
    /// The n-th explicit reader (0-based).
    Reader(usize),
    /// The literal override string.
    Overwrites,
}

impl SourceOrigin {
    /// Whether this source must carry a recognized header to take part in
    /// the merge. Only files picked up from directories are checked; every
    /// other source was handed to the collector explicitly.
    pub fn requires_header(&self) -> bool {
        matches!(self, SourceOrigin::File(_))
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOrigin::BootCmdline(path) => write!(f, "boot command line {}", path.display()),
            SourceOrigin::File(path) => write!(f, "{}", path.display()),
            SourceOrigin::Reader(index) => write!(f, "reader #{}", index),
            SourceOrigin::Overwrites => f.write_str("overwrites"),
        }
    }
}

/// One blob of bytes waiting to be filtered, checked and decoded.
#[derive(Debug, Clone)]
pub struct RawSource {
    pub origin: SourceOrigin,
    pub content: Vec<u8>,
}

impl RawSource {
    pub fn new(origin: SourceOrigin, content: impl Into<Vec<u8>>) -> Self {
        Self {
            origin,
            content: content.into(),
        }
    }
}

/// Build the ordered list of sources: boot command line, directory files,
/// readers, then the override string. Readers are drained.
pub fn collect_sources(options: &mut ScanOptions) -> Result<Vec<RawSource>> {
    let mut sources = Vec::new();

    if options.merge_boot_line {
        let path = options.boot_cmdline_file.clone();
        match std::fs::read_to_string(&path) {
            Ok(line) => sources.push(RawSource::new(
                SourceOrigin::BootCmdline(path),
                cmdline_document(&line),
            )),
            Err(err) => {
                if !options.no_logs {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "Cannot read boot command line, skipping"
                    );
                }
            }
        }
    }

    for dir in &options.directories {
        for path in directory_files(dir)? {
            let content = std::fs::read(&path).map_err(|source| CollectorError::ReadFile {
                path: path.clone(),
                source,
            })?;
            sources.push(RawSource::new(SourceOrigin::File(path), content));
        }
    }

    for (index, mut reader) in options.readers.drain(..).enumerate() {
        let origin = SourceOrigin::Reader(index);
        let mut content = Vec::new();
        if let Err(source) = reader.read_to_end(&mut content) {
            return Err(CollectorError::ReadSource { origin, source });
        }
        sources.push(RawSource::new(origin, content));
    }

    if let Some(overwrites) = &options.overwrites {
        sources.push(RawSource::new(
            SourceOrigin::Overwrites,
            overwrites.as_bytes(),
        ));
    }

    Ok(sources)
}

/// List the regular files below `dir`, recursively, sorted by file name at
/// each level. Symlinks are followed.
pub fn directory_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            CollectorError::Directory {
                path,
                source: err.into(),
            }
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_directory_files_are_sorted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.yaml"), "b: 1").unwrap();
        fs::write(temp.path().join("a.yaml"), "a: 1").unwrap();
        fs::write(temp.path().join("10.yaml"), "c: 1").unwrap();

        let names: Vec<_> = directory_files(temp.path())
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["10.yaml", "a.yaml", "b.yaml"]);
    }

    #[test]
    fn test_directory_files_recurse_and_skip_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("inner.yaml"), "x: 1").unwrap();
        fs::write(temp.path().join("z.yaml"), "z: 1").unwrap();

        let files = directory_files(temp.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("nested/inner.yaml"));
        assert!(files[1].ends_with("z.yaml"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let err = directory_files(&missing).unwrap_err();
        assert!(matches!(err, CollectorError::Directory { .. }));
    }

    #[test]
    fn test_collect_sources_order() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("conf");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("01.yaml"), "#cloud-config\na: 1").unwrap();
        let cmdline = temp.path().join("cmdline");
        fs::write(&cmdline, "foo=bar").unwrap();

        let mut options = ScanOptions::new()
            .merge_boot_line(true)
            .boot_cmdline_file(&cmdline)
            .directory(&dir)
            .reader(&b"r: 1"[..])
            .overwrites("o: 1");

        let sources = collect_sources(&mut options).unwrap();
        let origins: Vec<_> = sources.iter().map(|s| s.origin.clone()).collect();
        assert_eq!(
            origins,
            vec![
                SourceOrigin::BootCmdline(cmdline),
                SourceOrigin::File(dir.join("01.yaml")),
                SourceOrigin::Reader(0),
                SourceOrigin::Overwrites,
            ]
        );
        assert_eq!(sources[2].content, b"r: 1");
    }

    #[test]
    fn test_unreadable_cmdline_is_skipped() {
        let temp = TempDir::new().unwrap();
        let mut options = ScanOptions::new()
            .merge_boot_line(true)
            .boot_cmdline_file(temp.path().join("missing"))
            .no_logs(true);

        assert!(collect_sources(&mut options).unwrap().is_empty());
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(SourceOrigin::Reader(0).to_string(), "reader #0");
        assert_eq!(SourceOrigin::Overwrites.to_string(), "overwrites");
        assert!(SourceOrigin::File("a.yaml".into()).requires_header());
        assert!(!SourceOrigin::Overwrites.requires_header());
    }
}
