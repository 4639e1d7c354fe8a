/*
 * scan.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The scan entry point: collect, filter, check, decode, merge, resolve.
 */

use crate::config_url::ConfigUrlResolver;
use crate::error::{CollectorError, Result};
use crate::filter::FilterError;
use crate::options::ScanOptions;
use crate::source::{RawSource, collect_sources};
use nodeconf_config::{Config, ConfigError, has_recognized_header};

/// Collect every configured source and fold it into one [`Config`].
///
/// Sources are merged in order (boot command line, directory files,
/// readers, overwrites), each one overriding the ones before it. The
/// merged document's `config_url` chain is then resolved once.
///
/// `filter` sees each raw source before anything else happens to it; use
/// [`crate::passthrough`] to keep everything.
///
/// ```rust
/// use nodeconf_collector::{ScanOptions, passthrough, scan};
///
/// let options = ScanOptions::new()
///     .reader(&b"name: Mario"[..])
///     .overwrites("surname: Bros");
/// let config = scan(options, passthrough).unwrap();
/// assert_eq!(config.to_string(), "#cloud-config\n\nname: Mario\nsurname: Bros\n");
/// ```
pub fn scan<F>(mut options: ScanOptions, filter: F) -> Result<Config>
where
    F: Fn(&[u8]) -> std::result::Result<Vec<u8>, FilterError>,
{
    let sources = collect_sources(&mut options)?;

    let mut config = Config::new();
    for source in &sources {
        if let Some(next) = load_source(source, &filter, options.no_logs)? {
            config.merge_config(next)?;
        }
    }

    let mut resolver = ConfigUrlResolver::from_parts(
        options.fetcher.take(),
        options.max_config_url_depth,
        options.no_logs,
    );
    resolver.resolve(config)
}

/// Run one source through the filter, the header check and the decoder.
/// `None` means the source is not a configuration document and is skipped.
fn load_source<F>(source: &RawSource, filter: &F, no_logs: bool) -> Result<Option<Config>>
where
    F: Fn(&[u8]) -> std::result::Result<Vec<u8>, FilterError>,
{
    let origin = &source.origin;
    let content = filter(&source.content).map_err(|err| CollectorError::Filter {
        origin: origin.clone(),
        message: err.to_string(),
    })?;

    if origin.requires_header() && !has_recognized_header(&content) {
        if !no_logs {
            tracing::debug!(origin = %origin, "No valid header, skipping");
        }
        return Ok(None);
    }

    match Config::parse_bytes(&content) {
        Ok(config) => {
            tracing::debug!(origin = %origin, keys = config.len(), "Merging source");
            Ok(Some(config))
        }
        Err(ConfigError::NotAMapping { kind }) => {
            if !no_logs {
                tracing::warn!(origin = %origin, kind = %kind, "Document is not a mapping, skipping");
            }
            Ok(None)
        }
        Err(err) => Err(CollectorError::Decode {
            origin: origin.clone(),
            source: err,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use crate::filter::{allow_keys, passthrough};
    use crate::source::SourceOrigin;
    use nodeconf_config::Value;

    #[test]
    fn test_readers_yaml_and_json() {
        let options = ScanOptions::new()
            .reader(&br#"{"mario":"bros"}"#[..])
            .reader(&b"luigi: bros"[..])
            .reader(std::io::Cursor::new(r#"{"princess":"peach"}"#));
        let config = scan(options, passthrough).unwrap();
        assert_eq!(config.get("mario"), Some(&Value::from("bros")));
        assert_eq!(config.get("luigi"), Some(&Value::from("bros")));
        assert_eq!(config.get("princess"), Some(&Value::from("peach")));
    }

    #[test]
    fn test_non_mapping_readers_are_skipped() {
        let options = ScanOptions::new()
            .reader(&b"blip"[..])
            .reader(&b"blop"[..])
            .no_logs(true);
        let config = scan(options, passthrough).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_invalid_reader_is_fatal() {
        let options = ScanOptions::new().reader(&b"key: [unclosed"[..]);
        let err = scan(options, passthrough).unwrap_err();
        assert!(matches!(
            err,
            CollectorError::Decode {
                origin: SourceOrigin::Reader(0),
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_overwrites_is_fatal() {
        let options = ScanOptions::new().overwrites("a: {b");
        let err = scan(options, passthrough).unwrap_err();
        assert!(matches!(
            err,
            CollectorError::Decode {
                origin: SourceOrigin::Overwrites,
                ..
            }
        ));
    }

    #[test]
    fn test_overwrites_win() {
        let options = ScanOptions::new()
            .reader(&b"name: Mario\nlist: [a]"[..])
            .overwrites("name: Luigi\nlist: [b]");
        let config = scan(options, passthrough).unwrap();
        assert_eq!(config.get("name"), Some(&Value::from("Luigi")));
        assert_eq!(config.query("list").unwrap(), "- a\n- b\n");
    }

    #[test]
    fn test_filter_error_is_fatal() {
        let options = ScanOptions::new().reader(&b"a: 1"[..]);
        let err = scan(options, |_: &[u8]| -> std::result::Result<Vec<u8>, FilterError> {
            Err("rejected".into())
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "filtering reader #0 failed: rejected");
    }

    #[test]
    fn test_filter_runs_before_decode() {
        let options = ScanOptions::new().reader(&b"keep: 1\ndrop: 2"[..]);
        let config = scan(options, allow_keys(&["keep"])).unwrap();
        assert!(config.contains_key("keep"));
        assert!(!config.contains_key("drop"));
    }

    #[test]
    fn test_merge_conflict_aborts_scan() {
        let options = ScanOptions::new()
            .reader(&b"users: [a]"[..])
            .reader(&b"users: {a: 1}"[..]);
        let err = scan(options, passthrough).unwrap_err();
        assert!(matches!(err, CollectorError::Merge(ConfigError::KindMismatch { .. })));
    }

    #[test]
    fn test_config_url_from_merged_sources() {
        let fetcher = MemoryFetcher::new().with(
            "http://server/remote.yaml",
            "#cloud-config\nremote_key: remote_value\nname: Luigi\n",
        );
        let options = ScanOptions::new()
            .reader(&b"config_url: http://server/remote.yaml\nname: Mario"[..])
            .fetcher(fetcher);
        let config = scan(options, passthrough).unwrap();
        assert_eq!(config.get("remote_key"), Some(&Value::from("remote_value")));
        assert_eq!(config.get("name"), Some(&Value::from("Luigi")));
    }
}
