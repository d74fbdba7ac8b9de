//! Service list loading and default resolution

use crate::config::Config;
use crate::errors::{PingerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// A service entry as written in the service list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
    /// Probe timeout in milliseconds
    #[serde(default, deserialize_with = "lenient_number")]
    pub timeout: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub keep_history: Option<f64>,
}

/// Accept any JSON number; anything else (null, strings, objects) reads as unset.
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// A descriptor with every default applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedService {
    pub name: Option<String>,
    pub url: String,
    pub timeout: Duration,
    pub keep_history: usize,
}

impl ResolvedService {
    /// Resolve a descriptor against the configured defaults.
    ///
    /// `keepHistory` below 1 is clamped to 1 and a `timeout` below 1ms falls
    /// back to the default, so every resolved service can hold at least one
    /// sample.
    pub fn resolve(descriptor: &ServiceDescriptor, config: &Config) -> Self {
        let timeout = match descriptor.timeout {
            Some(ms) if ms >= 1.0 => Duration::from_millis(ms as u64),
            Some(ms) => {
                warn!(
                    "Service {} has timeout {}, using the default",
                    descriptor.url, ms
                );
                config.default_timeout
            }
            None => config.default_timeout,
        };

        // fractional values truncate
        let keep_history = match descriptor.keep_history {
            Some(keep) if keep >= 1.0 => keep as usize,
            Some(keep) => {
                warn!(
                    "Service {} has keepHistory {}, clamping to 1",
                    descriptor.url, keep
                );
                1
            }
            None => config.default_keep_history,
        };

        let name = descriptor.name.clone().filter(|n| !n.is_empty());

        Self {
            name,
            url: descriptor.url.clone(),
            timeout,
            keep_history,
        }
    }
}

/// Parse a service list from JSON text.
pub fn parse_descriptors(raw: &str) -> Result<Vec<ServiceDescriptor>> {
    serde_json::from_str(raw)
        .map_err(|e| PingerError::Config(format!("invalid service list: {}", e)))
}

/// Load the service list from disk.
///
/// A missing file yields an empty list so the run still persists an empty
/// document; any other read or parse failure is an error.
pub async fn load_descriptors(path: &Path) -> Result<Vec<ServiceDescriptor>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Service list {} not found, no services to check", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(PingerError::Io(e)),
    };

    let descriptors = parse_descriptors(&raw)?;
    debug!("Loaded {} service descriptors from {}", descriptors.len(), path.display());
    Ok(descriptors)
}

/// Resolve every descriptor, dropping repeated URLs after their first occurrence.
pub fn resolve_all(descriptors: &[ServiceDescriptor], config: &Config) -> Vec<ResolvedService> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        if !seen.insert(descriptor.url.as_str()) {
            warn!("Duplicate service url {}, ignoring later entry", descriptor.url);
            continue;
        }
        resolved.push(ResolvedService::resolve(descriptor, config));
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(url: &str) -> ServiceDescriptor {
        ServiceDescriptor {
            name: Some("svc".to_string()),
            url: url.to_string(),
            timeout: None,
            keep_history: None,
        }
    }

    #[test]
    fn test_defaults_applied() {
        let resolved = ResolvedService::resolve(&descriptor("https://a.test"), &Config::default());
        assert_eq!(resolved.timeout, Duration::from_millis(10_000));
        assert_eq!(resolved.keep_history, 100);
        assert_eq!(resolved.name.as_deref(), Some("svc"));
    }

    #[test]
    fn test_non_positive_keep_history_is_clamped() {
        let config = Config::default();

        let mut d = descriptor("https://a.test");
        d.keep_history = Some(0.0);
        assert_eq!(ResolvedService::resolve(&d, &config).keep_history, 1);

        d.keep_history = Some(-5.0);
        assert_eq!(ResolvedService::resolve(&d, &config).keep_history, 1);

        d.keep_history = Some(2.0);
        assert_eq!(ResolvedService::resolve(&d, &config).keep_history, 2);
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let mut d = descriptor("https://a.test");
        d.timeout = Some(0.0);
        let resolved = ResolvedService::resolve(&d, &Config::default());
        assert_eq!(resolved.timeout, Duration::from_millis(10_000));

        d.timeout = Some(250.0);
        let resolved = ResolvedService::resolve(&d, &Config::default());
        assert_eq!(resolved.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_empty_name_is_treated_as_absent() {
        let mut d = descriptor("https://a.test");
        d.name = Some(String::new());
        assert!(ResolvedService::resolve(&d, &Config::default()).name.is_none());
    }

    #[test]
    fn test_name_is_kept_verbatim() {
        let mut d = descriptor("https://a.test");
        d.name = Some(" API ".to_string());
        let resolved = ResolvedService::resolve(&d, &Config::default());
        assert_eq!(resolved.name.as_deref(), Some(" API "));

        d.name = Some("   ".to_string());
        let resolved = ResolvedService::resolve(&d, &Config::default());
        assert_eq!(resolved.name.as_deref(), Some("   "));
    }

    #[test]
    fn test_loose_numbers_do_not_reject_the_list() {
        let raw = r#"[
            {"url": "https://neg.test", "timeout": -1, "keepHistory": 5.5},
            {"url": "https://float.test", "timeout": 5000.0, "keepHistory": -3},
            {"url": "https://text.test", "timeout": "fast", "keepHistory": null}
        ]"#;

        let descriptors = parse_descriptors(raw).unwrap();
        let resolved = resolve_all(&descriptors, &Config::default());

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].timeout, Duration::from_millis(10_000));
        assert_eq!(resolved[0].keep_history, 5);
        assert_eq!(resolved[1].timeout, Duration::from_millis(5000));
        assert_eq!(resolved[1].keep_history, 1);
        assert_eq!(resolved[2].timeout, Duration::from_millis(10_000));
        assert_eq!(resolved[2].keep_history, 100);
    }

    #[test]
    fn test_parse_service_list() {
        let raw = r#"[
            {"name": "Site", "url": "https://site.test", "timeout": 5000, "keepHistory": 20},
            {"url": "https://bare.test"}
        ]"#;

        let descriptors = parse_descriptors(raw).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].timeout, Some(5000.0));
        assert_eq!(descriptors[0].keep_history, Some(20.0));
        assert!(descriptors[1].name.is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_list() {
        let err = parse_descriptors("{not json").unwrap_err();
        assert!(matches!(err, PingerError::Config(_)));
    }

    #[test]
    fn test_duplicate_urls_keep_first() {
        let mut second = descriptor("https://a.test");
        second.name = Some("dup".to_string());
        let descriptors = vec![descriptor("https://a.test"), descriptor("https://b.test"), second];

        let resolved = resolve_all(&descriptors, &Config::default());
        let urls: Vec<_> = resolved.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.test", "https://b.test"]);
        assert_eq!(resolved[0].name.as_deref(), Some("svc"));
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let descriptors = load_descriptors(&dir.path().join("services.json")).await.unwrap();
        assert!(descriptors.is_empty());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services.json");
        tokio::fs::write(&path, r#"[{"name": "A", "url": "https://a.test"}]"#)
            .await
            .unwrap();

        let descriptors = load_descriptors(&path).await.unwrap();
        assert_eq!(descriptors, vec![ServiceDescriptor {
            name: Some("A".to_string()),
            url: "https://a.test".to_string(),
            timeout: None,
            keep_history: None,
        }]);
    }
}
