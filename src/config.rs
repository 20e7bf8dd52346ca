use crate::error::ConfigError;
use crate::filter::DurationMatching;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub request_timeout: Duration,
    pub duration_matching: DurationMatching,
    pub session_dir: PathBuf,
}

impl AppConfig {
    /// Reads the process environment. `.env` is loaded by `main` beforehand.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let supabase_url = first(&["SKILLBRIDGE_SUPABASE_URL", "SUPABASE_URL"])
            .ok_or(ConfigError::MissingUrl)?;
        if !supabase_url.starts_with("http://") && !supabase_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "SKILLBRIDGE_SUPABASE_URL",
                value: supabase_url,
            });
        }
        let supabase_anon_key = first(&["SKILLBRIDGE_SUPABASE_ANON_KEY", "SUPABASE_ANON_KEY"])
            .ok_or(ConfigError::MissingAnonKey)?;

        let request_timeout = match first(&["SKILLBRIDGE_REQUEST_TIMEOUT_MS"]) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(millis) if millis > 0 => Duration::from_millis(millis),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "SKILLBRIDGE_REQUEST_TIMEOUT_MS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let duration_matching = match first(&["SKILLBRIDGE_DURATION_MATCHING"]) {
            Some(raw) => DurationMatching::parse(&raw).ok_or(ConfigError::InvalidValue {
                key: "SKILLBRIDGE_DURATION_MATCHING",
                value: raw,
            })?,
            None => DurationMatching::Legacy,
        };

        let session_dir = first(&["SKILLBRIDGE_SESSION_DIR"])
            .map(PathBuf::from)
            .unwrap_or_else(default_session_dir);

        Ok(Self {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_anon_key,
            request_timeout,
            duration_matching,
            session_dir,
        })
    }
}

fn default_session_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".skillbridge")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_url_is_reported_before_key() {
        let error = AppConfig::from_lookup(lookup(&[])).expect_err("empty env should fail");
        assert_eq!(error, ConfigError::MissingUrl);
    }

    #[test]
    fn missing_anon_key_is_reported() {
        let error = AppConfig::from_lookup(lookup(&[("SUPABASE_URL", "https://x.supabase.co")]))
            .expect_err("missing key should fail");
        assert_eq!(error, ConfigError::MissingAnonKey);
    }

    #[test]
    fn prefixed_keys_win_and_defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SKILLBRIDGE_SUPABASE_URL", "https://app.supabase.co/"),
            ("SUPABASE_URL", "https://other.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("SKILLBRIDGE_SESSION_DIR", "/tmp/skillbridge-test"),
        ]))
        .expect("config should load");

        assert_eq!(config.supabase_url, "https://app.supabase.co");
        assert_eq!(config.supabase_anon_key, "anon");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.duration_matching, DurationMatching::Legacy);
        assert_eq!(config.session_dir, PathBuf::from("/tmp/skillbridge-test"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let error = AppConfig::from_lookup(lookup(&[
            ("SKILLBRIDGE_SUPABASE_URL", "   "),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .expect_err("blank url should fail");
        assert_eq!(error, ConfigError::MissingUrl);
    }

    #[test]
    fn rejects_bad_timeout_and_matching_mode() {
        let base = [
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ];

        let mut pairs = base.to_vec();
        pairs.push(("SKILLBRIDGE_REQUEST_TIMEOUT_MS", "0"));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidValue { key: "SKILLBRIDGE_REQUEST_TIMEOUT_MS", .. })
        ));

        let mut pairs = base.to_vec();
        pairs.push(("SKILLBRIDGE_DURATION_MATCHING", "fuzzy"));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidValue { key: "SKILLBRIDGE_DURATION_MATCHING", .. })
        ));

        let mut pairs = base.to_vec();
        pairs.push(("SKILLBRIDGE_DURATION_MATCHING", "parsed"));
        pairs.push(("SKILLBRIDGE_REQUEST_TIMEOUT_MS", "2500"));
        let config = AppConfig::from_lookup(lookup(&pairs)).expect("config should load");
        assert_eq!(config.duration_matching, DurationMatching::Parsed);
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn rejects_url_without_scheme() {
        let error = AppConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "x.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .expect_err("scheme-less url should fail");
        assert!(matches!(error, ConfigError::InvalidValue { .. }));
    }
}
