//! Runtime configuration from environment variables

use std::time::Duration;

use crate::error::{GraderError, Result};

pub const DEFAULT_CONTENT_PROXIES: &[&str] = &[
    "https://api.allorigins.win/get?url={url}",
    "https://corsproxy.io/?{url}",
    "https://cors-anywhere.herokuapp.com/{raw}",
];
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSpeedStrategy {
    #[default]
    Mobile,
    Desktop,
}

impl PageSpeedStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSpeedStrategy::Mobile => "mobile",
            PageSpeedStrategy::Desktop => "desktop",
        }
    }
}

/// Supabase project used for submission logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraderConfig {
    pub pagespeed_api_key: Option<String>,
    pub pagespeed_strategy: PageSpeedStrategy,
    /// Proxy URL templates; `{url}` is replaced by the percent-encoded
    /// target and `{raw}` by the target as is.
    pub content_proxies: Vec<String>,
    pub http_timeout: Duration,
    pub supabase: Option<SupabaseConfig>,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            pagespeed_api_key: None,
            pagespeed_strategy: PageSpeedStrategy::default(),
            content_proxies: DEFAULT_CONTENT_PROXIES.iter().map(|p| p.to_string()).collect(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            supabase: None,
        }
    }
}

impl GraderConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let pagespeed_strategy = match get_var("PAGESPEED_STRATEGY").as_deref() {
            None => PageSpeedStrategy::default(),
            Some(s) if s.eq_ignore_ascii_case("mobile") => PageSpeedStrategy::Mobile,
            Some(s) if s.eq_ignore_ascii_case("desktop") => PageSpeedStrategy::Desktop,
            Some(other) => {
                return Err(GraderError::Config(format!(
                    "PAGESPEED_STRATEGY must be 'mobile' or 'desktop', got '{other}'"
                )));
            }
        };

        let content_proxies = match get_var("CONTENT_PROXIES") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_CONTENT_PROXIES.iter().map(|p| p.to_string()).collect(),
        };

        let http_timeout = match get_var("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    GraderError::Config(format!("HTTP_TIMEOUT_SECS must be a number, got '{raw}'"))
                })?;
                if secs == 0 {
                    return Err(GraderError::Config(
                        "HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let supabase = match (get_var("SUPABASE_URL"), get_var("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            _ => None,
        };

        Ok(Self {
            pagespeed_api_key: get_var("PAGESPEED_API_KEY"),
            pagespeed_strategy,
            content_proxies,
            http_timeout,
            supabase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<GraderConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GraderConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, GraderConfig::default());
        assert_eq!(config.content_proxies.len(), 3);
        assert_eq!(config.http_timeout, Duration::from_secs(20));
        assert!(config.pagespeed_api_key.is_none());
        assert!(config.supabase.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = config_from(&[
            ("PAGESPEED_API_KEY", "abc123"),
            ("PAGESPEED_STRATEGY", "Desktop"),
            ("CONTENT_PROXIES", "https://p1/{url}, ,https://p2/{raw}"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("SUPABASE_URL", "https://proj.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ])
        .unwrap();

        assert_eq!(config.pagespeed_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.pagespeed_strategy, PageSpeedStrategy::Desktop);
        assert_eq!(config.content_proxies, vec!["https://p1/{url}", "https://p2/{raw}"]);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        let supabase = config.supabase.unwrap();
        assert_eq!(supabase.url, "https://proj.supabase.co");
        assert_eq!(supabase.anon_key, "anon");
    }

    #[test]
    fn supabase_needs_both_values() {
        let config = config_from(&[("SUPABASE_URL", "https://proj.supabase.co")]).unwrap();
        assert!(config.supabase.is_none());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[("PAGESPEED_API_KEY", "  ")]).unwrap();
        assert!(config.pagespeed_api_key.is_none());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            config_from(&[("HTTP_TIMEOUT_SECS", "soon")]),
            Err(GraderError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("HTTP_TIMEOUT_SECS", "0")]),
            Err(GraderError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("PAGESPEED_STRATEGY", "tablet")]),
            Err(GraderError::Config(_))
        ));
    }
}
