use crate::ConfigError;

/// Configuration for the place-identity resolver.
///
/// Endpoint base URLs are overridable so tests can point every strategy at a
/// local mock server; everything else is retry and timeout policy.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Base URL of the generic text-search surface.
    pub text_search_base_url: String,
    /// Base URL of the per-place detail pages; also the prefix for the
    /// derived place/review URLs.
    pub place_base_url: String,
    /// Base URL of the structured aggregated-search API.
    pub allsearch_base_url: String,
    /// Base URL of the map surface used by coordinate lookup.
    pub map_base_url: String,
    pub request_timeout_secs: u64,
    /// Attempts per strategy inside the retry wrapper (first try included).
    pub max_attempts: u32,
    /// Fixed delay between retry attempts. Deliberately non-exponential:
    /// each underlying call is already multi-second network I/O.
    pub retry_delay_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            text_search_base_url: "https://search.naver.com".to_owned(),
            place_base_url: "https://m.place.naver.com/place".to_owned(),
            allsearch_base_url: "https://map.naver.com/p/api/search".to_owned(),
            map_base_url: "https://map.naver.com".to_owned(),
            request_timeout_secs: 15,
            max_attempts: 3,
            retry_delay_ms: 1_000,
        }
    }
}

/// Load resolver configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var fails to parse or validate.
pub fn load_resolver_config() -> Result<ResolverConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_resolver_config_from_env()
}

/// Load resolver configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var fails to parse or validate.
pub fn load_resolver_config_from_env() -> Result<ResolverConfig, ConfigError> {
    build_resolver_config(|key| std::env::var(key))
}

/// Build resolver configuration using the provided env-var lookup function.
///
/// The parsing/validation core is decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var`.
fn build_resolver_config<F>(lookup: F) -> Result<ResolverConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = ResolverConfig::default();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        let raw = or_default(var, &default.to_string());
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        let raw = or_default(var, &default.to_string());
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim_end_matches('/').to_string();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(trimmed)
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("\"{raw}\" is not an http(s) base URL"),
            })
        }
    };

    let text_search_base_url =
        base_url("PLACEID_TEXT_SEARCH_BASE_URL", &defaults.text_search_base_url)?;
    let place_base_url = base_url("PLACEID_PLACE_BASE_URL", &defaults.place_base_url)?;
    let allsearch_base_url = base_url("PLACEID_ALLSEARCH_BASE_URL", &defaults.allsearch_base_url)?;
    let map_base_url = base_url("PLACEID_MAP_BASE_URL", &defaults.map_base_url)?;

    let request_timeout_secs =
        parse_u64("PLACEID_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?;
    let max_attempts = parse_u32("PLACEID_MAX_ATTEMPTS", defaults.max_attempts)?;
    if max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLACEID_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let retry_delay_ms = parse_u64("PLACEID_RETRY_DELAY_MS", defaults.retry_delay_ms)?;

    Ok(ResolverConfig {
        text_search_base_url,
        place_base_url,
        allsearch_base_url,
        map_base_url,
        request_timeout_secs,
        max_attempts,
        retry_delay_ms,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_env_yields_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_resolver_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.text_search_base_url, "https://search.naver.com");
        assert_eq!(cfg.place_base_url, "https://m.place.naver.com/place");
        assert_eq!(cfg.allsearch_base_url, "https://map.naver.com/p/api/search");
        assert_eq!(cfg.map_base_url, "https://map.naver.com");
        assert_eq!(cfg.request_timeout_secs, 15);
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.retry_delay_ms, 1_000);
    }

    #[test]
    fn base_url_override_is_applied_and_trailing_slash_trimmed() {
        let mut map = HashMap::new();
        map.insert("PLACEID_PLACE_BASE_URL", "http://127.0.0.1:9000/place/");
        let cfg = build_resolver_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.place_base_url, "http://127.0.0.1:9000/place");
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut map = HashMap::new();
        map.insert("PLACEID_MAP_BASE_URL", "ftp://map.example.com");
        let result = build_resolver_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEID_MAP_BASE_URL"),
            "expected InvalidEnvVar(PLACEID_MAP_BASE_URL), got: {result:?}"
        );
    }

    #[test]
    fn retry_delay_override_is_applied() {
        let mut map = HashMap::new();
        map.insert("PLACEID_RETRY_DELAY_MS", "250");
        let cfg = build_resolver_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.retry_delay_ms, 250);
    }

    #[test]
    fn non_numeric_retry_delay_is_rejected() {
        let mut map = HashMap::new();
        map.insert("PLACEID_RETRY_DELAY_MS", "not-a-number");
        let result = build_resolver_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEID_RETRY_DELAY_MS"),
            "expected InvalidEnvVar(PLACEID_RETRY_DELAY_MS), got: {result:?}"
        );
    }

    #[test]
    fn zero_max_attempts_is_rejected() {
        let mut map = HashMap::new();
        map.insert("PLACEID_MAX_ATTEMPTS", "0");
        let result = build_resolver_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACEID_MAX_ATTEMPTS"),
            "expected InvalidEnvVar(PLACEID_MAX_ATTEMPTS), got: {result:?}"
        );
    }
}
