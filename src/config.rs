//! Environment-driven settings, with `.env` support.

use crate::error::{AppError, ConfigError};
use crate::pagination::{PageParams, PageRequest};
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/crm";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub default_page_limit: u32,
    pub max_page_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            max_connections: 5,
            default_page_limit: 10,
            max_page_limit: 100,
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

impl Settings {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let settings = Settings {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            default_page_limit: parse_or(&lookup, "DEFAULT_PAGE_LIMIT", defaults.default_page_limit)?,
            max_page_limit: parse_or(&lookup, "MAX_PAGE_LIMIT", defaults.max_page_limit)?,
        };
        if settings.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }
        if settings.default_page_limit == 0 || settings.default_page_limit > settings.max_page_limit {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_PAGE_LIMIT",
                value: settings.default_page_limit.to_string(),
            });
        }
        Ok(settings)
    }

    pub fn page_request(&self, params: PageParams) -> Result<PageRequest, AppError> {
        PageRequest::new(
            params.page,
            params.limit,
            self.default_page_limit,
            self.max_page_limit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn unset_keys_use_defaults() {
        let s = from_pairs(&[]).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(s.max_connections, 5);
        assert_eq!(s.default_page_limit, 10);
        assert_eq!(s.max_page_limit, 100);
    }

    #[test]
    fn overrides_are_parsed() {
        let s = from_pairs(&[("DB_MAX_CONNECTIONS", " 12 "), ("MAX_PAGE_LIMIT", "50")]).unwrap();
        assert_eq!(s.max_connections, 12);
        assert_eq!(s.max_page_limit, 50);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = from_pairs(&[("DEFAULT_PAGE_LIMIT", "ten")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DEFAULT_PAGE_LIMIT", .. }));
        assert!(from_pairs(&[("DEFAULT_PAGE_LIMIT", "200")]).is_err());
    }

    #[test]
    fn page_request_applies_default_limit() {
        let s = Settings::default();
        let page = s.page_request(PageParams { page: Some(2), limit: None }).unwrap();
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset(), 10);
    }
}
