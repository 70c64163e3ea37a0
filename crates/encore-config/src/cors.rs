use std::env;

/// Browser origins allowed to call the API. `ALLOWED_ORIGINS=*` allows any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let raw = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Self {
        let allowed_origins = raw
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { allowed_origins }
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_drops_empty() {
        let config = CorsConfig::parse(" http://a.test/ ,, http://b.test");
        assert_eq!(config.allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert!(!config.allows_any());
    }

    #[test]
    fn test_wildcard() {
        assert!(CorsConfig::parse("*").allows_any());
    }
}
