use serde::{Deserialize, Serialize};

/// Top-level analyzer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbedqlConfig {
    /// Path to the schema SDL file, relative to the config file. Schema
    /// acquisition itself is the host tooling's job; the analyzer only
    /// forwards this path.
    #[serde(default)]
    pub schema: Option<String>,

    /// Extra client-only directive names, extending the built-in allow-list
    /// used to filter schema-validation diagnostics.
    #[serde(default)]
    pub client_directives: Vec<String>,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Diagnostics-cache sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum number of cached occurrences.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Entry lifetime ceiling in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

const fn default_capacity() -> usize {
    128
}

const fn default_ttl_secs() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: EmbedqlConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.schema, None);
        assert!(config.client_directives.is_empty());
        assert_eq!(config.cache.capacity, 128);
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let json = r#"
        {
            "schema": "schema.graphql",
            "client_directives": ["live"],
            "cache": { "capacity": 32 }
        }
        "#;
        let config: EmbedqlConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.schema.as_deref(), Some("schema.graphql"));
        assert_eq!(config.client_directives, vec!["live".to_owned()]);
        assert_eq!(config.cache.capacity, 32);
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: std::result::Result<EmbedqlConfig, _> =
            serde_json::from_str(r#"{ "schemaPath": "x" }"#);
        assert!(result.is_err());
    }
}
