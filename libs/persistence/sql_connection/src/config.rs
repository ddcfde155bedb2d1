pub trait DbConnectConfig: serde::de::DeserializeOwned {
    fn uri(&self) -> &str;
}

/// Configure database connection pool data
pub trait DbOptionsConfig {
    fn max_conn(&self) -> Option<u32> { None }
    fn min_conn(&self) -> Option<u32> { None }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct PostgresDbConfig {
    pub uri: String,
    pub max_conn: Option<u32>,
    pub min_conn: Option<u32>,
}

impl PostgresDbConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            max_conn: None,
            min_conn: None,
        }
    }
}

impl DbConnectConfig for PostgresDbConfig {
    fn uri(&self) -> &str { &self.uri }
}

impl DbOptionsConfig for PostgresDbConfig {
    fn max_conn(&self) -> Option<u32> { self.max_conn }

    fn min_conn(&self) -> Option<u32> { self.min_conn }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_without_pool_sizes() {
        let config: PostgresDbConfig =
            serde_json::from_str(r#"{"uri":"postgresql://localhost/catalog"}"#)
                .unwrap();

        assert_eq!(config.uri(), "postgresql://localhost/catalog");
        assert_eq!(config.max_conn(), None);
        assert_eq!(config.min_conn(), None);
    }
}
