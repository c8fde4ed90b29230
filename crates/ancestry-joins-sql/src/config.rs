//! Configuration types for the SQL compiler.

use ancestry_joins::RankingMode;

use crate::dialect::Dialect;

/// Table layout and engine the compiler targets.
///
/// # Example
///
/// ```rust
/// use ancestry_joins_sql::{Dialect, SqlConfig};
///
/// let config = SqlConfig::builder("categories")
///     .with_primary_key("category_id", "uuid")
///     .with_ancestry_column("path")
///     .with_adapter("postgresql")
///     .build();
///
/// assert_eq!(config.table, "categories");
/// assert_eq!(config.dialect, Dialect::Postgres);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SqlConfig {
    /// Table holding the tree.
    pub table: String,
    /// Primary-key column.
    pub primary_key: String,
    /// SQL type of the primary key; ancestry segments are cast to it.
    pub primary_key_type: String,
    /// Column holding the materialized path.
    pub ancestry_column: String,
    /// Window function used for the reverse rank.
    pub ranking: RankingMode,
    /// Target engine.
    pub dialect: Dialect,
}

impl SqlConfig {
    /// Creates a new builder for a table, with `id bigint` and `ancestry`
    /// defaults.
    pub fn builder(table: impl Into<String>) -> SqlConfigBuilder {
        SqlConfigBuilder {
            table: table.into(),
            primary_key: "id".to_string(),
            primary_key_type: "bigint".to_string(),
            ancestry_column: "ancestry".to_string(),
            ranking: RankingMode::default(),
            dialect: Dialect::default(),
        }
    }
}

/// Builder for SqlConfig.
#[derive(Debug, Clone)]
pub struct SqlConfigBuilder {
    table: String,
    primary_key: String,
    primary_key_type: String,
    ancestry_column: String,
    ranking: RankingMode,
    dialect: Dialect,
}

impl SqlConfigBuilder {
    /// Sets the primary-key column and its SQL type.
    pub fn with_primary_key(mut self, column: impl Into<String>, sql_type: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self.primary_key_type = sql_type.into();
        self
    }

    /// Sets the ancestry column.
    pub fn with_ancestry_column(mut self, column: impl Into<String>) -> Self {
        self.ancestry_column = column.into();
        self
    }

    /// Sets the reverse-rank numbering.
    pub fn with_ranking(mut self, ranking: RankingMode) -> Self {
        self.ranking = ranking;
        self
    }

    /// Sets the target engine.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the target engine from a connection adapter name.
    pub fn with_adapter(self, adapter: &str) -> Self {
        self.with_dialect(Dialect::from_adapter(adapter))
    }

    /// Builds the SqlConfig.
    pub fn build(self) -> SqlConfig {
        SqlConfig {
            table: self.table,
            primary_key: self.primary_key,
            primary_key_type: self.primary_key_type,
            ancestry_column: self.ancestry_column,
            ranking: self.ranking,
            dialect: self.dialect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_config_defaults() {
        let config = SqlConfig::builder("items").build();
        assert_eq!(config.table, "items");
        assert_eq!(config.primary_key, "id");
        assert_eq!(config.primary_key_type, "bigint");
        assert_eq!(config.ancestry_column, "ancestry");
        assert_eq!(config.ranking, RankingMode::Dense);
        assert_eq!(config.dialect, Dialect::Postgres);
    }

    #[test]
    fn test_sql_config_builder() {
        let config = SqlConfig::builder("nodes")
            .with_primary_key("uid", "integer")
            .with_ancestry_column("lineage")
            .with_ranking(RankingMode::Standard)
            .with_adapter("sqlite")
            .build();

        assert_eq!(config.primary_key, "uid");
        assert_eq!(config.primary_key_type, "integer");
        assert_eq!(config.ancestry_column, "lineage");
        assert_eq!(config.ranking, RankingMode::Standard);
        assert_eq!(config.dialect, Dialect::Unsupported("sqlite".to_string()));
    }
}
