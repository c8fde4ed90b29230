//! # ancestry-joins-sql
//!
//! Relational realization of ranked ancestor joins.
//!
//! Where [`ancestry_joins`] expands ancestors in-process against a
//! [`NodeStore`](ancestry_joins::NodeStore), this crate compiles the same
//! [`AncestorScope`](ancestry_joins::AncestorScope) into a single PostgreSQL
//! query, so the expansion runs inside the database.
//!
//! ## Quick Start
//!
//! ```rust
//! use ancestry_joins::AncestorScope;
//! use ancestry_joins_sql::{AncestrySql, SqlConfig};
//!
//! let config = SqlConfig::builder("items").with_adapter("postgresql").build();
//! let sql = AncestrySql::new(config).unwrap();
//!
//! // Tips of every tree in the table
//! let tips = sql.compile_all(&AncestorScope::with_ancestors_leafs_only());
//! assert_eq!(tips.params, vec![1]);
//! ```
//!
//! ## Engine Support
//!
//! | Adapter | Supported |
//! |---------|-----------|
//! | `postgresql`, `postgres`, `postgis`, `pg` | Yes |
//! | anything else | No, [`AncestrySql::new`] returns [`SqlError::UnsupportedDialect`] |
//!
//! ## Differences from the in-process expander
//!
//! - Path segments are cast to the primary-key type by the database. Each
//!   segment is checked against the type first, so a malformed path counts
//!   as empty, as it does in-process. The key type must be an integer,
//!   `numeric`, `uuid` or character type; others fail in
//!   [`AncestrySql::new`] with [`SqlError::UnsupportedKeyType`].
//! - `ancestry_root_id` is text, whatever the key type.
//! - Row order is whatever the database returns.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod compiler;
mod config;
mod dialect;
mod error;
mod key_type;

pub use compiler::{AncestrySql, CompiledQuery, NTH_COLUMN, NTH_REVERSE_COLUMN, ROOT_ID_COLUMN};
pub use config::{SqlConfig, SqlConfigBuilder};
pub use dialect::Dialect;
pub use error::{SqlError, SqlResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _: Option<SqlConfig> = None;
        let _: Option<CompiledQuery> = None;
        let _: Option<SqlResult<()>> = None;
        assert_eq!(ROOT_ID_COLUMN, "ancestry_root_id");
        assert_eq!(NTH_COLUMN, "ancestry_nth");
        assert_eq!(NTH_REVERSE_COLUMN, "ancestry_nth_reverse");
    }
}
