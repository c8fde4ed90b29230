//! Error types for SQL compilation.

use thiserror::Error;

/// Errors raised while setting up the SQL compiler.
///
/// All of them are configuration faults: they surface from
/// [`AncestrySql::new`](crate::AncestrySql::new), never from compiling a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlError {
    /// The storage engine has no ancestor join strategy.
    #[error("Unsupported storage engine `{engine}`: ancestor joins require PostgreSQL")]
    UnsupportedDialect {
        /// Adapter name as given.
        engine: String,
    },

    /// A table, column or type name is not a plain SQL identifier.
    #[error("Invalid {role} `{name}`")]
    InvalidIdentifier {
        /// What the name was used for.
        role: &'static str,
        /// The rejected name.
        name: String,
    },

    /// No malformed-path guard is known for the primary-key type.
    #[error("Unsupported primary key type `{name}`: expected an integer, numeric, uuid or character type")]
    UnsupportedKeyType {
        /// The rejected type name.
        name: String,
    },
}

/// Result type for SQL compilation.
pub type SqlResult<T> = std::result::Result<T, SqlError>;
