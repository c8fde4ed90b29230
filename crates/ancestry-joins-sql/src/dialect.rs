//! Storage engine capability check.

use std::fmt;

use crate::error::{SqlError, SqlResult};

/// Storage engine the compiler targets.
///
/// Only PostgreSQL has the lateral `unnest ... WITH ORDINALITY` and window
/// functions the ancestor join is built on. Every other engine maps to
/// [`Dialect::Unsupported`] and is rejected once, at setup.
///
/// ```rust
/// use ancestry_joins_sql::Dialect;
///
/// assert_eq!(Dialect::from_adapter("PostgreSQL"), Dialect::Postgres);
/// assert_eq!(Dialect::from_adapter("postgis"), Dialect::Postgres);
/// assert!(!Dialect::from_adapter("mysql2").is_supported());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dialect {
    /// PostgreSQL and wire-compatible adapters.
    #[default]
    Postgres,
    /// Any other engine, with the adapter name it was selected by.
    Unsupported(String),
}

impl Dialect {
    /// Resolves an adapter name, case-insensitively.
    pub fn from_adapter(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" | "postgis" | "pg" => Self::Postgres,
            _ => Self::Unsupported(name.trim().to_string()),
        }
    }

    /// Returns true if ancestor joins can be compiled for this engine.
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Postgres)
    }

    /// Returns the engine name.
    pub fn name(&self) -> &str {
        match self {
            Self::Postgres => "postgresql",
            Self::Unsupported(name) => name,
        }
    }

    pub(crate) fn ensure_supported(&self) -> SqlResult<()> {
        match self {
            Self::Postgres => Ok(()),
            Self::Unsupported(engine) => Err(SqlError::UnsupportedDialect {
                engine: engine.clone(),
            }),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
