//! Compilation of ancestor scopes into PostgreSQL query text.
//!
//! The compiled query has four stages, innermost first:
//!
//! 1. the caller's base query, aliased as the table, with each row's path
//!    decoded to an id array and annotated with `ancestry_root_id`
//! 2. a lateral `unnest(...) WITH ORDINALITY` over each base row's decoded
//!    path (plus its own id when self is included), deduplicated on
//!    (root, ancestor id) with `DISTINCT ON`
//! 3. a join back to the full table for the ancestor rows, ranked from the
//!    tip per tree with a window function
//! 4. a wrapper aliased as the table again, filtered on the rank bounds
//!
//! Path segments are trimmed and blank ones dropped. A path with a segment
//! the key type cannot hold decodes to no ancestors and its root falls back
//! to the row's own id, so no row makes the query fail.
//!
//! Because the result is aliased as the table, it composes like the table
//! itself: callers can select from it, join it, or feed it in as the base
//! query of another expansion.

use ancestry_joins::AncestorScope;

use crate::config::SqlConfig;
use crate::error::{SqlError, SqlResult};
use crate::key_type::KeyType;

/// Column holding the tree's root id, as text.
pub const ROOT_ID_COLUMN: &str = "ancestry_root_id";

/// Column holding `rank_from_root`.
pub const NTH_COLUMN: &str = "ancestry_nth";

/// Column holding `rank_from_tip`.
pub const NTH_REVERSE_COLUMN: &str = "ancestry_nth_reverse";

const PATH_IDS_COLUMN: &str = "ancestry_path_ids";
const PARSED_ALIAS: &str = "parsed_rows";
const SEGMENT_ALIAS: &str = "seg";
const BASE_ALIAS: &str = "base_rows";
const CHAIN_ALIAS: &str = "chain";
const IDS_ALIAS: &str = "ancestor_ids";
const ANCESTORS_ALIAS: &str = "ancestors";

/// Query text plus positional bind parameters (`$1`, `$2`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompiledQuery {
    /// PostgreSQL query text.
    pub sql: String,
    /// Values for the positional parameters, in order.
    pub params: Vec<i64>,
}

impl CompiledQuery {
    /// Wraps the query as a derived table under `alias`.
    pub fn as_subquery(&self, alias: &str) -> String {
        format!("({}) AS {}", self.sql, alias)
    }
}

/// Compiler for one table's ancestor joins.
///
/// Creating the compiler checks the engine and every configured name; once it
/// exists, compiling cannot fail.
///
/// # Example
///
/// ```rust
/// use ancestry_joins::AncestorScope;
/// use ancestry_joins_sql::{AncestrySql, SqlConfig};
///
/// let sql = AncestrySql::new(SqlConfig::builder("items").build()).unwrap();
///
/// let parent = sql.compile(
///     "SELECT * FROM items WHERE name = 'a3'",
///     &AncestorScope::with_ancestors_only().nth_reverse(1),
/// );
/// assert!(parent.sql.ends_with("WHERE ancestry_nth_reverse = $1"));
/// assert_eq!(parent.params, vec![1]);
/// ```
#[derive(Debug, Clone)]
pub struct AncestrySql {
    config: SqlConfig,
    key_type: KeyType,
}

impl AncestrySql {
    /// Creates a compiler, failing on an unsupported engine, a name that is
    /// not a plain identifier or a key type with no known cast guard.
    pub fn new(config: SqlConfig) -> SqlResult<Self> {
        config.dialect.ensure_supported()?;
        check_identifier("table name", &config.table, true)?;
        check_identifier("primary key", &config.primary_key, false)?;
        check_identifier("ancestry column", &config.ancestry_column, false)?;
        check_type_name(&config.primary_key_type)?;
        let key_type = KeyType::parse(&config.primary_key_type).ok_or_else(|| {
            SqlError::UnsupportedKeyType {
                name: config.primary_key_type.clone(),
            }
        })?;

        tracing::debug!(
            table = %config.table,
            dialect = %config.dialect,
            "ancestry SQL compiler ready"
        );
        Ok(Self { config, key_type })
    }

    /// Returns the compiler configuration.
    pub fn config(&self) -> &SqlConfig {
        &self.config
    }

    /// Projection of every column of the table.
    pub fn with_star(&self) -> String {
        format!("{}.*", self.config.table)
    }

    /// Projection of the tree root id: first decoded path id, or the row's
    /// own primary key for roots and undecodable paths.
    pub fn with_root_id(&self) -> String {
        let table = &self.config.table;
        format!(
            "coalesce(({})[1]::text, {table}.{}::text) AS {ROOT_ID_COLUMN}",
            self.path_ids_expr(table),
            self.config.primary_key,
        )
    }

    /// Compiles an expansion of the whole table.
    pub fn compile_all(&self, scope: &AncestorScope) -> CompiledQuery {
        let base = format!("SELECT {} FROM {}", self.with_star(), self.config.table);
        self.compile(&base, scope)
    }

    /// Compiles an expansion of the rows returned by `base_sql`.
    ///
    /// `base_sql` must return the table's primary key and ancestry columns;
    /// other columns are ignored. It is embedded as-is.
    pub fn compile(&self, base_sql: &str, scope: &AncestorScope) -> CompiledQuery {
        self.compile_with_params(base_sql, Vec::new(), scope)
    }

    /// Compiles an expansion of the rows returned by a previous compiled
    /// query, numbering this scope's parameters after the inner ones.
    pub fn compile_over(&self, base: &CompiledQuery, scope: &AncestorScope) -> CompiledQuery {
        self.compile_with_params(&base.sql, base.params.clone(), scope)
    }

    fn compile_with_params(
        &self,
        base_sql: &str,
        mut params: Vec<i64>,
        scope: &AncestorScope,
    ) -> CompiledQuery {
        let table = &self.config.table;
        let alias = self.table_alias();
        let pk = &self.config.primary_key;

        // Only the key and path are read from the base rows, so a base that
        // already carries the rank columns does not clash.
        let parsed = format!(
            "SELECT {alias}.{pk}, {path_ids} AS {PATH_IDS_COLUMN} FROM ({base_sql}) AS {alias}",
            path_ids = self.path_ids_expr(alias),
        );
        let base = format!(
            "SELECT {PARSED_ALIAS}.{pk}, {PARSED_ALIAS}.{PATH_IDS_COLUMN}, \
             coalesce({PARSED_ALIAS}.{PATH_IDS_COLUMN}[1]::text, {PARSED_ALIAS}.{pk}::text) \
             AS {ROOT_ID_COLUMN} FROM ({parsed}) AS {PARSED_ALIAS}"
        );

        let ids = format!(
            "SELECT DISTINCT ON ({BASE_ALIAS}.{ROOT_ID_COLUMN}, {CHAIN_ALIAS}.id) \
             {BASE_ALIAS}.{ROOT_ID_COLUMN}, {CHAIN_ALIAS}.id, {CHAIN_ALIAS}.nth AS {NTH_COLUMN} \
             FROM ({base}) AS {BASE_ALIAS} \
             CROSS JOIN LATERAL unnest({chain}) WITH ORDINALITY AS {CHAIN_ALIAS}(id, nth) \
             ORDER BY {BASE_ALIAS}.{ROOT_ID_COLUMN}, {CHAIN_ALIAS}.id",
            chain = self.chain_expr(BASE_ALIAS, scope.include_self),
        );

        let ranked = format!(
            "SELECT {ANCESTORS_ALIAS}.*, {IDS_ALIAS}.{ROOT_ID_COLUMN}, {IDS_ALIAS}.{NTH_COLUMN}, \
             {window} OVER (PARTITION BY {IDS_ALIAS}.{ROOT_ID_COLUMN} \
             ORDER BY {IDS_ALIAS}.{NTH_COLUMN} DESC NULLS LAST) AS {NTH_REVERSE_COLUMN} \
             FROM ({ids}) AS {IDS_ALIAS} \
             JOIN {table} AS {ANCESTORS_ALIAS} ON {ANCESTORS_ALIAS}.{pk} = {IDS_ALIAS}.id",
            window = self.config.ranking.window_function(),
        );

        let mut sql = format!("SELECT * FROM ({ranked}) AS {alias}");
        let mut conditions = Vec::new();
        if let Some(nth) = scope.filter.nth {
            params.push(bind_rank(nth));
            conditions.push(format!("{NTH_COLUMN} = ${}", params.len()));
        }
        if let Some(nth_reverse) = scope.filter.nth_reverse {
            params.push(bind_rank(nth_reverse));
            conditions.push(format!("{NTH_REVERSE_COLUMN} = ${}", params.len()));
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        tracing::debug!(
            table = %table,
            include_self = scope.include_self,
            params = params.len(),
            "compiled ancestor query"
        );

        CompiledQuery { sql, params }
    }

    // Derived tables take the bare table name; a schema prefix is not a
    // valid alias.
    fn table_alias(&self) -> &str {
        let table = self.config.table.as_str();
        table.rsplit('.').next().unwrap_or(table)
    }

    /// Ancestor ids of the row under `alias`, root first, typed as the key.
    ///
    /// Trimmed, non-blank segments only; an empty array when any segment
    /// fails the key type's check.
    fn path_ids_expr(&self, alias: &str) -> String {
        let ty = &self.config.primary_key_type;
        let segments = format!(
            "unnest(string_to_array(coalesce({alias}.{col}, ''), '/'))",
            col = self.config.ancestry_column,
        );
        let segment = format!("trim({SEGMENT_ALIAS}.s)");
        let ids = format!(
            "ARRAY(SELECT {segment}::{ty} FROM {segments} WITH ORDINALITY AS {SEGMENT_ALIAS}(s, pos) \
             WHERE {segment} <> '' ORDER BY {SEGMENT_ALIAS}.pos)"
        );

        match self.key_type.segment_check(&segment) {
            Some(check) => format!(
                "CASE WHEN NOT EXISTS (SELECT 1 FROM {segments} AS {SEGMENT_ALIAS}(s) \
                 WHERE {segment} <> '' AND NOT ({check})) \
                 THEN {ids} ELSE ARRAY[]::{ty}[] END"
            ),
            None => ids,
        }
    }

    fn chain_expr(&self, alias: &str, include_self: bool) -> String {
        let mut chain = format!("{alias}.{PATH_IDS_COLUMN}");
        if include_self {
            chain.push_str(&format!(" || ARRAY[{alias}.{}]", self.config.primary_key));
        }
        chain
    }
}

// Ranks are 1-based; a bound past i64 can match no row either way.
fn bind_rank(rank: usize) -> i64 {
    i64::try_from(rank).unwrap_or(i64::MAX)
}

fn is_plain_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() || first == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn check_identifier(role: &'static str, name: &str, allow_schema: bool) -> SqlResult<()> {
    let valid = if allow_schema {
        name.split('.').all(is_plain_identifier) && name.split('.').count() <= 2
    } else {
        is_plain_identifier(name)
    };
    if valid {
        Ok(())
    } else {
        Err(SqlError::InvalidIdentifier {
            role,
            name: name.to_string(),
        })
    }
}

// Letters, digits, underscores and spaces, with commas only inside
// parentheses, e.g. `numeric(20,0)`.
fn check_type_name(name: &str) -> SqlResult<()> {
    let starts_alpha = name.bytes().next().is_some_and(|b| b.is_ascii_alphabetic());
    let mut depth = 0_u32;
    let chars_ok = name.bytes().all(|b| match b {
            b'(' => {
                depth += 1;
                depth == 1
            }
            b')' => {
                let open = depth == 1;
                depth = depth.saturating_sub(1);
                open
            }
            b',' => depth == 1,
            _ => b.is_ascii_alphanumeric() || matches!(b, b'_' | b' '),
        });
    if starts_alpha && chars_ok && depth == 0 {
        Ok(())
    } else {
        Err(SqlError::InvalidIdentifier {
            role: "primary key type",
            name: name.to_string(),
        })
    }
}
