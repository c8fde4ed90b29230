//! Primary-key type classification.
//!
//! Ancestry segments are cast to the key type inside the database. A cast
//! that fails aborts the whole statement, so every segment is first checked
//! against a pattern the type is known to accept; a path with any failing
//! segment decodes to zero ancestors, the same as in-process decoding.

/// Key types the compiler can guard a cast for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyType {
    /// `smallint`, `integer`, `bigint` and their aliases.
    Integer { min: i64, max: i64 },
    /// `numeric` / `decimal`, optionally with precision and scale.
    Decimal { precision: Option<(u32, u32)> },
    /// `uuid` in hex form, hyphens optional.
    Uuid,
    /// Character types; every segment casts.
    Text,
}

const INTEGER_PATTERN: &str = "^[+-]?[0-9]+$";
const DECIMAL_PATTERN: &str = "^[+-]?([0-9]+(\\.[0-9]*)?|\\.[0-9]+)$";
const UUID_PATTERN: &str =
    "^[0-9a-f]{8}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{12}$";

impl KeyType {
    /// Classifies a SQL type name; `None` for types with no known guard.
    pub(crate) fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        let (base, args) = match normalized.split_once('(') {
            Some((base, rest)) => (base.trim(), Some(rest.strip_suffix(')')?)),
            None => (normalized.as_str(), None),
        };
        let base = base.split_whitespace().collect::<Vec<_>>().join(" ");

        match (base.as_str(), args) {
            ("smallint" | "int2" | "smallserial" | "serial2", None) => Some(KeyType::Integer {
                min: i16::MIN.into(),
                max: i16::MAX.into(),
            }),
            ("integer" | "int" | "int4" | "serial" | "serial4", None) => Some(KeyType::Integer {
                min: i32::MIN.into(),
                max: i32::MAX.into(),
            }),
            ("bigint" | "int8" | "bigserial" | "serial8", None) => Some(KeyType::Integer {
                min: i64::MIN,
                max: i64::MAX,
            }),
            ("numeric" | "decimal", None) => Some(KeyType::Decimal { precision: None }),
            ("numeric" | "decimal", Some(args)) => {
                let mut parts = args.split(',').map(|part| part.trim().parse::<u32>());
                let precision = parts.next()?.ok()?;
                let scale = match parts.next() {
                    Some(scale) => scale.ok()?,
                    None => 0,
                };
                if parts.next().is_some() || precision == 0 || scale > precision {
                    return None;
                }
                Some(KeyType::Decimal {
                    precision: Some((precision, scale)),
                })
            }
            ("uuid", None) => Some(KeyType::Uuid),
            ("text" | "citext", None) => Some(KeyType::Text),
            ("varchar" | "character varying" | "char" | "character" | "bpchar", _) => {
                Some(KeyType::Text)
            }
            _ => None,
        }
    }

    /// SQL predicate that holds when `segment` casts to this type without
    /// error, or `None` when every segment casts.
    pub(crate) fn segment_check(&self, segment: &str) -> Option<String> {
        match self {
            KeyType::Integer { min, max } => Some(format!(
                "CASE WHEN {segment} ~ '{INTEGER_PATTERN}' \
                 THEN {segment}::numeric BETWEEN {min} AND {max} ELSE false END"
            )),
            KeyType::Decimal { precision: None } => {
                Some(format!("{segment} ~ '{DECIMAL_PATTERN}'"))
            }
            // Rounded to the scale, the value must leave `precision - scale`
            // integer digits.
            KeyType::Decimal {
                precision: Some((precision, scale)),
            } => Some(format!(
                "CASE WHEN {segment} ~ '{DECIMAL_PATTERN}' \
                 THEN abs(round({segment}::numeric, {scale})) < 1e{digits} ELSE false END",
                digits = precision - scale,
            )),
            KeyType::Uuid => Some(format!("{segment} ~* '{UUID_PATTERN}'")),
            KeyType::Text => None,
        }
    }
}
