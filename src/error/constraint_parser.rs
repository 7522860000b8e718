use regex::Regex;
use std::sync::OnceLock;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// PostgreSQL reports the offending key in the `DETAIL` part of the error,
/// e.g. `Key (name)=(admin) already exists.`, and names constraints after the
/// table and column (`roles_name_key`). Both are used to recover structured
/// information for [`AppError`](crate::error::AppError).
pub struct ConstraintParser;

/// Compiled regex patterns for constraint parsing
struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    relation_name: Regex,
}

impl RegexPatterns {
    fn new() -> Option<Self> {
        Some(Self {
            // Matches "Key (field)=(value)" pattern in PostgreSQL messages
            key_value: Regex::new(r"Key \(([^)]+)\)=\((.*)\)").ok()?,
            column_name: Regex::new(r#"column "([^"]+)""#).ok()?,
            // PostgreSQL says "relation" for check/not-null and "table" elsewhere
            relation_name: Regex::new(r#"(?:relation|table) "([^"]+)""#).ok()?,
        })
    }
}

static REGEX_PATTERNS: OnceLock<Option<RegexPatterns>> = OnceLock::new();

/// Suffixes PostgreSQL appends to generated constraint names.
const CONSTRAINT_SUFFIXES: [&str; 4] = ["_key", "_idx", "_check", "_pkey"];

impl ConstraintParser {
    fn patterns() -> Option<&'static RegexPatterns> {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new).as_ref()
    }

    /// Parses a unique constraint violation.
    ///
    /// # Arguments
    /// * `message` - The database error message, optionally followed by its detail
    /// * `constraint_name` - Optional constraint name from the database
    ///
    /// # Returns
    /// Optional tuple of (entity, field, value)
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::extract_key_value_from_message(message);

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity =
            Self::extract_relation_from_message(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a not-null violation into (entity, field).
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let field = Self::extract_column_from_message(message)?;
        let entity = Self::extract_relation_from_message(message)
            .or_else(|| constraint_name.and_then(Self::parse_constraint_name).map(|(e, _)| e))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Parses a check constraint violation into (entity, field).
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(parsed) = constraint_name.and_then(Self::parse_constraint_name) {
            return Some(parsed);
        }

        let field = Self::extract_column_from_message(message)?;
        let entity =
            Self::extract_relation_from_message(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Splits a generated constraint name into entity and field.
    ///
    /// - "roles_name_key" -> ("roles", "name")
    /// - "roles_display_name_key" -> ("roles", "display_name")
    /// - "roles_name_check" -> ("roles", "name")
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;
        let (entity, field) = stem.split_once('_')?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }

    pub fn extract_column_from_message(message: &str) -> Option<String> {
        Self::patterns()?
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_relation_from_message(message: &str) -> Option<String> {
        Self::patterns()?
            .relation_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extracts `(field, value)` from a "Key (field)=(value)" detail line.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        let line = message.lines().find(|line| line.contains("Key ("))?;
        Self::patterns()?.key_value.captures(line).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIQUE_MESSAGE: &str = "duplicate key value violates unique constraint \"roles_name_key\"\nKey (name)=(admin) already exists.";

    #[test]
    fn test_parse_unique_violation_with_constraint_name() {
        let result = ConstraintParser::parse_unique_violation(UNIQUE_MESSAGE, Some("roles_name_key"));
        assert_eq!(
            result,
            Some(("roles".to_string(), "name".to_string(), "admin".to_string()))
        );
    }

    #[test]
    fn test_parse_unique_violation_without_constraint_name() {
        let message = "duplicate key value violates unique constraint\nKey (name)=(ops (eu)) already exists.";
        let result = ConstraintParser::parse_unique_violation(message, None);
        assert_eq!(
            result,
            Some(("resource".to_string(), "name".to_string(), "ops (eu)".to_string()))
        );
    }

    #[test]
    fn test_parse_unique_violation_without_detail() {
        let message = "duplicate key value violates unique constraint \"roles_name_key\"";
        let result = ConstraintParser::parse_unique_violation(message, Some("roles_name_key"));
        assert_eq!(
            result,
            Some((
                "roles".to_string(),
                "name".to_string(),
                "duplicate_value".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_not_null_violation_with_relation() {
        let message = "null value in column \"name\" of relation \"roles\" violates not-null constraint";
        let result = ConstraintParser::parse_not_null_violation(message, None);
        assert_eq!(result, Some(("roles".to_string(), "name".to_string())));
    }

    #[test]
    fn test_parse_check_violation() {
        let message = "new row for relation \"roles\" violates check constraint \"roles_name_check\"";
        let result = ConstraintParser::parse_check_violation(message, Some("roles_name_check"));
        assert_eq!(result, Some(("roles".to_string(), "name".to_string())));
    }

    #[test]
    fn test_parse_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("roles_name_key"),
            Some(("roles".to_string(), "name".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("roles_display_name_key"),
            Some(("roles".to_string(), "display_name".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("roles_key"), None);
        assert_eq!(ConstraintParser::parse_constraint_name("invalid"), None);
    }

    #[test]
    fn test_graceful_parsing_failures() {
        let message = "completely unrelated error message";
        assert_eq!(ConstraintParser::parse_unique_violation(message, None), None);
        assert_eq!(ConstraintParser::parse_not_null_violation(message, None), None);
        assert_eq!(ConstraintParser::parse_check_violation(message, None), None);
    }
}
