// 🧱 SQL Scaffolding - Literal escaping + shared script blocks
// Everything that ends up between two statements lives here

use crate::config::SeedConfig;
use crate::input::cell_text;
use serde_json::Value;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Unquoted SQL NULL keyword
pub const SQL_NULL: &str = "NULL";

/// Spreadsheet exports write missing cells as the string "None"
pub const NONE_MARKER: &str = "None";

/// Key under which the demo user id is stored in `temp_vars`
pub const DEMO_USER_VAR: &str = "demo_user_id";

const BANNER_RULE: &str = "-- =====================================================";

// ============================================================================
// VALUE ESCAPER
// ============================================================================

/// Render an arbitrary JSON scalar as a SQL literal.
///
/// `null` and the string `"None"` become `NULL`; anything else is
/// stringified, has every `'` doubled and is wrapped in single quotes.
pub fn escape_sql(value: &Value) -> String {
    escape_text(cell_text(value).as_deref())
}

/// Same as [`escape_sql`] for a cell that has already been read as text
pub fn escape_text(value: Option<&str>) -> String {
    match value {
        None => SQL_NULL.to_string(),
        Some(NONE_MARKER) => SQL_NULL.to_string(),
        Some(text) => quote(text),
    }
}

/// Quote unconditionally (no NULL substitution)
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Fold line breaks so text can sit inside a `--` comment
pub fn comment_safe(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Scalar subquery resolving the demo user id from the scratch table
pub fn demo_user_subquery() -> String {
    format!(
        "(SELECT var_value FROM temp_vars WHERE var_name = '{}')",
        DEMO_USER_VAR
    )
}

// ============================================================================
// BANNERS
// ============================================================================

/// Three-line section banner
pub fn section_banner(title: &str) -> String {
    format!("{}\n-- {}\n{}\n", BANNER_RULE, comment_safe(title), BANNER_RULE)
}

/// Opening banner of a generated script
pub fn file_banner(title: &str, source_workbook: &str, run_after: &str) -> String {
    format!(
        "{rule}\n-- {title}\n{rule}\n-- Generated from {source}\n-- Run after: {after}\n{rule}\n",
        rule = BANNER_RULE,
        title = comment_safe(title),
        source = comment_safe(source_workbook),
        after = comment_safe(run_after),
    )
}

// ============================================================================
// SETUP BLOCKS
// ============================================================================

/// Look up the demo user, create it when missing, and park its id in
/// the session-scoped `temp_vars` table for the statements that follow.
pub fn create_demo_user_block(config: &SeedConfig) -> String {
    format!(
        r#"-- Get demo user ID (create if not exists)
DO $$
DECLARE
  demo_user_id VARCHAR;
BEGIN
  SELECT id INTO demo_user_id FROM users WHERE username = {username};

  IF demo_user_id IS NULL THEN
    INSERT INTO users (username, password)
    VALUES ({username}, {password})
    RETURNING id INTO demo_user_id;
  END IF;

  -- Store in temp for use in subsequent statements
  CREATE TEMP TABLE IF NOT EXISTS temp_vars (
    var_name TEXT PRIMARY KEY,
    var_value TEXT
  );
  DELETE FROM temp_vars WHERE var_name = '{var}';
  INSERT INTO temp_vars (var_name, var_value) VALUES ('{var}', demo_user_id);
END $$;
"#,
        username = quote(&config.demo_username),
        password = quote(&config.demo_password),
        var = DEMO_USER_VAR,
    )
}

/// Resolve an existing demo user into `temp_vars` without creating it
pub fn resolve_demo_user_block(config: &SeedConfig) -> String {
    format!(
        r#"-- Get demo user ID
DO $$
BEGIN
  CREATE TEMP TABLE IF NOT EXISTS temp_vars (
    var_name TEXT PRIMARY KEY,
    var_value TEXT
  );
  DELETE FROM temp_vars WHERE var_name = '{var}';
  INSERT INTO temp_vars (var_name, var_value)
  SELECT '{var}', id FROM users WHERE username = {username} LIMIT 1;
END $$;
"#,
        username = quote(&config.demo_username),
        var = DEMO_USER_VAR,
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_null_and_none_marker() {
        assert_eq!(escape_sql(&Value::Null), "NULL");
        assert_eq!(escape_sql(&json!("None")), "NULL");
        assert_eq!(escape_text(None), "NULL");
        assert_eq!(escape_text(Some("None")), "NULL");
    }

    #[test]
    fn test_escape_doubles_single_quotes() {
        assert_eq!(escape_sql(&json!("O'Brien")), "'O''Brien'");
        assert_eq!(escape_sql(&json!("''")), "''''''");
        assert_eq!(escape_text(Some("Mc'Donald's")), "'Mc''Donald''s'");
    }

    #[test]
    fn test_escape_plain_and_non_string_scalars() {
        assert_eq!(escape_sql(&json!("Mercado")), "'Mercado'");
        assert_eq!(escape_sql(&json!("")), "''");
        assert_eq!(escape_sql(&json!(42)), "'42'");
        assert_eq!(escape_sql(&json!(true)), "'true'");
    }

    #[test]
    fn test_escape_passes_unicode_through() {
        assert_eq!(escape_sql(&json!("Não recorrente")), "'Não recorrente'");
    }

    #[test]
    fn test_none_marker_is_case_sensitive() {
        assert_eq!(escape_text(Some("none")), "'none'");
        assert_eq!(escape_text(Some("None ")), "'None '");
    }

    #[test]
    fn test_comment_safe_folds_line_breaks() {
        assert_eq!(comment_safe("a\nb\r\nc\rd"), "a b c d");
        assert_eq!(comment_safe("plain"), "plain");
    }

    #[test]
    fn test_setup_blocks_bind_demo_user() {
        let config = SeedConfig::default();

        let create = create_demo_user_block(&config);
        assert!(create.contains("WHERE username = 'demo'"));
        assert!(create.contains("VALUES ('demo', 'demo')"));
        assert!(create.contains("VALUES ('demo_user_id', demo_user_id)"));

        let resolve = resolve_demo_user_block(&config);
        assert!(resolve.contains("SELECT 'demo_user_id', id FROM users WHERE username = 'demo' LIMIT 1"));
        assert!(!resolve.contains("INSERT INTO users"));
    }

    #[test]
    fn test_file_banner_layout() {
        let banner = file_banner("Seed", "book.xlsx", "001.sql");
        let lines: Vec<&str> = banner.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "-- Seed");
        assert_eq!(lines[3], "-- Generated from book.xlsx");
        assert_eq!(lines[4], "-- Run after: 001.sql");
    }
}
