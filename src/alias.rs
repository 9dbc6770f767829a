// 🏪 Merchant Aliases - Flat rows → upsert statements
// No hierarchy here: every valid row becomes one alias_assets upsert

use crate::config::SeedConfig;
use crate::input::{data_rows, field_text, is_present, row_fields};
use crate::sql::{demo_user_subquery, escape_text, file_banner, resolve_demo_user_block, section_banner};
use serde_json::Value;

/// Rows shorter than this are dropped
pub const ALIAS_ROW_MIN_FIELDS: usize = 2;

// ============================================================================
// ALIAS ROW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRow {
    /// Display name shown for the merchant
    pub alias_desc: String,

    /// Comma separated keywords matched against transaction descriptions
    pub key_words_alias: String,

    /// Optional logo URL
    pub url_icon_internet: Option<String>,
}

impl AliasRow {
    /// Read a row, `None` when it is short or misses name / keywords
    pub fn from_fields(fields: &[Value]) -> Option<Self> {
        if fields.len() < ALIAS_ROW_MIN_FIELDS {
            return None;
        }

        let alias_desc = field_text(fields, 0);
        let key_words_alias = field_text(fields, 1);

        if !is_present(alias_desc.as_deref()) || !is_present(key_words_alias.as_deref()) {
            return None;
        }

        Some(AliasRow {
            alias_desc: alias_desc?,
            key_words_alias: key_words_alias?,
            url_icon_internet: field_text(fields, 2),
        })
    }
}

/// Valid alias rows of a document (header row skipped)
pub fn collect_aliases(rows: &[Value]) -> Vec<AliasRow> {
    data_rows(rows)
        .iter()
        .filter_map(|row| AliasRow::from_fields(row_fields(row)))
        .collect()
}

// ============================================================================
// SQL EMISSION
// ============================================================================

/// Rendered alias script plus the number of upserts it contains
#[derive(Debug, Clone)]
pub struct AliasScript {
    pub sql: String,
    pub alias_count: usize,
}

/// Render the alias seed script.
///
/// Aliases get re-seeded with corrections, so unlike the taxonomy inserts
/// these overwrite keywords, icon and `updated_at` on conflict.
pub fn render_alias_sql(aliases: &[AliasRow], config: &SeedConfig) -> AliasScript {
    let mut body = String::new();
    let mut alias_count = 0;

    for alias in aliases {
        body.push_str(&alias_upsert(alias));
        alias_count += 1;
    }

    let mut sql = String::new();
    sql.push_str(&file_banner(
        &format!(
            "{} Merchant Aliases Seed ({} merchants)",
            config.project_name, alias_count
        ),
        &config.source_workbook,
        &config.taxonomy_script_name(),
    ));
    sql.push('\n');
    sql.push_str(&resolve_demo_user_block(config));
    sql.push('\n');
    sql.push_str(&section_banner("Merchant Aliases"));
    sql.push('\n');
    sql.push_str(&body);

    sql.push('\n');
    sql.push_str(&section_banner("VERIFICATION"));
    sql.push_str(&format!(
        "SELECT
  'Aliases Count' as metric,
  COUNT(*) as count
FROM alias_assets
WHERE user_id = {user};

-- Expected: {count} aliases
",
        user = demo_user_subquery(),
        count = alias_count,
    ));

    AliasScript { sql, alias_count }
}

fn alias_upsert(alias: &AliasRow) -> String {
    format!(
        "INSERT INTO alias_assets (user_id, alias_desc, key_words_alias, url_icon_internet)
SELECT
  var_value,
  {alias_desc},
  {key_words},
  {url_icon}
FROM temp_vars
WHERE var_name = 'demo_user_id'
ON CONFLICT (user_id, alias_desc) DO UPDATE SET
  key_words_alias = EXCLUDED.key_words_alias,
  url_icon_internet = EXCLUDED.url_icon_internet,
  updated_at = NOW();

",
        alias_desc = escape_text(Some(&alias.alias_desc)),
        key_words = escape_text(Some(&alias.key_words_alias)),
        url_icon = escape_text(alias.url_icon_internet.as_deref()),
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        vec![
            json!(["Alias_Desc", "Key_words_alias", "URL_logo_internet"]),
            json!(["Netflix", "netflix,nflx", "https://logo.example/netflix.png"]),
            json!(["Lidl", "lidl"]),
            json!(["Only name"]),
            json!(["", "kw", null]),
            json!(["No keywords", null, null]),
            json!(["McDonald's", "mcdonald", "None"]),
        ]
    }

    #[test]
    fn test_collect_skips_invalid_rows() {
        let aliases = collect_aliases(&rows());
        let names: Vec<&str> = aliases.iter().map(|a| a.alias_desc.as_str()).collect();

        assert_eq!(names, vec!["Netflix", "Lidl", "McDonald's"]);
    }

    #[test]
    fn test_missing_icon_is_none() {
        let aliases = collect_aliases(&rows());

        assert_eq!(aliases[1].url_icon_internet, None);
        assert_eq!(
            aliases[0].url_icon_internet.as_deref(),
            Some("https://logo.example/netflix.png")
        );
    }

    #[test]
    fn test_header_only_document() {
        let rows = vec![json!(["Netflix", "netflix"])];
        assert!(collect_aliases(&rows).is_empty());
    }

    #[test]
    fn test_upsert_count_matches_trailing_comment() {
        let script = render_alias_sql(&collect_aliases(&rows()), &SeedConfig::default());

        assert_eq!(script.alias_count, 3);
        assert_eq!(script.sql.matches("INSERT INTO alias_assets ").count(), 3);
        assert!(script.sql.ends_with("-- Expected: 3 aliases\n"));
        assert!(script.sql.contains("(3 merchants)"));
    }

    #[test]
    fn test_upsert_updates_on_conflict() {
        let script = render_alias_sql(&collect_aliases(&rows()), &SeedConfig::default());

        assert_eq!(script.sql.matches("ON CONFLICT (user_id, alias_desc) DO UPDATE SET").count(), 3);
        assert_eq!(script.sql.matches("updated_at = NOW();").count(), 3);
        assert!(!script.sql.contains("DO NOTHING"));
    }

    #[test]
    fn test_values_are_escaped() {
        let script = render_alias_sql(&collect_aliases(&rows()), &SeedConfig::default());

        assert!(script.sql.contains("  'McDonald''s',\n  'mcdonald',\n  NULL\n"));
        assert!(script.sql.contains("  'Lidl',\n  'lidl',\n  NULL\n"));
    }

    #[test]
    fn test_setup_does_not_create_user() {
        let script = render_alias_sql(&[], &SeedConfig::default());

        assert!(!script.sql.contains("INSERT INTO users"));
        assert!(script.sql.contains("-- Run after: 002_seed_taxonomy.sql"));
        assert!(script.sql.ends_with("-- Expected: 0 aliases\n"));
    }
}
