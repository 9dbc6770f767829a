// ⚙️ Seed Configuration
// Every constant the generator depends on, in one place

use std::path::PathBuf;

// ============================================================================
// DEFAULTS
// ============================================================================

pub const DEFAULT_TAXONOMY_INPUT: &str = "/tmp/categorias.json";
pub const DEFAULT_ALIAS_INPUT: &str = "/tmp/alias.json";
pub const DEFAULT_TAXONOMY_OUTPUT: &str = "db/migrations/002_seed_taxonomy.sql";
pub const DEFAULT_ALIAS_OUTPUT: &str = "db/migrations/003_seed_aliases.sql";

/// Schema migration every seed script must run after
pub const SCHEMA_MIGRATION: &str = "001_complete_reset_and_schema.sql";

// ============================================================================
// RULE DEFAULTS
// ============================================================================

/// Attributes stamped on every auto-generated classification rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefaults {
    pub priority: i32,
    pub strict: bool,
    pub active: bool,

    /// Appended to the leaf name to build the rule name ("Butcher - Auto")
    pub name_suffix: String,
}

impl RuleDefaults {
    pub fn new() -> Self {
        RuleDefaults {
            priority: 500,
            strict: false,
            active: true,
            name_suffix: " - Auto".to_string(),
        }
    }

    /// Rule name for a leaf category
    pub fn rule_name(&self, leaf_name: &str) -> String {
        format!("{}{}", leaf_name, self.name_suffix)
    }
}

impl Default for RuleDefaults {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SEED CONFIG
// ============================================================================

/// Paths and identities for one generator run.
///
/// Nothing here is read from the command line or the environment:
/// `SeedConfig::default()` is the production configuration and tests build
/// their own pointing at scratch directories.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Taxonomy rows (array of arrays, row 0 is a header)
    pub taxonomy_input: PathBuf,

    /// Merchant alias rows (array of arrays, row 0 is a header)
    pub alias_input: PathBuf,

    pub taxonomy_output: PathBuf,
    pub alias_output: PathBuf,

    /// Username every seeded row is bound to
    pub demo_username: String,

    /// Password used when the demo user has to be created
    pub demo_password: String,

    /// Product name shown in script banners
    pub project_name: String,

    /// Spreadsheet the JSON inputs were extracted from (banner only)
    pub source_workbook: String,

    pub rule_defaults: RuleDefaults,
}

impl SeedConfig {
    pub fn new() -> Self {
        SeedConfig {
            taxonomy_input: PathBuf::from(DEFAULT_TAXONOMY_INPUT),
            alias_input: PathBuf::from(DEFAULT_ALIAS_INPUT),
            taxonomy_output: PathBuf::from(DEFAULT_TAXONOMY_OUTPUT),
            alias_output: PathBuf::from(DEFAULT_ALIAS_OUTPUT),
            demo_username: "demo".to_string(),
            demo_password: "demo".to_string(),
            project_name: "RitualFin".to_string(),
            source_workbook: "docs/Feedback_user/RitualFin-categorias-alias.xlsx".to_string(),
            rule_defaults: RuleDefaults::new(),
        }
    }

    /// File name of the taxonomy script, used in the alias "Run after" note
    pub fn taxonomy_script_name(&self) -> String {
        file_name_or_path(&self.taxonomy_output)
    }

    pub fn alias_script_name(&self) -> String {
        file_name_or_path(&self.alias_output)
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn file_name_or_path(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_attributes() {
        let rules = RuleDefaults::default();

        assert_eq!(rules.priority, 500);
        assert!(!rules.strict);
        assert!(rules.active);
    }

    #[test]
    fn test_rule_name_suffix() {
        let rules = RuleDefaults::new();
        assert_eq!(rules.rule_name("Supermarket"), "Supermarket - Auto");
    }

    #[test]
    fn test_default_paths_and_user() {
        let config = SeedConfig::default();

        assert_eq!(config.taxonomy_input, PathBuf::from("/tmp/categorias.json"));
        assert_eq!(config.alias_input, PathBuf::from("/tmp/alias.json"));
        assert_eq!(config.demo_username, "demo");
        assert_eq!(config.taxonomy_script_name(), "002_seed_taxonomy.sql");
        assert_eq!(config.alias_script_name(), "003_seed_aliases.sql");
    }
}
