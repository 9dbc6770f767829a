// Taxonomy Seed - Core Library
// Spreadsheet JSON exports → idempotent SQL seed scripts

pub mod config;     // Paths, demo user, rule defaults
pub mod sql;        // Literal escaping + shared script blocks
pub mod input;      // JSON row reader
pub mod taxonomy;   // N1/N2/N3 folding + taxonomy seed
pub mod alias;      // Merchant alias seed
pub mod output;     // SQL writer + fingerprint
pub mod generator;  // End-to-end pipelines

// Re-export commonly used types
pub use config::{RuleDefaults, SeedConfig};
pub use sql::{escape_sql, escape_text};
pub use input::load_rows;
pub use taxonomy::{
    CategoryRow, Leaf, Level2Node, Recurrence, Rule, Taxonomy, TaxonomyStats,
    render_taxonomy_sql,
};
pub use alias::{AliasRow, AliasScript, collect_aliases, render_alias_sql};
pub use output::{WrittenFile, fingerprint, write_sql};
pub use generator::{
    AliasReport, GenerationReport, TaxonomyReport,
    generate_alias_seed, generate_all, generate_taxonomy_seed,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
