// 🔄 Seed Generator - read → fold → render → write, once per pipeline
//
// The SQL is fully rendered before the output file is touched, so a bad
// input never leaves a half-written script behind.

use crate::alias::{collect_aliases, render_alias_sql};
use crate::config::SeedConfig;
use crate::input::load_rows;
use crate::output::{write_sql, WrittenFile};
use crate::taxonomy::{render_taxonomy_sql, Taxonomy, TaxonomyStats};
use anyhow::Result;
use serde::Serialize;

// ============================================================================
// REPORTS
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyReport {
    pub file: WrittenFile,
    pub stats: TaxonomyStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct AliasReport {
    pub file: WrittenFile,
    pub alias_count: usize,
}

/// Outcome of a full run (taxonomy then aliases)
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub taxonomy: TaxonomyReport,
    pub aliases: AliasReport,
}

// ============================================================================
// PIPELINES
// ============================================================================

/// Taxonomy JSON → `taxonomy_output`
pub fn generate_taxonomy_seed(config: &SeedConfig) -> Result<TaxonomyReport> {
    let rows = load_rows(&config.taxonomy_input)?;
    let taxonomy = Taxonomy::fold(&rows);
    let sql = render_taxonomy_sql(&taxonomy, config);

    let file = write_sql(&config.taxonomy_output, &sql)?;

    Ok(TaxonomyReport {
        file,
        stats: taxonomy.stats(&config.rule_defaults),
    })
}

/// Alias JSON → `alias_output`
pub fn generate_alias_seed(config: &SeedConfig) -> Result<AliasReport> {
    let rows = load_rows(&config.alias_input)?;
    let aliases = collect_aliases(&rows);
    let script = render_alias_sql(&aliases, config);

    let file = write_sql(&config.alias_output, &script.sql)?;

    Ok(AliasReport {
        file,
        alias_count: script.alias_count,
    })
}

/// Both pipelines, strictly in order; the first failure aborts the run
pub fn generate_all(config: &SeedConfig) -> Result<GenerationReport> {
    let taxonomy = generate_taxonomy_seed(config)?;
    let aliases = generate_alias_seed(config)?;

    Ok(GenerationReport { taxonomy, aliases })
}
