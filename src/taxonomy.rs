// 🌳 Category Taxonomy - Flat rows → N1 / N2 / N3 hierarchy → seed SQL
//
// Rows come from a spreadsheet export where every leaf repeats its
// parents' names. Folding:
// - Level 1: deduplicated by name
// - Level 2: deduplicated by (level 1, level 2), defaults from the LAST row
// - Leaf:    one per valid row, never deduplicated
// - Rule:    one per leaf that carries positive keywords

use crate::config::{RuleDefaults, SeedConfig, SCHEMA_MIGRATION};
use crate::input::{data_rows, field_text, is_present, row_fields};
use crate::sql::{
    comment_safe, create_demo_user_block, demo_user_subquery, escape_text, file_banner,
    section_banner, NONE_MARKER, SQL_NULL,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Rows shorter than this are dropped
pub const CATEGORY_ROW_FIELDS: usize = 9;

// ============================================================================
// RECURRENCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recurrence {
    /// Recurring ("Sim")
    Sim,

    /// Anything else, including a missing cell ("Não")
    Nao,
}

impl Recurrence {
    /// Only the exact string "Sim" is recurring
    pub fn from_cell(value: Option<&str>) -> Self {
        match value {
            Some("Sim") => Recurrence::Sim,
            _ => Recurrence::Nao,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Sim => "Sim",
            Recurrence::Nao => "Não",
        }
    }
}

// ============================================================================
// INPUT ROW
// ============================================================================

/// One spreadsheet row, positional fields in column order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    /// App classification tag (column 0, carried but not emitted)
    pub classification: Option<String>,

    pub level_1: String,
    pub level_2: String,
    pub level_3: String,

    /// Comma separated positive keywords
    pub key_words: Option<String>,

    /// Comma separated negative keywords
    pub key_words_negative: Option<String>,

    /// Income / expense flag
    pub receita_despesa: Option<String>,

    /// Fixed / variable flag
    pub fixo_variavel: Option<String>,

    /// Raw recurrence cell ("Sim" / anything)
    pub recorrente: Option<String>,
}

impl CategoryRow {
    /// Read a row, `None` when it is short or misses a level name
    pub fn from_fields(fields: &[Value]) -> Option<Self> {
        if fields.len() < CATEGORY_ROW_FIELDS {
            return None;
        }

        let level_1 = field_text(fields, 1);
        let level_2 = field_text(fields, 2);
        let level_3 = field_text(fields, 3);

        if !is_present(level_1.as_deref())
            || !is_present(level_2.as_deref())
            || !is_present(level_3.as_deref())
        {
            return None;
        }

        Some(CategoryRow {
            classification: field_text(fields, 0),
            level_1: level_1?,
            level_2: level_2?,
            level_3: level_3?,
            key_words: field_text(fields, 4),
            key_words_negative: field_text(fields, 5),
            receita_despesa: field_text(fields, 6),
            fixo_variavel: field_text(fields, 7),
            recorrente: field_text(fields, 8),
        })
    }

    fn defaults(&self) -> CategoryDefaults {
        CategoryDefaults {
            recorrente: Recurrence::from_cell(self.recorrente.as_deref()),
            fixo_variavel: self.fixo_variavel.clone(),
            receita_despesa: self.receita_despesa.clone(),
        }
    }
}

// ============================================================================
// HIERARCHY NODES
// ============================================================================

/// Default attributes shared by level-2 and leaf categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDefaults {
    pub recorrente: Recurrence,
    pub fixo_variavel: Option<String>,
    pub receita_despesa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level2Node {
    pub level_1: String,
    pub level_2: String,
    pub defaults: CategoryDefaults,
}

impl Level2Node {
    /// Composite key, also the emission sort key
    pub fn key(&self) -> String {
        level_2_key(&self.level_1, &self.level_2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub level_1: String,
    pub level_2: String,
    pub level_3: String,
    pub key_words: Option<String>,
    pub key_words_negative: Option<String>,
    pub defaults: CategoryDefaults,
}

impl Leaf {
    /// Keyword rule for this leaf, only when positive keywords exist
    pub fn rule(&self, rule_defaults: &RuleDefaults) -> Option<Rule> {
        let key_words = self.key_words.as_deref().filter(|kw| has_keywords(Some(*kw)))?;

        Some(Rule {
            name: rule_defaults.rule_name(&self.level_3),
            key_words: key_words.to_string(),
            key_words_negative: self
                .key_words_negative
                .clone()
                .filter(|kw| !kw.is_empty() && kw.as_str() != NONE_MARKER),
            priority: rule_defaults.priority,
            strict: rule_defaults.strict,
            active: rule_defaults.active,
        })
    }
}

/// Keyword rule attached to exactly one leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub key_words: String,
    pub key_words_negative: Option<String>,
    pub priority: i32,
    pub strict: bool,
    pub active: bool,
}

/// Positive keywords count when present, not "None" and not blank
pub fn has_keywords(value: Option<&str>) -> bool {
    match value {
        Some(NONE_MARKER) | None => false,
        Some(text) => !text.trim().is_empty(),
    }
}

pub fn level_2_key(level_1: &str, level_2: &str) -> String {
    format!("{}::{}", level_1, level_2)
}

// ============================================================================
// TAXONOMY
// ============================================================================

/// Entity counts of a folded taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaxonomyStats {
    pub level_1: usize,
    pub level_2: usize,
    pub leaves: usize,
    pub rules: usize,
}

/// Folded three-level hierarchy
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    level_1: BTreeSet<String>,
    level_2: BTreeMap<String, Level2Node>,
    leaves: Vec<Leaf>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a whole document (header row included)
    pub fn fold(rows: &[Value]) -> Self {
        let mut taxonomy = Taxonomy::new();

        for row in data_rows(rows) {
            if let Some(category) = CategoryRow::from_fields(row_fields(row)) {
                taxonomy.add_row(&category);
            }
        }

        taxonomy
    }

    /// Fold one valid row into the hierarchy.
    ///
    /// A revisited (level 1, level 2) pair overwrites the defaults stored
    /// for it; rows are not checked for agreement.
    pub fn add_row(&mut self, row: &CategoryRow) {
        let defaults = row.defaults();

        self.level_1.insert(row.level_1.clone());

        let node = Level2Node {
            level_1: row.level_1.clone(),
            level_2: row.level_2.clone(),
            defaults: defaults.clone(),
        };
        self.level_2.insert(node.key(), node);

        self.leaves.push(Leaf {
            level_1: row.level_1.clone(),
            level_2: row.level_2.clone(),
            level_3: row.level_3.clone(),
            key_words: row.key_words.clone(),
            key_words_negative: row.key_words_negative.clone(),
            defaults,
        });
    }

    /// Level-1 names, sorted
    pub fn level_1_names(&self) -> impl Iterator<Item = &str> {
        self.level_1.iter().map(String::as_str)
    }

    /// Level-2 nodes, sorted by composite key
    pub fn level_2_nodes(&self) -> impl Iterator<Item = &Level2Node> {
        self.level_2.values()
    }

    /// Leaves in input order
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn stats(&self, rule_defaults: &RuleDefaults) -> TaxonomyStats {
        TaxonomyStats {
            level_1: self.level_1.len(),
            level_2: self.level_2.len(),
            leaves: self.leaves.len(),
            rules: self
                .leaves
                .iter()
                .filter(|leaf| leaf.rule(rule_defaults).is_some())
                .count(),
        }
    }
}

// ============================================================================
// SQL EMISSION
// ============================================================================

/// Render the complete taxonomy seed script.
///
/// Output is a pure function of the taxonomy and config: no timestamps,
/// no randomness, so identical input gives byte-identical SQL.
pub fn render_taxonomy_sql(taxonomy: &Taxonomy, config: &SeedConfig) -> String {
    let stats = taxonomy.stats(&config.rule_defaults);
    let mut sql = String::new();

    sql.push_str(&file_banner(
        &format!(
            "{} Taxonomy Seed ({} categories N1-N2-N3)",
            config.project_name, stats.leaves
        ),
        &config.source_workbook,
        SCHEMA_MIGRATION,
    ));
    sql.push('\n');
    sql.push_str(&create_demo_user_block(config));
    sql.push('\n');

    sql.push('\n');
    sql.push_str(&section_banner("Level 1 Categories (Nivel_1_PT)"));
    sql.push('\n');
    for name in taxonomy.level_1_names() {
        sql.push_str(&level_1_insert(name));
    }

    sql.push('\n');
    sql.push_str(&section_banner("Level 2 Categories (Nivel_2_PT)"));
    sql.push('\n');
    for node in taxonomy.level_2_nodes() {
        sql.push_str(&level_2_insert(node));
    }

    sql.push('\n');
    sql.push_str(&section_banner("Level 3 Categories (Leaves) + Rules"));
    sql.push('\n');
    for leaf in taxonomy.leaves() {
        sql.push_str(&leaf_insert(leaf));

        if let Some(rule) = leaf.rule(&config.rule_defaults) {
            sql.push_str(&rule_insert(leaf, &rule));
        }
    }

    sql.push('\n');
    sql.push_str(&taxonomy_verification());

    sql
}

fn level_1_insert(name: &str) -> String {
    format!(
        "INSERT INTO taxonomy_level_1 (user_id, nivel_1_pt)
SELECT var_value, {name}
FROM temp_vars WHERE var_name = 'demo_user_id'
ON CONFLICT DO NOTHING;

",
        name = escape_text(Some(name)),
    )
}

fn level_2_insert(node: &Level2Node) -> String {
    format!(
        "INSERT INTO taxonomy_level_2 (user_id, level_1_id, nivel_2_pt, recorrente_default, fixo_variavel_default, receita_despesa_default)
SELECT
  tv.var_value,
  tl1.level_1_id,
  {level_2},
  {recorrente},
  {fixo_variavel},
  {receita_despesa}
FROM temp_vars tv
CROSS JOIN taxonomy_level_1 tl1
WHERE tv.var_name = 'demo_user_id'
  AND tl1.user_id = tv.var_value
  AND tl1.nivel_1_pt = {level_1}
ON CONFLICT DO NOTHING;

",
        level_2 = escape_text(Some(&node.level_2)),
        recorrente = escape_text(Some(node.defaults.recorrente.as_str())),
        fixo_variavel = escape_text(node.defaults.fixo_variavel.as_deref()),
        receita_despesa = escape_text(node.defaults.receita_despesa.as_deref()),
        level_1 = escape_text(Some(&node.level_1)),
    )
}

fn leaf_insert(leaf: &Leaf) -> String {
    format!(
        "-- Leaf: {breadcrumb}
INSERT INTO taxonomy_leaf (user_id, level_2_id, nivel_3_pt, recorrente_default, fixo_variavel_default, receita_despesa_default)
SELECT
  tv.var_value,
  tl2.level_2_id,
  {level_3},
  {recorrente},
  {fixo_variavel},
  {receita_despesa}
FROM temp_vars tv
CROSS JOIN taxonomy_level_2 tl2
CROSS JOIN taxonomy_level_1 tl1
WHERE tv.var_name = 'demo_user_id'
  AND tl2.user_id = tv.var_value
  AND tl2.level_1_id = tl1.level_1_id
  AND tl1.nivel_1_pt = {level_1}
  AND tl2.nivel_2_pt = {level_2}
ON CONFLICT DO NOTHING;

",
        breadcrumb = comment_safe(&format!(
            "{} > {} > {}",
            leaf.level_1, leaf.level_2, leaf.level_3
        )),
        level_3 = escape_text(Some(&leaf.level_3)),
        recorrente = escape_text(Some(leaf.defaults.recorrente.as_str())),
        fixo_variavel = escape_text(leaf.defaults.fixo_variavel.as_deref()),
        receita_despesa = escape_text(leaf.defaults.receita_despesa.as_deref()),
        level_1 = escape_text(Some(&leaf.level_1)),
        level_2 = escape_text(Some(&leaf.level_2)),
    )
}

fn rule_insert(leaf: &Leaf, rule: &Rule) -> String {
    let negative = match rule.key_words_negative.as_deref() {
        Some(text) => escape_text(Some(text)),
        None => SQL_NULL.to_string(),
    };

    format!(
        "-- Rule for: {marker}
INSERT INTO rules (user_id, name, leaf_id, key_words, key_words_negative, priority, strict, active)
SELECT
  tv.var_value,
  {name},
  tl.leaf_id,
  {key_words},
  {negative},
  {priority},
  {strict},
  {active}
FROM temp_vars tv
CROSS JOIN taxonomy_leaf tl
CROSS JOIN taxonomy_level_2 tl2
CROSS JOIN taxonomy_level_1 tl1
WHERE tv.var_name = 'demo_user_id'
  AND tl.user_id = tv.var_value
  AND tl.level_2_id = tl2.level_2_id
  AND tl2.level_1_id = tl1.level_1_id
  AND tl1.nivel_1_pt = {level_1}
  AND tl2.nivel_2_pt = {level_2}
  AND tl.nivel_3_pt = {level_3}
ON CONFLICT DO NOTHING;

",
        marker = comment_safe(&leaf.level_3),
        name = escape_text(Some(&rule.name)),
        key_words = escape_text(Some(&rule.key_words)),
        negative = negative,
        priority = rule.priority,
        strict = rule.strict,
        active = rule.active,
        level_1 = escape_text(Some(&leaf.level_1)),
        level_2 = escape_text(Some(&leaf.level_2)),
        level_3 = escape_text(Some(&leaf.level_3)),
    )
}

fn taxonomy_verification() -> String {
    let user = demo_user_subquery();

    format!(
        "{banner}SELECT
  'Level 1 Count' as metric,
  COUNT(*) as count
FROM taxonomy_level_1
WHERE user_id = {user}
UNION ALL
SELECT
  'Level 2 Count',
  COUNT(*)
FROM taxonomy_level_2
WHERE user_id = {user}
UNION ALL
SELECT
  'Level 3 (Leaf) Count',
  COUNT(*)
FROM taxonomy_leaf
WHERE user_id = {user}
UNION ALL
SELECT
  'Rules Count',
  COUNT(*)
FROM rules
WHERE user_id = {user};
",
        banner = section_banner("VERIFICATION"),
        user = user,
    )
}

// ============================================================================
// TESTS
// ============================================================================
