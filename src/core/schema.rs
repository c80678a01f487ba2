//! Semantic column detection
//!
//! Header names drift between exports, so each field is resolved through an
//! ordered chain of strategies: exact header match, partial header match and,
//! for header-less sheets, pattern matching on the first data row. The first
//! strategy that yields a column wins for that field.

use serde::Serialize;
use std::collections::HashSet;

use crate::config::ExplorerConfig;
use crate::core::section::Section;
use crate::core::types::{Cell, Row};

/// Fields the extractor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    IdItem,
    IdEvent,
    DisplayGroup,
    ItemName,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::IdItem,
        Field::IdEvent,
        Field::DisplayGroup,
        Field::ItemName,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            Field::IdItem => "id_item",
            Field::IdEvent => "id_event",
            Field::DisplayGroup => "display_group",
            Field::ItemName => "item_name",
        }
    }

    /// Substrings accepted by the partial-match tier.
    fn partial_names(&self) -> &'static [&'static str] {
        match self {
            Field::DisplayGroup => &["display_group", "group"],
            Field::IdItem => &["id_item"],
            Field::IdEvent => &["id_event"],
            Field::ItemName => &["item_name"],
        }
    }
}

/// Which strategy resolved a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Partial,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub column: usize,
    pub tier: MatchTier,
}

/// Column indices for the semantic fields; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub id_item: Option<Resolved>,
    pub id_event: Option<Resolved>,
    pub display_group: Option<Resolved>,
    pub item_name: Option<Resolved>,
}

impl Schema {
    pub fn get(&self, field: Field) -> Option<Resolved> {
        match field {
            Field::IdItem => self.id_item,
            Field::IdEvent => self.id_event,
            Field::DisplayGroup => self.display_group,
            Field::ItemName => self.item_name,
        }
    }

    pub fn column(&self, field: Field) -> Option<usize> {
        self.get(field).map(|r| r.column)
    }

    fn set(&mut self, field: Field, resolved: Resolved) {
        let slot = match field {
            Field::IdItem => &mut self.id_item,
            Field::IdEvent => &mut self.id_event,
            Field::DisplayGroup => &mut self.display_group,
            Field::ItemName => &mut self.item_name,
        };
        *slot = Some(resolved);
    }

    pub fn resolved_count(&self) -> usize {
        Field::ALL.iter().filter(|f| self.get(**f).is_some()).count()
    }
}

/// Inputs shared by every strategy.
struct DetectionContext<'a> {
    header: Option<&'a Row>,
    sample: Option<&'a Row>,
    sample_columns: usize,
    group_keywords: &'a [String],
    claimed: &'a HashSet<usize>,
}

type Strategy = fn(Field, &DetectionContext<'_>) -> Option<usize>;

const STRATEGIES: [(MatchTier, Strategy); 3] = [
    (MatchTier::Exact, exact_header),
    (MatchTier::Partial, partial_header),
    (MatchTier::Pattern, sample_pattern),
];

/// Resolves the semantic fields of `section`.
pub fn detect_schema(section: &Section<'_>, config: &ExplorerConfig) -> Schema {
    let mut schema = Schema::default();
    let mut claimed: HashSet<usize> = HashSet::new();

    for (tier, strategy) in STRATEGIES {
        for field in Field::ALL {
            if schema.get(field).is_some() {
                continue;
            }
            let ctx = DetectionContext {
                header: section.header,
                sample: section.sample_row(),
                sample_columns: config.sample_columns,
                group_keywords: &config.group_keywords,
                claimed: &claimed,
            };
            if let Some(column) = strategy(field, &ctx) {
                tracing::debug!(
                    field = field.canonical_name(),
                    column,
                    tier = ?tier,
                    "Resolved column"
                );
                schema.set(field, Resolved { column, tier });
                claimed.insert(column);
            }
        }
    }

    if schema.resolved_count() < Field::ALL.len() {
        let missing: Vec<_> = Field::ALL
            .iter()
            .filter(|f| schema.get(**f).is_none())
            .map(Field::canonical_name)
            .collect();
        tracing::debug!(?missing, "Some schema fields could not be resolved");
    }

    schema
}

fn header_cells(header: Option<&Row>) -> impl Iterator<Item = (usize, String)> + '_ {
    header
        .into_iter()
        .flat_map(|row| row.cells().iter().enumerate())
        .filter_map(|(i, cell)| cell.as_str().map(|s| (i, s.trim().to_lowercase())))
}

fn exact_header(field: Field, ctx: &DetectionContext<'_>) -> Option<usize> {
    header_cells(ctx.header)
        .find(|(_, name)| name == field.canonical_name())
        .map(|(i, _)| i)
}

fn partial_header(field: Field, ctx: &DetectionContext<'_>) -> Option<usize> {
    header_cells(ctx.header)
        .filter(|(i, _)| !ctx.claimed.contains(i))
        .find(|(_, name)| field.partial_names().iter().any(|p| name.contains(p)))
        .map(|(i, _)| i)
}

/// Only used when the section has no header row.
fn sample_pattern(field: Field, ctx: &DetectionContext<'_>) -> Option<usize> {
    if ctx.header.is_some() {
        return None;
    }
    let sample = ctx.sample?;

    (0..ctx.sample_columns.min(sample.len()))
        .filter(|i| !ctx.claimed.contains(i))
        .find(|&i| {
            let cell = sample.cell(i);
            match field {
                Field::IdEvent => looks_like_event(cell),
                Field::DisplayGroup => looks_like_group(cell, ctx.group_keywords),
                Field::IdItem | Field::ItemName => false,
            }
        })
}

/// `text:text` with exactly one colon, e.g. `6:Active retirement`.
fn looks_like_event(cell: &Cell) -> bool {
    cell.trimmed()
        .is_some_and(|v| v.matches(':').count() == 1)
}

fn looks_like_group(cell: &Cell, keywords: &[String]) -> bool {
    if cell.is_number() {
        return false;
    }
    let Some(value) = cell.trimmed() else {
        return false;
    };
    if value.chars().count() <= 5 || matches!(value, "TRUE" | "FALSE" | "0" | "1") {
        return false;
    }
    let lower = value.to_lowercase();
    keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
}
