//! Core types shared across benefit-graph modules

use serde::{Deserialize, Serialize};

/// A loosely typed spreadsheet cell.
///
/// Numbers keep their raw text so ids such as `003` are not normalized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(String),
    Text(String),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Cell::Empty
        } else if field.trim().parse::<f64>().is_ok_and(f64::is_finite) {
            Cell::Number(field.to_string())
        } else {
            Cell::Text(field.to_string())
        }
    }

    /// Raw text of a non-empty cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Empty => None,
            Cell::Number(s) | Cell::Text(s) => Some(s),
        }
    }

    /// Only `Text` cells; numbers never count as strings.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Trimmed text, `None` when the cell is empty or whitespace only.
    pub fn trimmed(&self) -> Option<&str> {
        self.as_str().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Cell::Number(_))
    }
}

/// One sheet row. Rows are ragged: reading past the end yields an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Self {
        Self::new(fields.iter().map(|f| Cell::from_field(f.as_ref())).collect())
    }

    pub fn cell(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when every cell is empty (a zero-width row counts as blank).
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }
}

/// Display class derived from the free-text item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Item,
    Series,
    Other,
}

impl ItemCategory {
    pub fn from_type(item_type: &str) -> Self {
        if item_type.contains("Series") {
            ItemCategory::Series
        } else if item_type.contains("Item") {
            ItemCategory::Item
        } else {
            ItemCategory::Other
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ItemCategory::Series => "#28a745",
            ItemCategory::Item => "#ffc107",
            ItemCategory::Other => "#007bff",
        }
    }
}

/// A catalog entry parsed from one data row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub display_name: String,
    pub short_name: String,
    pub item_type: String,
    pub category: ItemCategory,
}

impl Item {
    pub fn new(id: impl Into<String>, item_type: impl Into<String>) -> Self {
        let id = id.into();
        let item_type = item_type.into();
        Self {
            display_name: id.clone(),
            short_name: id.clone(),
            category: ItemCategory::from_type(&item_type),
            id,
            item_type,
        }
    }
}

/// Directed edge from a dependency (`from`) to its dependent (`to`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_classification() {
        assert_eq!(Cell::from_field(""), Cell::Empty);
        assert_eq!(Cell::from_field("42"), Cell::Number("42".into()));
        assert_eq!(Cell::from_field(" 003 "), Cell::Number(" 003 ".into()));
        assert_eq!(Cell::from_field("Age:Item"), Cell::Text("Age:Item".into()));
        assert_eq!(Cell::from_field("  ").trimmed(), None);
        assert_eq!(Cell::from_field(" 7 ").trimmed(), Some("7"));
        assert_eq!(Cell::from_field("7").as_text(), None);
    }

    #[test]
    fn test_row_out_of_range_is_empty() {
        let row = Row::from_fields(&["1", "", "Item"]);
        assert_eq!(row.cell(0).trimmed(), Some("1"));
        assert!(row.cell(1).is_empty());
        assert!(row.cell(500).is_empty());
        assert!(!row.is_blank());
        assert!(Row::from_fields(&["", "", ""]).is_blank());
        assert!(Row::default().is_blank());
    }

    #[test]
    fn test_category_from_type() {
        assert_eq!(ItemCategory::from_type("Series"), ItemCategory::Series);
        assert_eq!(ItemCategory::from_type("Item Series"), ItemCategory::Series);
        assert_eq!(ItemCategory::from_type("Item"), ItemCategory::Item);
        assert_eq!(ItemCategory::from_type("Unknown"), ItemCategory::Other);
        assert_eq!(ItemCategory::Series.color(), "#28a745");
    }
}
