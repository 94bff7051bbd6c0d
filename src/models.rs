use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

pub const UNKNOWN_CATEGORY: &str = "Unknown";
pub const UNKNOWN_NAME: &str = "UNKNOWN";

/// Fixed columns, in the order they lead every dataset.
pub const FIXED_COLUMNS: [&str; 4] = ["Product", "Image", "URL", "Category"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub url: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutritionRow {
    pub label: String,
    pub value: String,
}

/// Nutrition label/value pairs in page order. Labels are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<NutritionRow>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row; a repeated label overwrites the value in place.
    pub fn insert(&mut self, row: NutritionRow) {
        match self.0.iter_mut().find(|r| r.label == row.label) {
            Some(existing) => existing.value = row.value,
            None => self.0.push(row),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|r| r.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<NutritionRow> for Attributes {
    fn from_iter<I: IntoIterator<Item = NutritionRow>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for row in iter {
            attrs.insert(row);
        }
        attrs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub name: String,
    pub image: String,
    pub url: String,
    pub category: String,
    pub attributes: Attributes,
}

impl ExtractedRecord {
    /// Value for one of the fixed columns.
    pub fn fixed_field(&self, column: &str) -> Option<&str> {
        match column {
            "Product" => Some(&self.name),
            "Image" => Some(&self.image),
            "URL" => Some(&self.url),
            "Category" => Some(&self.category),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(ExtractedRecord),
    Skip { url: String, reason: String },
    Failure { url: String, error: String },
}

impl Outcome {
    pub fn url(&self) -> &str {
        match self {
            Outcome::Success(record) => &record.url,
            Outcome::Skip { url, .. } | Outcome::Failure { url, .. } => url,
        }
    }
}

/// A dataset cell. `Missing` is distinct from an extracted empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Value(String),
    Missing,
}

impl Cell {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Value(v) => serializer.serialize_str(v),
            Cell::Missing => serializer.serialize_none(),
        }
    }
}

/// Rows are stored aligned with `columns`: `rows[i][j]` belongs to `columns[j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDataset {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<Cell>>,
}

impl NormalizedDataset {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn missing_cells(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_missing()).count()
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)
    }
}

struct RowView<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

/// Serializes as a row-oriented array of objects with keys in column order.
impl Serialize for NormalizedDataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for cells in &self.rows {
            seq.serialize_element(&RowView {
                columns: &self.columns,
                cells,
            })?;
        }
        seq.end()
    }
}
