use log::warn;

use crate::error::{Result, ScrapeError};
use crate::models::{Cell, ExtractedRecord, FIXED_COLUMNS, NormalizedDataset, Outcome};

/// Folds successful outcomes into one dataset over the union of their labels.
///
/// Columns are the fixed fields followed by every attribute label in first-seen
/// order. Skips and failures are ignored. Zero successes is `EmptyResult`.
pub fn aggregate(outcomes: &[Outcome]) -> Result<NormalizedDataset> {
    let records: Vec<&ExtractedRecord> = outcomes
        .iter()
        .filter_map(|o| match o {
            Outcome::Success(record) => Some(record),
            _ => None,
        })
        .collect();

    if records.is_empty() {
        return Err(ScrapeError::EmptyResult);
    }

    let columns = union_columns(&records);
    let rows = records
        .iter()
        .map(|record| columns.iter().map(|column| cell_for(record, column)).collect())
        .collect();

    Ok(NormalizedDataset { columns, rows })
}

fn union_columns(records: &[&ExtractedRecord]) -> Vec<String> {
    let mut columns: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    for record in records {
        for label in record.attributes.labels() {
            if FIXED_COLUMNS.iter().any(|c| *c == label) {
                warn!("attribute '{label}' on {} shadows a fixed column; dropped", record.url);
                continue;
            }
            if !columns.iter().any(|c| c == label) {
                columns.push(label.to_string());
            }
        }
    }
    columns
}

fn cell_for(record: &ExtractedRecord, column: &str) -> Cell {
    record
        .fixed_field(column)
        .or_else(|| record.attributes.get(column))
        .map_or(Cell::Missing, |v| Cell::Value(v.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attributes, NutritionRow};

    fn record(name: &str, attrs: &[(&str, &str)]) -> Outcome {
        Outcome::Success(ExtractedRecord {
            name: name.into(),
            image: String::new(),
            url: format!("https://x.test/{name}"),
            category: "Burgers".into(),
            attributes: attrs
                .iter()
                .map(|(l, v)| NutritionRow {
                    label: l.to_string(),
                    value: v.to_string(),
                })
                .collect::<Attributes>(),
        })
    }

    #[test]
    fn columns_are_union_in_first_seen_order() {
        let outcomes = vec![
            record("a", &[("Energy", "1"), ("Fat", "2")]),
            Outcome::Skip {
                url: "https://x.test/info".into(),
                reason: "no nutrition".into(),
            },
            record("b", &[("Energy", "3"), ("Sugar", "4")]),
        ];
        let ds = aggregate(&outcomes).unwrap();

        assert_eq!(
            ds.columns(),
            ["Product", "Image", "URL", "Category", "Energy", "Fat", "Sugar"]
        );
        assert_eq!(ds.rows().len(), 2);
        assert_eq!(ds.missing_cells(), 2);
        assert_eq!(ds.cell(0, "Sugar"), Some(&Cell::Missing));
        assert_eq!(ds.cell(1, "Fat"), Some(&Cell::Missing));
        assert_eq!(ds.cell(1, "Sugar"), Some(&Cell::Value("4".into())));
    }

    #[test]
    fn empty_value_differs_from_missing() {
        let ds = aggregate(&[record("a", &[])]).unwrap();
        assert_eq!(ds.cell(0, "Image"), Some(&Cell::Value(String::new())));
        let ds = aggregate(&[record("a", &[("Fat", "")]), record("b", &[])]).unwrap();
        assert_eq!(ds.cell(0, "Fat"), Some(&Cell::Value(String::new())));
        assert!(ds.cell(1, "Fat").unwrap().is_missing());
    }

    #[test]
    fn fixed_column_wins_over_attribute() {
        let ds = aggregate(&[record("a", &[("Product", "bogus"), ("Fat", "1")])]).unwrap();
        assert_eq!(ds.columns().len(), 5);
        assert_eq!(ds.cell(0, "Product"), Some(&Cell::Value("a".into())));
    }

    #[test]
    fn no_successes_is_empty_result() {
        let outcomes = vec![Outcome::Failure {
            url: "https://x.test/1".into(),
            error: "503".into(),
        }];
        assert!(matches!(aggregate(&outcomes), Err(ScrapeError::EmptyResult)));
        assert!(matches!(aggregate(&[]), Err(ScrapeError::EmptyResult)));
    }

    #[test]
    fn aggregating_twice_is_identical() {
        let outcomes = vec![
            record("b", &[("Sugar", "4")]),
            record("a", &[("Energy", "1"), ("Fat", "2")]),
        ];
        let first = aggregate(&outcomes).unwrap();
        let second = aggregate(&outcomes).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
