use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

pub const ANIMAL_ID: &str = "Animal_ID";

/// Store field name → canonical column name
const CANONICAL_COLUMNS: [(&str, &str); 7] = [
    ("animal_id", ANIMAL_ID),
    ("species", "Species"),
    ("breed", "Breed"),
    ("age", "Age"),
    ("weight", "Weight"),
    ("sex", "Sex"),
    ("active_level", "Active Level"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("no candidate records")]
    Empty,

    #[error("candidate records are missing the '{0}' column")]
    MissingColumn(&'static str),
}

/// How a whole column renders to category strings
///
/// A column that is all integers with no gaps keeps integer digits. Numbers
/// mixed with floats or gaps are promoted as a float column, so integers gain
/// a trailing `.0`. Anything else renders cell by cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Mixed,
}

/// Column-addressable view over candidate documents
///
/// Columns are the union of all document fields in first-seen order. A
/// document lacking a field has an empty cell in that column.
#[derive(Debug, Clone)]
pub struct CandidateTable {
    index: HashMap<String, usize>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Vec<Option<Value>>>,
}

impl CandidateTable {
    /// Build a table from raw store documents, renaming fields to canonical columns
    pub fn from_documents(documents: Vec<Map<String, Value>>) -> Result<Self, TableError> {
        if documents.is_empty() {
            return Err(TableError::Empty);
        }

        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut sparse_rows = Vec::with_capacity(documents.len());

        for document in documents {
            let mut cells = Vec::with_capacity(document.len());
            for (field, value) in document {
                let name = canonical_name(&field);
                let position = *index.entry(name.clone()).or_insert_with(|| {
                    columns.push(name);
                    columns.len() - 1
                });
                cells.push((position, value));
            }
            sparse_rows.push(cells);
        }

        let rows: Vec<Vec<Option<Value>>> = sparse_rows
            .into_iter()
            .map(|cells| {
                let mut row = vec![None; columns.len()];
                for (position, value) in cells {
                    row[position] = Some(value);
                }
                row
            })
            .collect();

        let kinds = (0..columns.len())
            .map(|column| infer_kind(rows.iter().map(|row| row[column].as_ref())))
            .collect();

        let table = Self { index, kinds, rows };
        if table.column_index(ANIMAL_ID).is_none() {
            return Err(TableError::MissingColumn(ANIMAL_ID));
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column)).and_then(Option::as_ref)
    }

    pub fn column_kind(&self, column: usize) -> Option<ColumnKind> {
        self.kinds.get(column).copied()
    }

    /// Render a cell the way the encoders saw values at training time
    ///
    /// Strings are kept, booleans are `True`/`False` and empty cells are
    /// `nan`. Numbers follow their column's kind.
    pub fn category_key(&self, row: usize, column: usize) -> String {
        let kind = self.column_kind(column).unwrap_or(ColumnKind::Mixed);
        render_cell(self.cell(row, column), kind)
    }

    /// Candidate identities in table order. Missing ids come back as `null`.
    pub fn animal_ids(&self) -> Vec<Value> {
        let column = self.column_index(ANIMAL_ID);
        (0..self.len())
            .map(|row| {
                column
                    .and_then(|c| self.cell(row, c))
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect()
    }
}

fn canonical_name(field: &str) -> String {
    CANONICAL_COLUMNS
        .iter()
        .find(|(stored, _)| *stored == field)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| field.to_string())
}

fn infer_kind<'a>(cells: impl Iterator<Item = Option<&'a Value>>) -> ColumnKind {
    let mut numbers = 0usize;
    let mut promoted = false;

    for cell in cells {
        match cell {
            None | Some(Value::Null) => promoted = true,
            Some(Value::Number(n)) => {
                numbers += 1;
                if !(n.is_i64() || n.is_u64()) {
                    promoted = true;
                }
            }
            Some(_) => return ColumnKind::Mixed,
        }
    }

    match (numbers, promoted) {
        (0, _) => ColumnKind::Mixed,
        (_, false) => ColumnKind::Integer,
        (_, true) => ColumnKind::Float,
    }
}

fn render_cell(value: Option<&Value>, kind: ColumnKind) -> String {
    match value {
        None | Some(Value::Null) => "nan".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) if kind != ColumnKind::Float => i.to_string(),
            (None, Some(u)) if kind != ColumnKind::Float => u.to_string(),
            _ => render_float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Some(other) => other.to_string(),
    }
}

fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_canonical_renaming() {
        let table = CandidateTable::from_documents(vec![doc(json!({
            "animal_id": "A1", "species": "dog", "breed": "beagle",
            "age": 2, "weight": 12.5, "sex": "male", "active_level": "high", "_id": "x"
        }))])
        .unwrap();

        for column in ["Animal_ID", "Species", "Breed", "Age", "Weight", "Sex", "Active Level", "_id"] {
            assert!(table.column_index(column).is_some(), "missing {}", column);
        }
        assert!(table.column_index("species").is_none());
    }

    #[test]
    fn test_sparse_documents() {
        let table = CandidateTable::from_documents(vec![
            doc(json!({"animal_id": 1, "species": "cat"})),
            doc(json!({"animal_id": 2, "breed": "beagle"})),
        ])
        .unwrap();

        let species = table.column_index("Species").unwrap();
        let breed = table.column_index("Breed").unwrap();
        assert_eq!(table.cell(0, species), Some(&json!("cat")));
        assert_eq!(table.cell(1, species), None);
        assert_eq!(table.cell(0, breed), None);
        assert_eq!(table.animal_ids(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_empty_and_missing_id() {
        assert_eq!(CandidateTable::from_documents(vec![]).unwrap_err(), TableError::Empty);
        assert_eq!(
            CandidateTable::from_documents(vec![doc(json!({"species": "dog"}))]).unwrap_err(),
            TableError::MissingColumn(ANIMAL_ID)
        );
    }

    fn keys(table: &CandidateTable, name: &str) -> Vec<String> {
        let column = table.column_index(name).unwrap();
        (0..table.len()).map(|row| table.category_key(row, column)).collect()
    }

    #[test]
    fn test_category_key_rendering() {
        let table = CandidateTable::from_documents(vec![
            doc(json!({"animal_id": 1, "species": "dog", "age": 3, "weight": 3.0, "vaccinated": true})),
            doc(json!({"animal_id": 2, "species": null, "age": 4, "weight": 12.5, "vaccinated": false})),
        ])
        .unwrap();

        assert_eq!(keys(&table, "Animal_ID"), vec!["1", "2"]);
        assert_eq!(keys(&table, "Species"), vec!["dog", "nan"]);
        assert_eq!(keys(&table, "Age"), vec!["3", "4"]);
        assert_eq!(keys(&table, "Weight"), vec!["3.0", "12.5"]);
        assert_eq!(keys(&table, "vaccinated"), vec!["True", "False"]);
    }

    #[test]
    fn test_numeric_columns_with_floats_or_gaps_render_as_floats() {
        let table = CandidateTable::from_documents(vec![
            doc(json!({"animal_id": 1, "age": 2, "weight": 12})),
            doc(json!({"animal_id": 2, "weight": 12.5})),
        ])
        .unwrap();

        assert_eq!(table.column_kind(table.column_index("Weight").unwrap()), Some(ColumnKind::Float));
        assert_eq!(keys(&table, "Weight"), vec!["12.0", "12.5"]);
        assert_eq!(keys(&table, "Age"), vec!["2.0", "nan"]);
        assert_eq!(keys(&table, "Animal_ID"), vec!["1", "2"]);
    }

    #[test]
    fn test_mixed_columns_render_per_cell() {
        let table = CandidateTable::from_documents(vec![
            doc(json!({"animal_id": "A1", "age": 2})),
            doc(json!({"animal_id": "A2", "age": "young"})),
            doc(json!({"animal_id": "A3", "age": 1.0})),
        ])
        .unwrap();

        assert_eq!(table.column_kind(table.column_index("Age").unwrap()), Some(ColumnKind::Mixed));
        assert_eq!(keys(&table, "Age"), vec!["2", "young", "1.0"]);
    }
}
