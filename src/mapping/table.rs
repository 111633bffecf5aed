//! Binding per-element records into a row-oriented table.

use crate::error::{Error, Result};
use crate::extractor::{Args, Extractor};
use crate::value::{List, NameMap, Value};

use super::call_at;

/// What to do when rows carry different field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillPolicy {
    /// Columns are the union of names in first-seen order; absent fields are null.
    #[default]
    Null,
    /// Every row must carry exactly the names of the first row.
    Strict,
}

/// Options for [`map_table_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableOptions {
    fill: FillPolicy,
}

impl TableOptions {
    /// Creates the default options (union of names, null fill).
    pub const fn new() -> Self {
        Self {
            fill: FillPolicy::Null,
        }
    }

    /// Sets the fill policy.
    #[must_use]
    pub const fn with_fill(mut self, fill: FillPolicy) -> Self {
        self.fill = fill;
        self
    }

    /// Returns the fill policy.
    pub const fn fill(&self) -> FillPolicy {
        self.fill
    }
}

/// A row-oriented table: named columns, one row per input element.
///
/// # Examples
///
/// ```rust
/// use listwise::{Function, List, Value, map_table};
///
/// let people = List::from_values([Value::from("ada"), Value::from("alan")]);
/// let describe = Function::unary(|name| {
///     let length = name.as_text().map_or(0, str::len) as i64;
///     Ok(Value::from(List::from_named([("name", name.clone()), ("length", Value::from(length))])))
/// });
///
/// let table = map_table(&people, describe).unwrap();
/// assert_eq!(table.columns(), &["name".to_string(), "length".to_string()]);
/// assert_eq!(table.cell(1, "length"), Some(&Value::from(4)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Returns the column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the rows; each row has one cell per column.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the cell at `row` in column `column`.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let position = self.columns.iter().position(|name| name == column)?;
        self.rows.get(row)?.get(position)
    }

    /// Returns row `row` as a named list.
    pub fn row(&self, row: usize) -> Option<List> {
        let cells = self.rows.get(row)?;
        Some(List::from_named(self.columns.iter().cloned().zip(cells.iter().cloned())))
    }

    /// Returns column `column` as an unnamed list.
    pub fn column(&self, column: &str) -> Option<List> {
        let position = self.columns.iter().position(|name| name == column)?;
        Some(self.rows.iter().map(|cells| cells[position].clone()).collect())
    }

    /// Converts the table into an unnamed list of named row lists.
    pub fn into_list(self) -> List {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|cells| Value::from(List::from_named(columns.iter().cloned().zip(cells))))
            .collect()
    }
}

/// [`map_table_with`] using the default [`TableOptions`].
///
/// # Errors
///
/// See [`map_table_with`].
pub fn map_table(list: &List, extractor: impl Into<Extractor>) -> Result<Table> {
    map_table_with(list, extractor, &TableOptions::default())
}

/// Applies `extractor` to every element and binds the results as table rows.
///
/// Every result must be a list whose children are all named, with unique
/// names. Rows are checked as they are produced, so the first offending row
/// is reported.
///
/// # Errors
///
/// - [`Error::TableShape`] for a result that is not a fully and uniquely
///   named list, or (under [`FillPolicy::Strict`]) whose names differ from
///   the first row
/// - the first element failure, wrapped with its index
pub fn map_table_with(
    list: &List,
    extractor: impl Into<Extractor>,
    options: &TableOptions,
) -> Result<Table> {
    let extractor = extractor.into();
    let evaluate = extractor.evaluator();
    let mut columns: Vec<String> = Vec::new();
    let mut positions: NameMap<String, usize> = NameMap::default();
    let mut records = Vec::with_capacity(list.len());

    for (index, element) in list.iter().enumerate() {
        let value = call_at(&evaluate, index, Args::one(element.clone()))?;
        let record = check_row(index, value)?;

        if options.fill() == FillPolicy::Strict && index > 0 {
            let matches = record.len() == columns.len()
                && record
                    .entries()
                    .all(|(name, _)| name.is_some_and(|name| positions.contains_key(name)));
            if !matches {
                return Err(Error::TableShape {
                    row: index,
                    reason: format!("names differ from the first row {columns:?}"),
                });
            }
        }
        for (name, _) in record.entries() {
            let name = name.unwrap_or_default();
            if !positions.contains_key(name) {
                positions.insert(name.to_string(), columns.len());
                columns.push(name.to_string());
            }
        }
        records.push(record);
    }

    let rows = records
        .iter()
        .map(|record| {
            let mut cells = vec![Value::null(); columns.len()];
            for (name, value) in record.entries() {
                if let Some(&position) = name.and_then(|name| positions.get(name)) {
                    cells[position] = value.clone();
                }
            }
            cells
        })
        .collect();

    Ok(Table { columns, rows })
}

fn check_row(index: usize, value: Value) -> Result<List> {
    let Value::List(record) = value else {
        return Err(Error::TableShape {
            row: index,
            reason: format!("expected a named list, found {}", value.type_name()),
        });
    };
    if !record.is_empty() && !record.is_fully_named() {
        return Err(Error::TableShape {
            row: index,
            reason: "every field must be named".to_string(),
        });
    }
    let mut seen: NameMap<&str, ()> = NameMap::default();
    for (name, _) in record.entries() {
        let name = name.unwrap_or_default();
        if seen.insert(name, ()).is_some() {
            return Err(Error::TableShape {
                row: index,
                reason: format!("duplicate field `{name}`"),
            });
        }
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::extractor::Function;
    use rstest::rstest;

    fn records() -> List {
        List::from_values([
            Value::from(List::from_named([("a", 1), ("b", 2)])),
            Value::from(List::from_named([("b", 3), ("c", 4)])),
        ])
    }

    fn identity() -> Function {
        Function::unary(|value| Ok(value.clone()))
    }

    #[rstest]
    fn test_union_of_names_with_null_fill() {
        let table = map_table(&records(), identity()).unwrap();
        assert_eq!(table.columns(), &["a", "b", "c"]);
        assert_eq!(
            table.rows(),
            &[
                vec![Value::from(1), Value::from(2), Value::null()],
                vec![Value::null(), Value::from(3), Value::from(4)],
            ]
        );
        assert_eq!(
            table.row(1),
            Some(List::from_named([
                ("a", Value::null()),
                ("b", Value::from(3)),
                ("c", Value::from(4)),
            ]))
        );
        assert_eq!(table.column("b"), Some(List::from_values([Value::from(2), Value::from(3)])));
    }

    #[rstest]
    fn test_strict_rejects_different_names() {
        let options = TableOptions::new().with_fill(FillPolicy::Strict);
        let error = map_table_with(&records(), identity(), &options).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableShape);
        assert_eq!(error.index(), Some(1));
    }

    #[rstest]
    fn test_strict_accepts_reordered_names() {
        let list = List::from_values([
            Value::from(List::from_named([("a", 1), ("b", 2)])),
            Value::from(List::from_named([("b", 3), ("a", 4)])),
        ]);
        let options = TableOptions::new().with_fill(FillPolicy::Strict);
        let table = map_table_with(&list, identity(), &options).unwrap();
        assert_eq!(table.cell(1, "a"), Some(&Value::from(4)));
    }

    #[rstest]
    #[case(Value::from(1), "expected a named list, found int")]
    #[case(Value::from(List::from_values([Value::from(1)])), "every field must be named")]
    #[case(Value::from(List::from_named([("a", 1), ("a", 2)])), "duplicate field `a`")]
    fn test_malformed_rows(#[case] row: Value, #[case] reason: &str) {
        let list = List::from_values([row]);
        assert_eq!(
            map_table(&list, identity()).unwrap_err(),
            Error::TableShape {
                row: 0,
                reason: reason.to_string(),
            }
        );
    }

    #[rstest]
    fn test_into_list_round_trips_rows() {
        let list = List::from_values([Value::from(List::from_named([("x", 1)]))]);
        let table = map_table(&list, identity()).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.into_list(), list);
    }
}
