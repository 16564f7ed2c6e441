use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const TIME: &str = "time";
pub const LOCATION: &str = "location";
pub const FERTILITY_RATE: &str = "fertility_rate";
pub const LIFE_EXPECTANCY: &str = "life_expectancy";
pub const POP_MLNS: &str = "pop_mlns";

/// Columns every loaded table must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [TIME, LOCATION, FERTILITY_RATE, LIFE_EXPECTANCY, POP_MLNS];

// ---------------------------------------------------------------------------
// ParseError – a numeric cell that cannot be used
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("column '{column}' is missing")]
    Missing { column: String },
    #[error("column '{column}' is empty")]
    Empty { column: String },
    #[error("column '{column}': '{text}' is not a number")]
    Invalid { column: String, text: String },
    #[error("column '{column}': '{text}' is not finite")]
    NotFinite { column: String, text: String },
}

/// Parse a raw cell as a finite `f64`.
pub fn parse_number(column: &str, text: &str) -> Result<f64, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty {
            column: column.to_string(),
        });
    }
    let value: f64 = trimmed.parse().map_err(|_| ParseError::Invalid {
        column: column.to_string(),
        text: trimmed.to_string(),
    })?;
    // "NaN" and "inf" parse fine in Rust but would poison every extent.
    if !value.is_finite() {
        return Err(ParseError::NotFinite {
            column: column.to_string(),
            text: trimmed.to_string(),
        });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Row – one line of the source table
// ---------------------------------------------------------------------------

/// A single source row: column name → raw text. Numeric parsing is left to
/// consumers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub fields: BTreeMap<String, String>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Raw text of a column, empty when absent.
    pub fn text(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn number(&self, column: &str) -> Result<f64, ParseError> {
        let text = self.get(column).ok_or_else(|| ParseError::Missing {
            column: column.to_string(),
        })?;
        parse_number(column, text)
    }

    pub fn year(&self) -> Year {
        Year::new(self.text(TIME))
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Year – the `time` value used for selection
// ---------------------------------------------------------------------------

/// A year as it appears in the `time` column. Stored trimmed so that
/// `" 1960"` and `"1960"` select the same rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Year(String);

impl Year {
    pub fn new(text: &str) -> Self {
        Year(text.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric reading of the year, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Year {
    fn from(text: &str) -> Self {
        Year::new(text)
    }
}

impl From<i64> for Year {
    fn from(value: i64) -> Self {
        Year(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// DataTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All rows of one source file, in file order.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    /// Header names in source order.
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl DataTable {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        DataTable { headers, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parsed values of one numeric column across every row, unparsable
    /// cells dropped.
    pub fn numbers<'a>(&'a self, column: &'a str) -> impl Iterator<Item = f64> + 'a {
        self.rows.iter().filter_map(move |row| row.number(column).ok())
    }
}

// ---------------------------------------------------------------------------
// PlotRecord – a row whose numeric fields all parsed
// ---------------------------------------------------------------------------

/// The numeric view of a [`Row`] the chart consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRecord<'a> {
    pub row: &'a Row,
    pub fertility_rate: f64,
    pub life_expectancy: f64,
    pub pop_mlns: f64,
}

impl<'a> PlotRecord<'a> {
    pub fn from_row(row: &'a Row) -> Result<Self, ParseError> {
        Ok(PlotRecord {
            row,
            fertility_rate: row.number(FERTILITY_RATE)?,
            life_expectancy: row.number(LIFE_EXPECTANCY)?,
            pop_mlns: row.number(POP_MLNS)?,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a row with the five pipeline columns.
    pub(crate) fn country(location: &str, time: &str, fertility: &str, life: &str, pop: &str) -> Row {
        [
            (LOCATION, location),
            (TIME, time),
            (FERTILITY_RATE, fertility),
            (LIFE_EXPECTANCY, life),
            (POP_MLNS, pop),
        ]
        .into_iter()
        .collect()
    }

    pub(crate) fn table(rows: Vec<Row>) -> DataTable {
        DataTable::new(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        )
    }

    #[test]
    fn parse_number_trims_and_rejects_garbage() {
        assert_eq!(parse_number("x", " 2.5 "), Ok(2.5));
        assert!(matches!(parse_number("x", ""), Err(ParseError::Empty { .. })));
        assert!(matches!(parse_number("x", "  "), Err(ParseError::Empty { .. })));
        assert!(matches!(parse_number("x", "abc"), Err(ParseError::Invalid { .. })));
        assert!(matches!(parse_number("x", "NaN"), Err(ParseError::NotFinite { .. })));
        assert!(matches!(parse_number("x", "inf"), Err(ParseError::NotFinite { .. })));
    }

    #[test]
    fn row_number_reports_missing_column() {
        let row: Row = [(LOCATION, "Chad")].into_iter().collect();
        assert_eq!(
            row.number(POP_MLNS),
            Err(ParseError::Missing {
                column: POP_MLNS.to_string()
            })
        );
    }

    #[test]
    fn year_is_trimmed() {
        assert_eq!(Year::new(" 1960 "), Year::from(1960));
        assert_eq!(Year::new("1960").as_number(), Some(1960.0));
        assert_eq!(Year::new("early").as_number(), None);
    }

    #[test]
    fn plot_record_needs_all_three_numbers() {
        let ok = country("Peru", "1960", "6.9", "47.7", "10.1");
        let rec = PlotRecord::from_row(&ok).unwrap();
        assert_eq!(rec.fertility_rate, 6.9);
        assert_eq!(rec.pop_mlns, 10.1);

        let bad = country("Peru", "1960", "", "47.7", "10.1");
        assert!(PlotRecord::from_row(&bad).is_err());
    }

    #[test]
    fn numbers_skips_unparsable_cells() {
        let t = table(vec![
            country("A", "1960", "1", "50", "5"),
            country("B", "1960", "1", "50", ""),
            country("C", "1961", "1", "50", "7"),
        ]);
        let pops: Vec<f64> = t.numbers(POP_MLNS).collect();
        assert_eq!(pops, vec![5.0, 7.0]);
    }
}
