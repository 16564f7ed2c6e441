use std::collections::HashSet;

use super::model::{DataTable, Row, Year};

// ---------------------------------------------------------------------------
// Year selection
// ---------------------------------------------------------------------------

/// Distinct `time` values in the order they first appear in the table.
pub fn distinct_years(table: &DataTable) -> Vec<Year> {
    let mut seen = HashSet::new();
    table
        .rows
        .iter()
        .map(Row::year)
        .filter(|year| seen.insert(year.clone()))
        .collect()
}

/// Year selected when a table is first shown.
///
/// The numeric minimum when every year reads as a number, otherwise the first
/// year in source order.
pub fn initial_year(years: &[Year]) -> Option<Year> {
    let numeric: Option<Vec<(f64, &Year)>> = years
        .iter()
        .map(|y| y.as_number().map(|n| (n, y)))
        .collect();

    match numeric {
        Some(pairs) => pairs
            .into_iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, y)| y.clone()),
        None => years.first().cloned(),
    }
}

// ---------------------------------------------------------------------------
// FilteredView – rows of one year
// ---------------------------------------------------------------------------

/// The rows of a [`DataTable`] whose `time` equals one year, in table order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub year: Year,
    pub rows: Vec<&'a Row>,
}

impl FilteredView<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Select the rows of `year`. Both sides are compared as trimmed text.
pub fn by_year<'a>(table: &'a DataTable, year: &Year) -> FilteredView<'a> {
    FilteredView {
        year: year.clone(),
        rows: table.rows.iter().filter(|row| row.year() == *year).collect(),
    }
}
