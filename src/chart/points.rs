use crate::data::filter::FilteredView;
use crate::data::model::{ParseError, PlotRecord, FERTILITY_RATE, LIFE_EXPECTANCY, LOCATION};

use super::scale::LinearScale;

// ---------------------------------------------------------------------------
// Population formatting
// ---------------------------------------------------------------------------

/// Round to an integer and group thousands with commas: `1234500.2` →
/// `"1,234,500"`. Works on the `f64` digits, so there is no integer ceiling.
pub fn format_with_commas(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Tooltip payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipPayload {
    pub country: String,
    pub year: String,
    /// Source text, not re-formatted.
    pub fertility_rate: String,
    /// Source text, not re-formatted.
    pub life_expectancy: String,
    pub population_formatted: String,
}

impl TooltipPayload {
    pub fn from_record(record: &PlotRecord<'_>) -> Self {
        let row = record.row;
        TooltipPayload {
            country: row.text(LOCATION).to_string(),
            year: row.year().to_string(),
            fertility_rate: row.text(FERTILITY_RATE).trim().to_string(),
            life_expectancy: row.text(LIFE_EXPECTANCY).trim().to_string(),
            population_formatted: format_with_commas(record.pop_mlns * 1_000_000.0),
        }
    }

    /// Label/value lines with the values aligned in one column.
    pub fn lines(&self) -> [String; 5] {
        [
            format!("Country:         {}", self.country),
            format!("Year:            {}", self.year),
            format!("Fertility Rate:  {}", self.fertility_rate),
            format!("Life Expectancy: {}", self.life_expectancy),
            format!("Population:      {}", self.population_formatted),
        ]
    }

    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

// ---------------------------------------------------------------------------
// Point descriptors
// ---------------------------------------------------------------------------

/// One row placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PointDescriptor {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub tooltip: TooltipPayload,
}

impl PointDescriptor {
    /// Whether canvas position `(px, py)` falls inside the circle.
    pub fn hit(&self, px: f64, py: f64) -> bool {
        let dx = px - self.x;
        let dy = py - self.y;
        dx * dx + dy * dy <= self.r * self.r
    }
}

/// A row left off the plot because one of its numbers did not parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub country: String,
    pub error: ParseError,
}

/// Split a view into parsed records and the rows that failed to parse.
pub fn parse_records<'a>(view: &FilteredView<'a>) -> (Vec<PlotRecord<'a>>, Vec<SkippedRow>) {
    let mut records = Vec::with_capacity(view.len());
    let mut skipped = Vec::new();
    for &row in &view.rows {
        match PlotRecord::from_row(row) {
            Ok(record) => records.push(record),
            Err(error) => {
                log::debug!("Skipping '{}' in {}: {error}", row.text(LOCATION), view.year);
                skipped.push(SkippedRow {
                    country: row.text(LOCATION).to_string(),
                    error,
                });
            }
        }
    }
    (records, skipped)
}

/// One descriptor per record, in input order. Overlaps are left as is.
pub fn build_points(
    records: &[PlotRecord<'_>],
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    radius_scale: &LinearScale,
) -> Vec<PointDescriptor> {
    records
        .iter()
        .map(|rec| PointDescriptor {
            x: x_scale.apply(rec.fertility_rate),
            y: y_scale.apply(rec.life_expectancy),
            r: radius_scale.apply(rec.pop_mlns),
            tooltip: TooltipPayload::from_record(rec),
        })
        .collect()
}
