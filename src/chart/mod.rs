/// Chart layer: turns the rows of one year into canvas descriptors.
///
/// ```text
///   DataTable ──by_year──▶ FilteredView ──parse──▶ PlotRecords
///       │                                              │
///       │ population (all years)               AxisLimits
///       ▼                                              ▼
///   radius scale ─────────────▶ build_points ◀─── build_axes
///                                     │
///                                     ▼
///                                 PlotModel
/// ```

pub mod axes;
pub mod points;
pub mod scale;

use crate::data::filter::by_year;
use crate::data::model::{DataTable, Year, POP_MLNS};
use crate::settings::{Canvas, Settings};

use axes::{build_axes, AxisLimits, Axes};
use points::{build_points, parse_records, PointDescriptor, SkippedRow};
use scale::radius_scale;

// ---------------------------------------------------------------------------
// Page labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    Title,
    AxisLabel,
}

/// Static text drawn on the canvas. `(x, y)` is the centre of the text
/// unless `role` is `Title`, which is left-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: &'static str,
    pub x: f64,
    pub y: f64,
    /// Rotation in radians, clockwise.
    pub angle: f32,
    pub role: LabelRole,
}

pub const TITLE: &str = "Life Expectancy vs Fertility Rate";
pub const X_LABEL: &str = "Fertility Rates (Avg Children per Woman)";
pub const Y_LABEL: &str = "Life Expectancy (years)";

pub fn page_labels(canvas: &Canvas) -> Vec<TextLabel> {
    vec![
        TextLabel {
            text: TITLE,
            x: canvas.margin,
            y: canvas.margin * 0.6,
            angle: 0.0,
            role: LabelRole::Title,
        },
        TextLabel {
            text: X_LABEL,
            x: canvas.width / 2.0,
            y: canvas.height - canvas.margin * 0.2,
            angle: 0.0,
            role: LabelRole::AxisLabel,
        },
        TextLabel {
            text: Y_LABEL,
            x: canvas.margin * 0.3,
            y: canvas.height / 2.0,
            angle: -std::f32::consts::FRAC_PI_2,
            role: LabelRole::AxisLabel,
        },
    ]
}

// ---------------------------------------------------------------------------
// PlotModel – one full render pass
// ---------------------------------------------------------------------------

/// Everything drawn for one selected year. Rebuilt from scratch whenever the
/// year changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotModel {
    pub year: Year,
    pub canvas: Canvas,
    /// `None` when the year has no plottable rows.
    pub axes: Option<Axes>,
    pub points: Vec<PointDescriptor>,
    pub skipped: Vec<SkippedRow>,
    pub labels: Vec<TextLabel>,
    /// Human-readable notes about anything left out or degenerate.
    pub diagnostics: Vec<String>,
}

impl PlotModel {
    pub fn build(table: &DataTable, year: &Year, settings: &Settings) -> Self {
        let canvas = settings.canvas;
        let view = by_year(table, year);
        let mut diagnostics = Vec::new();

        let (records, skipped) = parse_records(&view);
        let limits = AxisLimits::from_records(&records);
        let radius = radius_scale(table.numbers(POP_MLNS), settings.radius_range());

        let (axes, points) = match (limits, radius) {
            (Some(limits), Some(radius)) => {
                let axes = build_axes(&limits, canvas.range_x(), canvas.range_y(), settings.tick_count);
                if axes.x_scale.is_degenerate() {
                    diagnostics.push(format!("every fertility rate in {year} is {}", limits.x_min));
                }
                if axes.y_scale.is_degenerate() {
                    diagnostics.push(format!("every life expectancy in {year} is {}", limits.y_min));
                }
                let points = build_points(&records, &axes.x_scale, &axes.y_scale, &radius);
                (Some(axes), points)
            }
            _ if view.is_empty() => {
                diagnostics.push(format!("no rows for {year}"));
                (None, Vec::new())
            }
            _ => {
                diagnostics.push(format!("no plottable rows for {year}"));
                (None, Vec::new())
            }
        };

        if !skipped.is_empty() {
            diagnostics.push(format!(
                "{} of {} rows skipped (unparsable numbers)",
                skipped.len(),
                view.len()
            ));
        }

        log::debug!(
            "Rendered {year}: {} points, {} skipped",
            points.len(),
            skipped.len()
        );

        PlotModel {
            year: year.clone(),
            canvas,
            axes,
            points,
            skipped,
            labels: page_labels(&canvas),
            diagnostics,
        }
    }

    /// Topmost point under canvas position `(x, y)`. Later points are drawn
    /// on top, so the search runs backwards.
    pub fn point_at(&self, x: f64, y: f64) -> Option<usize> {
        self.points.iter().rposition(|p| p.hit(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::scale::RADIUS_RANGE;
    use crate::data::model::tests::{country, table};

    fn sample() -> DataTable {
        table(vec![
            country("A", "1960", "2", "40", "5"),
            country("B", "1960", "6", "70", "10"),
            country("C", "1961", "3", "60", "7"),
            country("D", "1961", "", "50", "200"),
        ])
    }

    #[test]
    fn builds_points_inside_the_canvas() {
        let settings = Settings::default();
        let model = PlotModel::build(&sample(), &Year::from(1960), &settings);

        assert_eq!(model.points.len(), 2);
        assert!(model.axes.is_some());
        assert!(model.diagnostics.is_empty());
        assert_eq!(model.labels.len(), 3);

        let a = &model.points[0];
        assert_eq!((a.x, a.y), (50.0, 550.0));
        let b = &model.points[1];
        assert_eq!((b.x, b.y), (750.0, 50.0));
    }

    #[test]
    fn radius_domain_spans_every_year() {
        let model = PlotModel::build(&sample(), &Year::from(1960), &Settings::default());
        // Population domain is 5..200 across both years, not 5..10.
        assert_eq!(model.points[0].r, RADIUS_RANGE.min);
        assert!(model.points[1].r < 4.0);
    }

    #[test]
    fn unparsable_rows_are_reported() {
        let model = PlotModel::build(&sample(), &Year::from(1961), &Settings::default());
        assert_eq!(model.points.len(), 1);
        assert_eq!(model.skipped.len(), 1);
        assert_eq!(model.skipped[0].country, "D");
        // One degenerate note per axis plus the skipped-row count.
        assert_eq!(model.diagnostics.len(), 3);
        assert!(model.diagnostics[2].starts_with("1 of 2 rows skipped"));
    }

    #[test]
    fn single_point_is_centred() {
        let model = PlotModel::build(&sample(), &Year::from(1961), &Settings::default());
        let p = &model.points[0];
        assert_eq!((p.x, p.y), (400.0, 300.0));
    }

    #[test]
    fn unknown_year_renders_empty_with_diagnostic() {
        let model = PlotModel::build(&sample(), &Year::from(1999), &Settings::default());
        assert!(model.axes.is_none());
        assert!(model.points.is_empty());
        assert_eq!(model.diagnostics, vec!["no rows for 1999".to_string()]);
    }

    #[test]
    fn year_with_only_bad_rows_lists_each_once() {
        let t = table(vec![
            country("A", "1960", "x", "40", "5"),
            country("B", "1960", "2", "", "5"),
            country("C", "1961", "3", "60", "7"),
        ]);
        let model = PlotModel::build(&t, &Year::from(1960), &Settings::default());
        assert!(model.axes.is_none());
        assert!(model.points.is_empty());
        let names: Vec<&str> = model.skipped.iter().map(|s| s.country.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(
            model.diagnostics,
            vec![
                "no plottable rows for 1960".to_string(),
                "2 of 2 rows skipped (unparsable numbers)".to_string(),
            ]
        );
    }

    #[test]
    fn point_at_prefers_topmost() {
        let t = table(vec![
            country("Under", "1960", "2", "40", "5"),
            country("Over", "1960", "2", "40", "5"),
            country("Far", "1960", "6", "70", "10"),
        ]);
        let model = PlotModel::build(&t, &Year::from(1960), &Settings::default());
        let hit = model.point_at(50.0, 550.0).unwrap();
        assert_eq!(model.points[hit].tooltip.country, "Over");
        assert_eq!(model.point_at(400.0, 300.0), None);
    }
}
