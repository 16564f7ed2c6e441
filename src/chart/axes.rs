use crate::data::model::PlotRecord;

use super::scale::{min_max, LinearScale, PixelRange};

// ---------------------------------------------------------------------------
// AxisLimits – data extent of the current year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AxisLimits {
    /// Fertility (x) and life expectancy (y) extents over parsed records.
    /// `None` when there are no records.
    pub fn from_records(records: &[PlotRecord<'_>]) -> Option<Self> {
        let x = min_max(records.iter().map(|r| r.fertility_rate))?;
        let y = min_max(records.iter().map(|r| r.life_expectancy))?;
        Some(AxisLimits {
            x_min: x.min,
            x_max: x.max,
            y_min: y.min,
            y_max: y.max,
        })
    }
}

// ---------------------------------------------------------------------------
// Ticks
// ---------------------------------------------------------------------------

/// Power of ten and 1/2/5/10 factor of the nice step over `[start, stop]`.
fn step_parts(start: f64, stop: f64, count: usize) -> (i32, f64) {
    let raw = (stop - start).abs() / count.max(1) as f64;
    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    (power as i32, factor)
}

/// Step between "nice" ticks (1, 2 or 5 × 10ᵏ) giving roughly `count` ticks
/// over `[start, stop]`.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let (power, factor) = step_parts(start, stop, count);
    factor * 10f64.powi(power)
}

/// Tick values on multiples of [`tick_step`] inside `[min, max]`, ends
/// included when they fall on a multiple.
///
/// Fractional steps are handled through their integer inverse (`0.1` → 10
/// ticks per unit) so that `i / inverse` lands on the decimal value exactly.
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min >= max {
        return vec![min];
    }
    let (power, factor) = step_parts(min, max, count);
    if power < 0 {
        let inverse = 10f64.powi(-power) / factor;
        let mut first = (min * inverse).round() as i64;
        let mut last = (max * inverse).round() as i64;
        if (first as f64) / inverse < min {
            first += 1;
        }
        if (last as f64) / inverse > max {
            last -= 1;
        }
        (first..=last).map(|i| i as f64 / inverse).collect()
    } else {
        let step = factor * 10f64.powi(power);
        let mut first = (min / step).round() as i64;
        let mut last = (max / step).round() as i64;
        if (first as f64) * step < min {
            first += 1;
        }
        if (last as f64) * step > max {
            last -= 1;
        }
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

fn decimals_for(step: f64) -> usize {
    if step <= 0.0 || !step.is_finite() {
        return 0;
    }
    (-step.log10().floor()).max(0.0) as usize
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Pixel coordinate along the axis.
    pub position: f64,
    pub label: String,
}

fn ticks_for(scale: &LinearScale, min: f64, max: f64, count: usize) -> Vec<Tick> {
    if scale.is_degenerate() {
        return vec![Tick {
            value: min,
            position: scale.apply(min),
            label: format!("{min}"),
        }];
    }
    let decimals = decimals_for(tick_step(min, max, count));
    nice_ticks(min, max, count)
        .into_iter()
        .map(|value| Tick {
            value,
            position: scale.apply(value),
            label: format!("{value:.decimals$}"),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Axis descriptors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Horizontal line, ticks hanging below.
    Bottom,
    /// Vertical line, ticks to the left.
    Left,
}

/// Everything needed to draw one axis line with its ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisDescriptor {
    pub orientation: Orientation,
    /// Fixed coordinate of the axis line: y for `Bottom`, x for `Left`.
    pub anchor: f64,
    /// Extent of the line along its own direction.
    pub span: PixelRange,
    pub ticks: Vec<Tick>,
}

/// Scales plus axis descriptors for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub x_axis: AxisDescriptor,
    pub y_axis: AxisDescriptor,
}

/// Build both axes. The y domain is inverted so larger values sit nearer the
/// top of the canvas.
pub fn build_axes(limits: &AxisLimits, range_x: PixelRange, range_y: PixelRange, tick_count: usize) -> Axes {
    let x_scale = LinearScale::new_or_centered(limits.x_min, limits.x_max, range_x);
    let y_scale = LinearScale::new_or_centered(limits.y_max, limits.y_min, range_y);

    let x_axis = AxisDescriptor {
        orientation: Orientation::Bottom,
        anchor: range_y.max,
        span: range_x,
        ticks: ticks_for(&x_scale, limits.x_min, limits.x_max, tick_count),
    };
    let y_axis = AxisDescriptor {
        orientation: Orientation::Left,
        anchor: range_x.min,
        span: range_y,
        ticks: ticks_for(&y_scale, limits.y_min, limits.y_max, tick_count),
    };

    Axes {
        x_scale,
        y_scale,
        x_axis,
        y_axis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::country;

    fn ranges() -> (PixelRange, PixelRange) {
        (PixelRange::new(50.0, 750.0), PixelRange::new(50.0, 550.0))
    }

    #[test]
    fn limits_exclude_unparsable_rows() {
        let rows = [
            country("A", "1960", "2.0", "60", "5"),
            country("B", "1960", "", "90", "5"),
            country("C", "1960", "6.5", "40", "5"),
        ];
        let records: Vec<_> = rows
            .iter()
            .filter_map(|r| PlotRecord::from_row(r).ok())
            .collect();
        let limits = AxisLimits::from_records(&records).unwrap();
        assert_eq!(
            limits,
            AxisLimits {
                x_min: 2.0,
                x_max: 6.5,
                y_min: 40.0,
                y_max: 60.0
            }
        );
        assert!(!limits.x_min.is_nan() && !limits.x_max.is_nan());
    }

    #[test]
    fn limits_of_nothing() {
        assert_eq!(AxisLimits::from_records(&[]), None);
    }

    #[test]
    fn tick_steps_are_nice() {
        assert_eq!(tick_step(0.0, 10.0, 10), 1.0);
        assert_eq!(tick_step(0.0, 100.0, 10), 10.0);
        assert_eq!(tick_step(1.2, 7.8, 10), 0.5);
        assert_eq!(tick_step(30.0, 80.0, 10), 5.0);
        assert_eq!(nice_ticks(1.2, 3.9, 5), vec![1.5, 2.0, 2.5, 3.0, 3.5]);
        assert_eq!(nice_ticks(30.0, 80.0, 10), vec![
            30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0
        ]);
    }

    #[test]
    fn ticks_keep_both_ends_on_decimal_steps() {
        let ticks = nice_ticks(1.1, 2.3, 10);
        assert_eq!(ticks.len(), 13);
        assert_eq!(ticks[0], 1.1);
        assert_eq!(ticks[1], 1.2);
        assert_eq!(ticks[12], 2.3);

        let ticks = nice_ticks(0.3, 0.9, 6);
        assert_eq!(ticks, vec![0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]);
    }

    #[test]
    fn axes_are_anchored_bottom_and_left() {
        let (rx, ry) = ranges();
        let limits = AxisLimits {
            x_min: 1.0,
            x_max: 8.0,
            y_min: 30.0,
            y_max: 80.0,
        };
        let axes = build_axes(&limits, rx, ry, 10);

        assert_eq!(axes.x_axis.orientation, Orientation::Bottom);
        assert_eq!(axes.x_axis.anchor, 550.0);
        assert_eq!(axes.y_axis.orientation, Orientation::Left);
        assert_eq!(axes.y_axis.anchor, 50.0);

        // Larger life expectancy is nearer the top.
        assert_eq!(axes.y_scale.apply(80.0), 50.0);
        assert_eq!(axes.y_scale.apply(30.0), 550.0);

        for tick in &axes.x_axis.ticks {
            assert!(rx.contains(tick.position));
        }
        let labels: Vec<&str> = axes.y_axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"30"));
        assert_eq!(labels.last(), Some(&"80"));
    }

    #[test]
    fn degenerate_axis_gets_a_single_centred_tick() {
        let (rx, ry) = ranges();
        let limits = AxisLimits {
            x_min: 2.0,
            x_max: 2.0,
            y_min: 30.0,
            y_max: 80.0,
        };
        let axes = build_axes(&limits, rx, ry, 10);
        assert!(axes.x_scale.is_degenerate());
        assert_eq!(axes.x_axis.ticks.len(), 1);
        assert_eq!(axes.x_axis.ticks[0].position, 400.0);
        assert_eq!(axes.x_scale.apply(2.0), 400.0);
    }
}
