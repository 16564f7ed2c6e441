use thiserror::Error;

// ---------------------------------------------------------------------------
// Extent – observed min / max of a numeric column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

/// Min and max of the finite values. Non-finite entries are skipped; `None`
/// when nothing finite is left.
pub fn min_max<I: IntoIterator<Item = f64>>(values: I) -> Option<Extent> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some(Extent { min: v, max: v }),
            Some(e) => Some(Extent {
                min: e.min.min(v),
                max: e.max.max(v),
            }),
        })
}

// ---------------------------------------------------------------------------
// PixelRange – target interval on the canvas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRange {
    pub min: f64,
    pub max: f64,
}

impl PixelRange {
    pub fn new(min: f64, max: f64) -> Self {
        PixelRange { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    #[cfg(test)]
    pub fn contains(&self, v: f64) -> bool {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        (lo..=hi).contains(&v)
    }
}

// ---------------------------------------------------------------------------
// LinearScale
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScaleError {
    #[error("degenerate domain: every value is {0}")]
    DegenerateDomain(f64),
    #[error("domain [{0}, {1}] is not finite")]
    NonFinite(f64, f64),
}

/// Linear map from a data domain onto a pixel range, unclamped.
///
/// The domain may run backwards (`domain_start > domain_end`), which is how
/// the y axis puts large values at the top of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range: PixelRange,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64, range: PixelRange) -> Result<Self, ScaleError> {
        if !domain_start.is_finite() || !domain_end.is_finite() {
            return Err(ScaleError::NonFinite(domain_start, domain_end));
        }
        if domain_start == domain_end {
            return Err(ScaleError::DegenerateDomain(domain_start));
        }
        Ok(LinearScale {
            domain_start,
            domain_end,
            range,
        })
    }

    /// Like [`LinearScale::new`], but a single-valued or non-finite domain
    /// maps every input to the middle of `range` instead of failing.
    pub fn new_or_centered(domain_start: f64, domain_end: f64, range: PixelRange) -> Self {
        let centre = match Self::new(domain_start, domain_end, range) {
            Ok(scale) => return scale,
            Err(ScaleError::DegenerateDomain(value)) => value,
            // A NaN centre would never compare equal to itself.
            Err(ScaleError::NonFinite(..)) => 0.0,
        };
        log::warn!("domain [{domain_start}, {domain_end}] has no span; centring on the range midpoint");
        LinearScale {
            domain_start: centre,
            domain_end: centre,
            range,
        }
    }

    #[cfg(test)]
    pub fn domain(&self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn is_degenerate(&self) -> bool {
        self.domain_start == self.domain_end
    }

    pub fn apply(&self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        if span == 0.0 {
            return self.range.midpoint();
        }
        self.range.min + (value - self.domain_start) / span * (self.range.max - self.range.min)
    }
}

/// Radius range used for population.
pub const RADIUS_RANGE: PixelRange = PixelRange { min: 3.0, max: 20.0 };

/// Population → point radius, fitted to `population` (the whole table, not a
/// single year, so sizes stay comparable across year changes).
pub fn radius_scale<I: IntoIterator<Item = f64>>(population: I, range: PixelRange) -> Option<LinearScale> {
    let extent = min_max(population)?;
    Some(LinearScale::new_or_centered(extent.min, extent.max, range))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn min_max_skips_non_finite() {
        let e = min_max([3.0, f64::NAN, -1.0, 7.5, f64::INFINITY]).unwrap();
        assert_eq!(e, Extent { min: -1.0, max: 7.5 });
        assert_eq!(min_max([f64::NAN]), None);
        assert_eq!(min_max(Vec::new()), None);
    }

    #[test]
    fn endpoints_map_exactly() {
        let cases = [
            (0.0, 10.0, 50.0, 750.0),
            (1.2, 7.8, 50.0, 550.0),
            (85.0, 30.0, 50.0, 550.0),
            (-4.0, 4.0, 3.0, 20.0),
        ];
        for (a, b, p, q) in cases {
            let s = LinearScale::new(a, b, PixelRange::new(p, q)).unwrap();
            assert!((s.apply(a) - p).abs() < EPS, "{a}->{p}");
            assert!((s.apply(b) - q).abs() < EPS, "{b}->{q}");
        }
    }

    #[test]
    fn interpolates_and_does_not_clamp() {
        let s = LinearScale::new(0.0, 10.0, PixelRange::new(0.0, 100.0)).unwrap();
        assert!((s.apply(2.5) - 25.0).abs() < EPS);
        assert!((s.apply(20.0) - 200.0).abs() < EPS);
        assert!((s.apply(-1.0) + 10.0).abs() < EPS);
    }

    #[test]
    fn inverted_domain_is_monotonically_decreasing() {
        // y axis: [max, min] → [top, bottom]
        let s = LinearScale::new(80.0, 30.0, PixelRange::new(50.0, 550.0)).unwrap();
        let outputs: Vec<f64> = (30..=80).map(|v| s.apply(v as f64)).collect();
        assert!(outputs.windows(2).all(|w| w[1] <= w[0]));
        assert!((s.apply(80.0) - 50.0).abs() < EPS);
    }

    #[test]
    fn degenerate_domain_is_an_error() {
        let range = PixelRange::new(50.0, 750.0);
        assert_eq!(
            LinearScale::new(2.0, 2.0, range),
            Err(ScaleError::DegenerateDomain(2.0))
        );
        assert!(matches!(
            LinearScale::new(f64::NAN, 2.0, range),
            Err(ScaleError::NonFinite(..))
        ));
    }

    #[test]
    fn degenerate_fallback_centres_everything() {
        let s = LinearScale::new_or_centered(2.0, 2.0, PixelRange::new(50.0, 750.0));
        assert!(s.is_degenerate());
        assert_eq!(s.apply(2.0), 400.0);
        assert_eq!(s.apply(99.0), 400.0);
    }

    #[test]
    fn non_finite_fallback_is_degenerate_and_centred() {
        let range = PixelRange::new(50.0, 750.0);
        for (a, b) in [(f64::NAN, 2.0), (1.0, f64::INFINITY), (f64::NAN, f64::NAN)] {
            let s = LinearScale::new_or_centered(a, b, range);
            assert!(s.is_degenerate(), "[{a}, {b}]");
            assert_eq!(s.apply(3.0), 400.0);
            assert_eq!(s.apply(f64::NAN), 400.0);
        }
    }

    #[test]
    fn radius_stays_within_range_over_domain() {
        let pops = [5.0, 10.0, 7.0];
        let s = radius_scale(pops, RADIUS_RANGE).unwrap();
        assert_eq!(s.domain(), (5.0, 10.0));
        assert!((s.apply(5.0) - 3.0).abs() < EPS);
        assert!((s.apply(10.0) - 20.0).abs() < EPS);
        for i in 0..=100 {
            let v = 5.0 + 5.0 * i as f64 / 100.0;
            assert!(RADIUS_RANGE.contains(s.apply(v)), "{v}");
        }
        // Outside the domain: no clamping, but no panic either.
        assert!(s.apply(1_000.0).is_finite());
    }
}
