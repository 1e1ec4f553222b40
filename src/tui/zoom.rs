//! Preview zoom level, kept as an integer percentage so repeated steps don't drift.

/// Zoom factor a session starts at
pub const DEFAULT_ZOOM: f64 = 0.4;
pub const DEFAULT_ZOOM_PERCENT: u16 = 40;

const ZOOM_STEP_PERCENT: u16 = 10;
const MIN_ZOOM_PERCENT: u16 = 10;
const MAX_ZOOM_PERCENT: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoom {
    percent: u16,
    initial: u16,
}

impl Zoom {
    /// Creates a zoom level from a factor (1.0 = 100%), clamped to the supported range
    pub fn from_factor(factor: f64) -> Self {
        let percent = if factor.is_finite() {
            (factor * 100.0)
                .round()
                .clamp(MIN_ZOOM_PERCENT as f64, MAX_ZOOM_PERCENT as f64) as u16
        } else {
            DEFAULT_ZOOM_PERCENT
        };
        Self {
            percent,
            initial: percent,
        }
    }

    pub fn percent(&self) -> u16 {
        self.percent
    }

    pub fn factor(&self) -> f64 {
        self.percent as f64 / 100.0
    }

    /// Returns true if the level changed
    pub fn zoom_in(&mut self) -> bool {
        let next = (self.percent + ZOOM_STEP_PERCENT).min(MAX_ZOOM_PERCENT);
        self.set(next)
    }

    /// Returns true if the level changed
    pub fn zoom_out(&mut self) -> bool {
        let next = self
            .percent
            .saturating_sub(ZOOM_STEP_PERCENT)
            .max(MIN_ZOOM_PERCENT);
        self.set(next)
    }

    /// Back to the level the zoom was created with
    pub fn reset(&mut self) -> bool {
        self.set(self.initial)
    }

    fn set(&mut self, percent: u16) -> bool {
        let changed = percent != self.percent;
        self.percent = percent;
        changed
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::from_factor(DEFAULT_ZOOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zoom() {
        let zoom = Zoom::default();
        assert_eq!(zoom.percent(), DEFAULT_ZOOM_PERCENT);
        assert!((zoom.factor() - DEFAULT_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_steps() {
        let mut zoom = Zoom::default();
        assert!(zoom.zoom_in());
        assert_eq!(zoom.percent(), 50);
        assert!(zoom.zoom_out());
        assert!(zoom.zoom_out());
        assert_eq!(zoom.percent(), 30);
    }

    #[test]
    fn test_zoom_clamps_at_bounds() {
        let mut zoom = Zoom::from_factor(0.1);
        assert!(!zoom.zoom_out());
        assert_eq!(zoom.percent(), 10);

        let mut zoom = Zoom::from_factor(5.0);
        assert!(!zoom.zoom_in());
        assert_eq!(zoom.percent(), 500);
    }

    #[test]
    fn test_zoom_many_steps_do_not_drift() {
        let mut zoom = Zoom::default();
        for _ in 0..100 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.percent(), 500);
        for _ in 0..100 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.percent(), 10);
    }

    #[test]
    fn test_zoom_reset_returns_to_initial() {
        let mut zoom = Zoom::from_factor(1.0);
        zoom.zoom_in();
        zoom.zoom_in();
        assert!(zoom.reset());
        assert_eq!(zoom.percent(), 100);
        assert!(!zoom.reset());
    }

    #[test]
    fn test_from_factor_out_of_range() {
        assert_eq!(Zoom::from_factor(0.0).percent(), 10);
        assert_eq!(Zoom::from_factor(42.0).percent(), 500);
        assert_eq!(Zoom::from_factor(f64::NAN).percent(), DEFAULT_ZOOM_PERCENT);
    }
}
