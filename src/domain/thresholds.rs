//! Screening thresholds.

pub const DEFAULT_ROCE_MIN: f64 = 13.0;
pub const DEFAULT_REVENUE_YOY_MIN: f64 = 15.0;
pub const DEFAULT_OP_INCOME_YOY_MIN: f64 = 10.0;

/// Minimum percentages a company must reach. Set once per run and shared
/// read-only by every evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub roce_min: f64,
    pub revenue_yoy_min: f64,
    pub op_income_yoy_min: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            roce_min: DEFAULT_ROCE_MIN,
            revenue_yoy_min: DEFAULT_REVENUE_YOY_MIN,
            op_income_yoy_min: DEFAULT_OP_INCOME_YOY_MIN,
        }
    }
}

impl Thresholds {
    pub fn passes_roce(&self, roce_pct: f64) -> bool {
        roce_pct >= self.roce_min
    }

    /// An unavailable growth figure never passes.
    pub fn passes_revenue_yoy(&self, yoy_pct: Option<f64>) -> bool {
        yoy_pct.is_some_and(|v| v >= self.revenue_yoy_min)
    }

    pub fn passes_op_income_yoy(&self, yoy_pct: Option<f64>) -> bool {
        yoy_pct.is_some_and(|v| v >= self.op_income_yoy_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let t = Thresholds::default();
        assert_eq!(t.roce_min, 13.0);
        assert_eq!(t.revenue_yoy_min, 15.0);
        assert_eq!(t.op_income_yoy_min, 10.0);
    }

    #[test]
    fn boundaries_are_inclusive() {
        let t = Thresholds::default();
        assert!(t.passes_roce(13.0));
        assert!(!t.passes_roce(12.999));
        assert!(t.passes_revenue_yoy(Some(15.0)));
        assert!(t.passes_op_income_yoy(Some(10.0)));
        assert!(!t.passes_op_income_yoy(Some(9.99)));
    }

    #[test]
    fn unavailable_growth_fails() {
        let t = Thresholds {
            roce_min: 0.0,
            revenue_yoy_min: -1000.0,
            op_income_yoy_min: -1000.0,
        };
        assert!(!t.passes_revenue_yoy(None));
        assert!(!t.passes_op_income_yoy(None));
    }

    #[test]
    fn nan_roce_fails() {
        assert!(!Thresholds::default().passes_roce(f64::NAN));
    }
}
