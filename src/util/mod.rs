use anyhow::Result;
use tracing_subscriber::fmt::time::OffsetTime;

pub mod assert;
pub mod collision;
pub mod linalg;
pub mod log;

pub mod gg_float {
    use crate::util::linalg::Vec2;
    use num_traits::Zero;

    pub trait GgFloat {
        fn is_finite(&self) -> bool;
    }

    impl GgFloat for Vec2 {
        fn is_finite(&self) -> bool {
            self.x.is_finite() && self.y.is_finite()
        }
    }

    pub fn force_positive_zero(x: f32) -> f32 {
        if x.is_zero() { 0.0 } else { x }
    }
}

pub mod gg_range {
    use std::ops::Range;

    /// Signed distance between two projected intervals. Non-negative means the intervals are
    /// disjoint (or just touching); negative means they overlap by that amount.
    ///
    /// The branch is chosen by comparing the interval starts, so for two non-empty intervals
    /// the result does not depend on argument order.
    pub fn gap_f32(r1: &Range<f32>, r2: &Range<f32>) -> f32 {
        if r1.start < r2.start {
            r2.start - r1.end
        } else {
            r1.start - r2.end
        }
    }

    /// Extends `r` along the direction of travel: the end grows for positive `by`, the start
    /// for negative `by`.
    pub fn swept_f32(r: &Range<f32>, by: f32) -> Range<f32> {
        if by > 0.0 {
            r.start..(r.end + by)
        } else {
            (r.start + by)..r.end
        }
    }
}

#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct UnorderedPair<T: Copy + Clone + Ord + PartialOrd + Eq + PartialEq>(T, T);
impl<T: Copy + Clone + Ord + PartialOrd + Eq + PartialEq> UnorderedPair<T> {
    pub fn new(a: T, b: T) -> Self {
        if a < b { Self(a, b) } else { Self(b, a) }
    }

    pub fn fst(&self) -> T {
        self.0
    }
    pub fn snd(&self) -> T {
        self.1
    }
}

/// Installs the global `tracing` subscriber used by the demo and by applications that don't
/// bring their own.
pub fn setup_log() -> Result<()> {
    let timer = OffsetTime::new(
        time::UtcOffset::UTC,
        time::macros::format_description!("[hour]:[minute]:[second].[subsecond digits:6]"),
    );
    tracing_subscriber::fmt()
        .event_format(
            tracing_subscriber::fmt::format()
                .with_target(false)
                .with_source_location(true)
                .with_timer(timer),
        )
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_is_negative_when_overlapping() {
        assert_eq!(gg_range::gap_f32(&(0.0..2.0), &(1.0..3.0)), -1.0);
        assert_eq!(gg_range::gap_f32(&(1.0..3.0), &(0.0..2.0)), -1.0);
    }

    #[test]
    fn gap_is_positive_when_disjoint() {
        assert_eq!(gg_range::gap_f32(&(0.0..1.0), &(3.0..4.0)), 2.0);
        assert_eq!(gg_range::gap_f32(&(3.0..4.0), &(0.0..1.0)), 2.0);
        // Touching intervals have a gap of exactly zero.
        assert_eq!(gg_range::gap_f32(&(0.0..1.0), &(1.0..2.0)), 0.0);
    }

    #[test]
    fn swept_extends_in_direction_of_travel() {
        assert_eq!(gg_range::swept_f32(&(0.0..1.0), 2.0), 0.0..3.0);
        assert_eq!(gg_range::swept_f32(&(0.0..1.0), -2.0), -2.0..1.0);
        assert_eq!(gg_range::swept_f32(&(0.0..1.0), 0.0), 0.0..1.0);
    }

    #[test]
    fn unordered_pair_normalises_order() {
        assert_eq!(UnorderedPair::new(3, 1), UnorderedPair::new(1, 3));
        assert_eq!(UnorderedPair::new(3, 1).fst(), 1);
        assert_eq!(UnorderedPair::new(3, 1).snd(), 3);
    }

    #[test]
    fn vec2_finiteness() {
        use crate::util::linalg::Vec2;
        use gg_float::GgFloat;
        assert!(
            Vec2 {
                x: f32::MIN_POSITIVE / 2.,
                y: 0.
            }
            .is_finite()
        );
        assert!(!Vec2 { x: f32::NAN, y: 0. }.is_finite());
        assert!(
            !Vec2 {
                x: 0.,
                y: f32::INFINITY
            }
            .is_finite()
        );
    }
}
