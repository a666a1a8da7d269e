//! Plane geometry on normalized landmark coordinates.

use crate::landmark::LandmarkPoint;

/// Euclidean distance between two landmarks in the (x, y) plane.
/// Depth is ignored.
pub fn distance(a: &LandmarkPoint, b: &LandmarkPoint) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Map `value` linearly from `domain` onto `range`.
///
/// Values outside the domain clamp to the nearest range endpoint, so the
/// result always lies between `range.0` and `range.1`.  Either range may be
/// descending (`(1.0, 0.0)` inverts).
pub fn interp(value: f32, domain: (f32, f32), range: (f32, f32)) -> f32 {
    let (d0, d1) = domain;
    let (r0, r1) = range;
    if (d1 - d0).abs() < f32::EPSILON {
        return r0;
    }
    let t = ((value - d0) / (d1 - d0)).clamp(0.0, 1.0);
    r0 + (r1 - r0) * t
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> LandmarkPoint { LandmarkPoint::new(x, y, 0.0) }

    #[test]
    fn distance_is_euclidean_in_plane() {
        assert!((distance(&p(0.0, 0.0), &p(0.3, 0.4)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn distance_ignores_depth() {
        let a = LandmarkPoint::new(0.2, 0.2, -0.5);
        let b = LandmarkPoint::new(0.2, 0.2,  0.9);
        assert_eq!(distance(&a, &b), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = p(0.1, 0.9);
        let b = p(0.7, 0.2);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn interp_inverted_range() {
        assert_eq!(interp(0.0,  (0.0, 1.0), (1.0, 0.0)), 1.0);
        assert_eq!(interp(1.0,  (0.0, 1.0), (1.0, 0.0)), 0.0);
        assert!((interp(0.25, (0.0, 1.0), (100.0, 0.0)) - 75.0).abs() < 1e-4);
    }

    #[test]
    fn interp_clamps_outside_domain() {
        assert_eq!(interp(-0.3, (0.0, 1.0), (1.0, 0.0)), 1.0);
        assert_eq!(interp( 1.7, (0.0, 1.0), (1.0, 0.0)), 0.0);
    }

    #[test]
    fn interp_degenerate_domain_returns_range_start() {
        assert_eq!(interp(0.4, (0.5, 0.5), (10.0, 20.0)), 10.0);
    }
}
