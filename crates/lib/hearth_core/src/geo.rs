//! Great-circle distance and radius filtering.
//!
//! Coordinates are decimal degrees at the interface; the haversine formula
//! works in radians internally.

use crate::models::geo::GeoPoint;

/// Earth mean radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Radius within which helpers are matched to a new help request.
pub const HELPER_RADIUS_METERS: f64 = 500.0;

/// Anything that may carry a location.
pub trait Located {
    fn location(&self) -> Option<GeoPoint>;
}

impl Located for GeoPoint {
    fn location(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}

/// Haversine distance between two points, in meters.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for near-antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Lazily yields the candidates located at most `radius_meters` from
/// `center`, in input order. Candidates without a location are skipped.
pub fn filter_within_radius<I>(
    center: GeoPoint,
    candidates: I,
    radius_meters: f64,
) -> WithinRadius<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Located,
{
    WithinRadius {
        center,
        radius_meters,
        candidates: candidates.into_iter(),
    }
}

/// Iterator returned by [`filter_within_radius`].
#[derive(Debug, Clone)]
pub struct WithinRadius<I> {
    center: GeoPoint,
    radius_meters: f64,
    candidates: I,
}

impl<I> Iterator for WithinRadius<I>
where
    I: Iterator,
    I::Item: Located,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let (center, radius) = (self.center, self.radius_meters);
        self.candidates.find(|candidate| {
            candidate
                .location()
                .is_some_and(|loc| distance_meters(center, loc) <= radius)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NYC: GeoPoint = GeoPoint {
        lat: 40.7128,
        lng: -74.0060,
    };
    const NYC_EAST: GeoPoint = GeoPoint {
        lat: 40.7128,
        lng: -74.0045,
    };

    #[derive(Debug, Clone, PartialEq)]
    struct Candidate {
        name: &'static str,
        at: Option<GeoPoint>,
    }

    impl Located for Candidate {
        fn location(&self) -> Option<GeoPoint> {
            self.at
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        for p in [NYC, NYC_EAST, GeoPoint::new(-33.8688, 151.2093), GeoPoint::new(90.0, 0.0)] {
            assert_eq!(distance_meters(p, p), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (NYC, NYC_EAST),
            (GeoPoint::new(51.5074, -0.1278), GeoPoint::new(48.8566, 2.3522)),
            (GeoPoint::new(-33.8688, 151.2093), GeoPoint::new(35.6762, 139.6503)),
        ];
        for (p, q) in pairs {
            assert_eq!(distance_meters(p, q), distance_meters(q, p));
        }
    }

    #[test]
    fn nearby_points_are_about_127_meters_apart() {
        let d = distance_meters(NYC, NYC_EAST);
        assert!((d - 126.4).abs() < 2.0, "unexpected distance {d}");
    }

    #[test]
    fn london_to_paris_is_about_344_km() {
        let d = distance_meters(GeoPoint::new(51.5074, -0.1278), GeoPoint::new(48.8566, 2.3522));
        assert!((d - 343_560.0).abs() < 1_000.0, "unexpected distance {d}");
    }

    #[test]
    fn helper_within_500m_is_kept_and_dropped_at_100m() {
        let helpers = vec![NYC_EAST];
        assert_eq!(filter_within_radius(NYC, helpers.clone(), 500.0).count(), 1);
        assert_eq!(filter_within_radius(NYC, helpers, 100.0).count(), 0);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let exact = distance_meters(NYC, NYC_EAST);
        let kept: Vec<_> = filter_within_radius(NYC, vec![NYC_EAST], exact).collect();
        assert_eq!(kept, vec![NYC_EAST]);

        let shrunk: Vec<_> = filter_within_radius(NYC, vec![NYC_EAST], exact - 1e-6).collect();
        assert!(shrunk.is_empty());
    }

    #[test]
    fn filter_preserves_order_and_skips_unlocated() {
        let candidates = vec![
            Candidate { name: "far", at: Some(GeoPoint::new(40.80, -74.0060)) },
            Candidate { name: "east", at: Some(NYC_EAST) },
            Candidate { name: "nowhere", at: None },
            Candidate { name: "here", at: Some(NYC) },
        ];
        let names: Vec<_> = filter_within_radius(NYC, candidates, HELPER_RADIUS_METERS)
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["east", "here"]);
    }

    #[test]
    fn antipodal_points_are_half_a_circumference_apart() {
        let a = GeoPoint::new(-87.843, -179.0);
        let b = GeoPoint::new(87.843, 1.0);
        let d = distance_meters(a, b);
        assert!(d.is_finite(), "distance is {d}");
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1.0);
        assert_eq!(filter_within_radius(a, vec![b], 25_000_000.0).count(), 1);
    }

    #[test]
    fn empty_candidates_yield_empty() {
        let none: Vec<GeoPoint> = Vec::new();
        assert_eq!(filter_within_radius(NYC, none, HELPER_RADIUS_METERS).count(), 0);
    }
}
