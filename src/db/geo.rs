//! Distance math for the spatial game query.
//!
//! Games persist through `sea-orm` to SQLite, which has no PostGIS/GiST
//! support for a geography column. Distances here are computed on the
//! WGS-84 mean earth radius; a location is stored as a plain lat/lng pair
//! rather than a geography column, so the index usable by a distance
//! predicate is approximated with a bounding-box pre-filter (cheap,
//! plain-column range scan) followed by an exact haversine post-filter,
//! rather than a true geospatial index.

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn in_bounds(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Great-circle distance between two points, in meters.
pub fn haversine_distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();
    EARTH_RADIUS_METERS * c
}

/// A latitude/longitude bounding box that is guaranteed to contain every
/// point within `radius_meters` of `center` (and may contain some that
/// are not, hence the need for an exact haversine post-filter).
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

pub fn bounding_box(center: GeoPoint, radius_meters: f64) -> BoundingBox {
    let lat_delta = (radius_meters / EARTH_RADIUS_METERS).to_degrees();
    let lat_rad = center.lat.to_radians();
    let lng_delta = if lat_rad.cos().abs() < f64::EPSILON {
        180.0
    } else {
        (radius_meters / (EARTH_RADIUS_METERS * lat_rad.cos())).to_degrees()
    };

    BoundingBox {
        min_lat: (center.lat - lat_delta).max(-90.0),
        max_lat: (center.lat + lat_delta).min(90.0),
        min_lng: (center.lng - lng_delta).max(-180.0),
        max_lng: (center.lng + lng_delta).min(180.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint {
            lat: 40.7829,
            lng: -73.9654,
        };
        assert_eq!(haversine_distance_meters(p, p), 0.0);
    }

    #[test]
    fn nearby_points_are_within_a_kilometer() {
        let a = GeoPoint {
            lat: 40.7829,
            lng: -73.9654,
        };
        let b = GeoPoint {
            lat: 40.7830,
            lng: -73.9655,
        };
        let d = haversine_distance_meters(a, b);
        assert!(d < 50.0, "expected sub-50m distance, got {d}");
    }

    #[test]
    fn far_points_exceed_a_kilometer() {
        let a = GeoPoint { lat: 0.0, lng: 0.0 };
        let b = GeoPoint {
            lat: 40.7829,
            lng: -73.9654,
        };
        assert!(haversine_distance_meters(a, b) > 1000.0);
    }
}
