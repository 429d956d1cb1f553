//! WKT polygon helpers for scoping GBIF occurrence searches.
//!
//! GBIF expects `POLYGON((lon lat,lon lat,...))` with no space after `POLYGON`
//! and a closed ring (first point repeated last).

/// A `(longitude, latitude)` pair.
pub type Coordinate = (f64, f64);

/// Wildcat Canyon Regional Park, outer ring plus one hole.
pub const WILDCAT_CANYON_WKT: &str = "POLYGON((-122.28112 37.91874,-122.27067 37.92392,-122.27061 37.92138,-122.26765 37.92143,-122.262 37.92416,-122.2659 37.93392,-122.27042 37.93614,-122.28178 37.94702,-122.28391 37.9473,-122.28559 37.95072,-122.29028 37.95304,-122.28642 37.95197,-122.28435 37.95408,-122.29229 37.95429,-122.2975 37.95679,-122.29822 37.95575,-122.29613 37.95525,-122.29899 37.95366,-122.30203 37.95487,-122.30175 37.95264,-122.30828 37.95267,-122.30794 37.96,-122.31055 37.96004,-122.31557 37.9594,-122.31875 37.95404,-122.3244 37.95385,-122.32226 37.95131,-122.3163 37.95097,-122.31596 37.94868,-122.3138 37.94836,-122.31248 37.94682,-122.31136 37.94882,-122.30721 37.9454,-122.31131 37.9456,-122.31168 37.94403,-122.3101 37.94503,-122.29522 37.93138,-122.29224 37.93069,-122.29064 37.92924,-122.2918 37.92726,-122.28112 37.91874),(-122.31321 37.95783,-122.31039 37.95636,-122.31337 37.95701,-122.31321 37.95783))";

/// Keeps roughly every n-th point so the ring has about `max_points` points.
///
/// The first and last input points are always kept. Inputs already at or below
/// `max_points` are returned unchanged.
pub fn simplify_polygon(coordinates: &[Coordinate], max_points: usize) -> Vec<Coordinate> {
    if coordinates.len() <= max_points {
        return coordinates.to_vec();
    }

    let step = (coordinates.len() / max_points.max(1)).max(1);
    let mut simplified: Vec<Coordinate> = coordinates.iter().copied().step_by(step).collect();

    let (Some(&first), Some(&last)) = (coordinates.first(), coordinates.last()) else {
        return simplified;
    };
    if simplified.first() != Some(&first) {
        simplified.insert(0, first);
    }
    if simplified.last() != Some(&last) {
        simplified.push(last);
    }
    simplified
}

/// Formats a ring as a GBIF-compatible WKT polygon, closing it if needed.
pub fn create_wkt_polygon(coordinates: &[Coordinate], simplify: bool, max_points: usize) -> String {
    let mut ring = if simplify {
        simplify_polygon(coordinates, max_points)
    } else {
        coordinates.to_vec()
    };

    if let (Some(&first), Some(&last)) = (ring.first(), ring.last())
        && first != last
    {
        ring.push(first);
    }

    format_ring(&ring)
}

/// Closed, anticlockwise rectangle covering the given bounds.
pub fn bounding_box_polygon(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> String {
    format_ring(&[
        (min_lon, min_lat),
        (max_lon, min_lat),
        (max_lon, max_lat),
        (min_lon, max_lat),
        (min_lon, min_lat),
    ])
}

fn format_ring(ring: &[Coordinate]) -> String {
    let pairs: Vec<String> = ring.iter().map(|(lon, lat)| format!("{lon} {lat}")).collect();
    format!("POLYGON(({}))", pairs.join(","))
}
