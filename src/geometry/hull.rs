//! Monotone-chain convex hull over (lat, lng) points.

use std::cmp::Ordering;

use crate::domain::GeoPoint;

/// Signed cross product of `o->a` and `o->b`, with latitude as the first axis.
///
/// Positive for a strict left turn in (lat, lng) order.
pub fn cross(o: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    (a.lat - o.lat) * (b.lng - o.lng) - (a.lng - o.lng) * (b.lat - o.lat)
}

fn lat_lng_order(a: &GeoPoint, b: &GeoPoint) -> Ordering {
    a.lat.total_cmp(&b.lat).then(a.lng.total_cmp(&b.lng))
}

/// Append `point` to a chain, first dropping corners that are not strictly convex
fn push_convex(chain: &mut Vec<GeoPoint>, point: GeoPoint) {
    while chain.len() >= 2 && cross(chain[chain.len() - 2], chain[chain.len() - 1], point) <= 0.0
    {
        chain.pop();
    }
    chain.push(point);
}

/// Convex hull as an implicitly closed ring.
///
/// Fewer than three points are returned unchanged. Otherwise duplicates
/// are merged first, and collinear points never survive as corners, so an all-collinear input collapses to
/// at most two points; callers treat anything under three as "no polygon".
/// The ring is counter-clockwise in (lat, lng) order and starts at the
/// point with the smallest latitude (then longitude).
pub fn convex_hull(points: &[GeoPoint]) -> Vec<GeoPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(lat_lng_order);
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        push_convex(&mut lower, p);
    }

    let mut upper = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        push_convex(&mut upper, p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
