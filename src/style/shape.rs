//! Geometric recognizers for vector symbol point lists.
//!
//! Points come as a flat `x y x y ...` list in symbol units, y pointing
//! down. MapServer separates disjoint strokes with a `-99 -99` pen-up pair.

const EPSILON: f64 = 1e-9;

/// Pen-up marker between two strokes.
const PEN_UP: f64 = -99.0;

type Point = (f64, f64);

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn same(a: Point, b: Point) -> bool {
    close(a.0, b.0) && close(a.1, b.1)
}

/// Group a flat coordinate list into pairs. Odd lengths are rejected.
fn pairs(coords: &[f64]) -> Option<Vec<Point>> {
    if coords.len() % 2 != 0 {
        return None;
    }
    Some(coords.chunks_exact(2).map(|c| (c[0], c[1])).collect())
}

/// The vertices of a closed loop with `n` corners (last point repeats the first).
fn closed_loop(coords: &[f64], corners: usize) -> Option<Vec<Point>> {
    let mut points = pairs(coords)?;
    if points.len() != corners + 1 || !same(points[0], points[corners]) {
        return None;
    }
    points.pop();
    Some(points)
}

/// Parse a `POINTS` value (`"0 0 1 0 1 1"`) into coordinates.
pub fn parse_points(value: &str) -> Vec<f64> {
    value
        .split_whitespace()
        .filter_map(|token| token.parse().ok())
        .collect()
}

fn sub(a: Point, b: Point) -> Point {
    (a.0 - b.0, a.1 - b.1)
}

fn dot(a: Point, b: Point) -> f64 {
    a.0 * b.0 + a.1 * b.1
}

fn length_squared(v: Point) -> f64 {
    dot(v, v)
}

/// Closed loop of four right angles with equal adjacent sides, at least
/// one of them axis-aligned.
pub fn is_square(coords: &[f64]) -> bool {
    let Some(v) = closed_loop(coords, 4) else {
        return false;
    };

    let right_angles = (0..4).all(|i| {
        let previous = v[(i + 3) % 4];
        let next = v[(i + 1) % 4];
        close(dot(sub(previous, v[i]), sub(next, v[i])), 0.0)
    });
    if !right_angles {
        return false;
    }

    let first = sub(v[1], v[0]);
    let second = sub(v[2], v[1]);
    if close(length_squared(first), 0.0) || !close(length_squared(first), length_squared(second)) {
        return false;
    }

    (0..4).any(|i| {
        let side = sub(v[(i + 1) % 4], v[i]);
        close(side.0, 0.0) || close(side.1, 0.0)
    })
}

/// Closed apex-up isosceles triangle: two points share a y, the third sits
/// above their midpoint.
pub fn is_triangle(coords: &[f64]) -> bool {
    let Some(v) = closed_loop(coords, 3) else {
        return false;
    };

    (0..3).any(|r| {
        let (a, b, apex) = (v[r], v[(r + 1) % 3], v[(r + 2) % 3]);
        close(a.1, b.1) && !close(a.0, b.0) && close((a.0 + b.0) / 2.0, apex.0) && apex.1 < a.1
    })
}

/// One horizontal and one vertical stroke, separated by a pen-up pair,
/// crossing at their midpoints.
pub fn is_cross(coords: &[f64]) -> bool {
    let Some(p) = pairs(coords) else {
        return false;
    };
    if p.len() != 5 || !same(p[2], (PEN_UP, PEN_UP)) {
        return false;
    }

    let strokes = [(p[0], p[1]), (p[3], p[4])];
    let horizontal = |(a, b): (Point, Point)| close(a.1, b.1) && !close(a.0, b.0);
    let vertical = |(a, b): (Point, Point)| close(a.0, b.0) && !close(a.1, b.1);
    let midpoint = |(a, b): (Point, Point)| ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);

    let perpendicular = (horizontal(strokes[0]) && vertical(strokes[1]))
        || (vertical(strokes[0]) && horizontal(strokes[1]));

    perpendicular && same(midpoint(strokes[0]), midpoint(strokes[1]))
}
