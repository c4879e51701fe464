//! Bowyer-Watson Delaunay triangulation over room centers.

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A triangle referencing three point indices. Indices at or above the
/// input length belong to the synthetic super-triangle and never appear
/// in the returned set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle(pub usize, pub usize, pub usize);

impl Triangle {
    fn vertices(&self) -> [usize; 3] {
        [self.0, self.1, self.2]
    }

    /// Directed edges in winding order.
    fn edges(&self) -> [(usize, usize); 3] {
        [(self.0, self.1), (self.1, self.2), (self.2, self.0)]
    }
}

/// Signed twice-area of the triangle abc. Positive when counter-clockwise.
fn orient(a: Point, b: Point, c: Point) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Check whether p lies strictly inside the circumcircle of abc.
fn in_circumcircle(a: Point, b: Point, c: Point, p: Point) -> bool {
    // The determinant test assumes counter-clockwise winding
    let (a, b, c) = if orient(a, b, c) < 0.0 {
        (a, c, b)
    } else {
        (a, b, c)
    };

    let ax = a.x - p.x;
    let ay = a.y - p.y;
    let bx = b.x - p.x;
    let by = b.y - p.y;
    let cx = c.x - p.x;
    let cy = c.y - p.y;

    let det = (ax * ax + ay * ay) * (bx * cy - cx * by)
        - (bx * bx + by * by) * (ax * cy - cx * ay)
        + (cx * cx + cy * cy) * (ax * by - bx * ay);
    det > 0.0
}

/// Compute the Delaunay triangulation of a point set.
///
/// Returns `None` when fewer than 3 points are given or the points are
/// degenerate (e.g. all collinear), in which case the caller falls back
/// to a complete graph.
pub fn triangulate(points: &[Point]) -> Option<Vec<Triangle>> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    // Super-triangle big enough to enclose every input point
    let min_x = points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
    let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_x = points.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
    let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
    let d = (max_x - min_x).max(max_y - min_y).max(1.0) * 20.0;
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    let mut verts: Vec<Point> = points.to_vec();
    verts.push(Point::new(mid_x - d, mid_y - d));
    verts.push(Point::new(mid_x, mid_y + d));
    verts.push(Point::new(mid_x + d, mid_y - d));

    let mut triangles = vec![Triangle(n, n + 1, n + 2)];

    for (i, &p) in points.iter().enumerate() {
        // Triangles whose circumcircle swallows the new point
        let mut bad: Vec<Triangle> = Vec::new();
        triangles.retain(|t| {
            if in_circumcircle(verts[t.0], verts[t.1], verts[t.2], p) {
                bad.push(*t);
                false
            } else {
                true
            }
        });

        // Boundary of the removed cavity: edges not shared by two bad
        // triangles. Shared edges appear once in each direction.
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for t in &bad {
            for (a, b) in t.edges() {
                if let Some(pos) = boundary.iter().position(|&(x, y)| x == b && y == a) {
                    boundary.swap_remove(pos);
                } else {
                    boundary.push((a, b));
                }
            }
        }

        for (a, b) in boundary {
            triangles.push(Triangle(a, b, i));
        }
    }

    // Strip everything touching the super-triangle
    triangles.retain(|t| t.vertices().iter().all(|&v| v < n));

    if triangles.is_empty() {
        None
    } else {
        Some(triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_points() {
        assert_eq!(triangulate(&[]), None);
        assert_eq!(triangulate(&[Point::new(0.0, 0.0)]), None);
        assert_eq!(
            triangulate(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]),
            None
        );
    }

    #[test]
    fn test_single_triangle() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 8.0),
        ];
        let tris = triangulate(&pts).unwrap();
        assert_eq!(tris.len(), 1);
        let mut vs = tris[0].vertices();
        vs.sort_unstable();
        assert_eq!(vs, [0, 1, 2]);
    }

    #[test]
    fn test_square_gives_two_triangles() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let tris = triangulate(&pts).unwrap();
        assert_eq!(tris.len(), 2);
        // Every vertex appears in the triangulation
        let mut seen = [false; 4];
        for t in &tris {
            for v in t.vertices() {
                seen[v] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_collinear_points_fall_back() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(15.0, 0.0),
        ];
        assert_eq!(triangulate(&pts), None);
    }

    #[test]
    fn test_larger_set_covers_all_points() {
        let pts: Vec<Point> = (0..12)
            .map(|i| {
                let a = i as f32 * 0.53;
                Point::new(32.0 + a.cos() * (10.0 + i as f32), 32.0 + a.sin() * (8.0 + i as f32))
            })
            .collect();
        let tris = triangulate(&pts).unwrap();
        assert!(!tris.is_empty());
        let mut seen = vec![false; pts.len()];
        for t in &tris {
            for v in t.vertices() {
                assert!(v < pts.len());
                seen[v] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "every point must be triangulated");

        // Euler bound for planar triangulations: at most 2n - 2 - h triangles
        assert!(tris.len() <= 2 * pts.len());
    }
}
