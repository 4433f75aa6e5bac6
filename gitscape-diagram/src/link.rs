//! Horizontal connector curves between a parent and a child.

use crate::geometry::Point;

/// A cubic curve leaving `start` and arriving at `end` horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub start: Point,
    pub control_start: Point,
    pub control_end: Point,
    pub end: Point,
}

/// Connector whose control points sit halfway along the horizontal axis.
pub fn horizontal_connector(start: Point, end: Point) -> Connector {
    let mid_x = (start.x + end.x) / 2.0;
    Connector {
        start,
        control_start: Point::new(mid_x, start.y),
        control_end: Point::new(mid_x, end.y),
        end,
    }
}

impl Connector {
    /// Point on the curve at `t` in `0.0..=1.0`.
    pub fn point_at(&self, t: f32) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.start * (u * u * u)
            + self.control_start * (3.0 * u * u * t)
            + self.control_end * (3.0 * u * t * t)
            + self.end * (t * t * t)
    }

    /// `segments + 1` evenly parameterised points, endpoints included.
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }

    /// Upper bound on the curve length (control polygon length).
    pub fn hull_length(&self) -> f32 {
        self.start.distance(self.control_start)
            + self.control_start.distance(self.control_end)
            + self.control_end.distance(self.end)
    }

    /// SVG path data for this curve.
    pub fn svg_path(&self) -> String {
        format!(
            "M{},{}C{},{} {},{} {},{}",
            self.start.x,
            self.start.y,
            self.control_start.x,
            self.control_start.y,
            self.control_end.x,
            self.control_end.y,
            self.end.x,
            self.end.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let c = horizontal_connector(Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        assert_eq!(c.point_at(0.0), Point::new(0.0, 0.0));
        assert_eq!(c.point_at(1.0), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_midpoint_is_centre() {
        let c = horizontal_connector(Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        let mid = c.point_at(0.5);
        assert!((mid.x - 50.0).abs() < 1e-4);
        assert!((mid.y - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_leaves_horizontally() {
        let c = horizontal_connector(Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        assert_eq!(c.control_start.y, 0.0);
        assert_eq!(c.control_end.y, 50.0);
    }

    #[test]
    fn test_degenerate_connector_samples_one_point() {
        let p = Point::new(3.0, 4.0);
        let c = horizontal_connector(p, p);
        assert!(c.sample(4).iter().all(|q| *q == p));
        assert_eq!(c.hull_length(), 0.0);
    }

    #[test]
    fn test_svg_path() {
        let c = horizontal_connector(Point::new(0.0, 0.0), Point::new(10.0, 20.0));
        assert_eq!(c.svg_path(), "M0,0C5,0 5,20 10,20");
    }
}
