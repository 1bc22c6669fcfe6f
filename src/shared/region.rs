//! Selection geometry in overlay-local logical pixels

/// Regions narrower or shorter than this are treated as "no selection"
pub const MIN_REGION_SIZE: f32 = 5.0;

/// A point in overlay-local logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in logical pixels. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Bounding box of two corner points, whichever direction they were dragged in
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Large enough to be sent for extraction
    pub fn is_usable(&self) -> bool {
        self.width >= MIN_REGION_SIZE && self.height >= MIN_REGION_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_every_direction() {
        let anchor = Point::new(50.0, 50.0);
        let corners = [
            Point::new(80.0, 90.0),
            Point::new(10.0, 20.0),
            Point::new(80.0, 20.0),
            Point::new(10.0, 90.0),
        ];

        for corner in corners {
            let r = Region::from_corners(anchor, corner);
            assert!(r.width >= 0.0 && r.height >= 0.0);
            assert!(r.contains(anchor));
            assert!(r.contains(corner));
        }
    }

    #[test]
    fn test_usable_threshold() {
        assert!(Region::new(0.0, 0.0, 5.0, 5.0).is_usable());
        assert!(!Region::new(0.0, 0.0, 4.9, 100.0).is_usable());
        assert!(!Region::new(0.0, 0.0, 100.0, 0.0).is_usable());
    }

    #[test]
    fn test_new_clamps_negative_size() {
        let r = Region::new(3.0, 4.0, -10.0, 2.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 2.0);
    }
}
