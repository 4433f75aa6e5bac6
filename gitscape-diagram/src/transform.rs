//! Pan/zoom transform applied uniformly to the laid-out diagram.

use crate::config::DiagramConfig;
use crate::geometry::{Point, Viewport};

/// `screen = diagram * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub const fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }

    /// Transform shown after a full rebuild: `root` sits `root_offset` past the
    /// left margin, vertically centred, at the initial scale.
    pub fn initial(viewport: Viewport, root: Point, config: &DiagramConfig) -> Self {
        let (min, max) = config.scale_extent();
        let scale = config.initial_scale.clamp(min, max);
        Self {
            translate_x: config.margins.left + config.root_offset - root.x * scale,
            translate_y: viewport.height / 2.0 - root.y * scale,
            scale,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    pub fn invert(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate_x) / self.scale,
            (screen.y - self.translate_y) / self.scale,
        )
    }

    /// Shift by a screen-space delta. Scale is untouched.
    pub fn pan(self, dx: f32, dy: f32) -> Self {
        Self {
            translate_x: self.translate_x + dx,
            translate_y: self.translate_y + dy,
            ..self
        }
    }

    /// Multiply the scale by `factor`, clamped to `extent`, keeping the
    /// diagram point under `anchor` fixed on screen.
    pub fn zoom_at(self, factor: f32, anchor: Point, extent: (f32, f32)) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        let scale = (self.scale * factor).clamp(extent.0, extent.1);
        let fixed = self.invert(anchor);
        Self {
            translate_x: anchor.x - fixed.x * scale,
            translate_y: anchor.y - fixed.y * scale,
            scale,
        }
    }

    /// Finite translation and a finite, positive scale.
    pub fn is_valid(&self) -> bool {
        self.translate_x.is_finite()
            && self.translate_y.is_finite()
            && self.scale.is_finite()
            && self.scale > 0.0
    }

    /// The same transform with its scale brought into `extent`. Translation
    /// is kept as is.
    pub fn clamped(self, extent: (f32, f32)) -> Self {
        Self {
            scale: self.scale.clamp(extent.0, extent.1),
            ..self
        }
    }
}
