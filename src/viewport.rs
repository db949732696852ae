use glam::Vec2;

/// Window size in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, dpr: f64) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            dpr,
        }
    }

    /// Size of the canvas drawing buffer in device pixels, never zero.
    pub fn drawing_buffer(&self) -> (u32, u32) {
        let px = |css: f64| ((css * self.dpr).round() as u32).max(1);
        (px(self.css_width), px(self.css_height))
    }

    /// `width / height`, or `1.0` while the window has no height.
    pub fn aspect(&self) -> f32 {
        if self.css_height > 0.0 {
            (self.css_width / self.css_height) as f32
        } else {
            1.0
        }
    }

    pub fn css_size(&self) -> Vec2 {
        Vec2::new(self.css_width as f32, self.css_height as f32)
    }

    /// Drawing buffer size as the `uRes` uniform.
    pub fn resolution(&self) -> Vec2 {
        let (w, h) = self.drawing_buffer();
        Vec2::new(w as f32, h as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_device_pixel_ratio() {
        let vp = Viewport::new(800.0, 600.0, 2.0);
        assert_eq!(vp.drawing_buffer(), (1600, 1200));
        assert_eq!(vp.resolution(), Vec2::new(1600.0, 1200.0));
        let vp = Viewport::new(333.0, 100.0, 1.5);
        assert_eq!(vp.drawing_buffer(), (500, 150));
    }

    #[test]
    fn bad_ratio_falls_back_to_one() {
        assert_eq!(Viewport::new(10.0, 10.0, 0.0).dpr, 1.0);
        assert_eq!(Viewport::new(10.0, 10.0, f64::NAN).dpr, 1.0);
    }

    #[test]
    fn degenerate_sizes() {
        let vp = Viewport::new(0.0, 0.0, 1.0);
        assert_eq!(vp.drawing_buffer(), (1, 1));
        assert_eq!(vp.aspect(), 1.0);
        assert_eq!(Viewport::new(1920.0, 1080.0, 1.0).aspect(), (1920.0f64 / 1080.0) as f32);
    }
}
