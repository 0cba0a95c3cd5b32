use serde::Deserialize;

/// Visible window onto the world. `x`/`y` is the world position of the
/// screen's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1280,
            height: 720,
        }
    }
}

impl Viewport {
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Inclusive overlap between the viewport and the `width` x `height`
    /// rectangle whose top-left corner sits at `(x, y)`. Touching edges count.
    pub fn are_world_coordinates_in_viewport(
        &self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> bool {
        x <= self.x + self.width as f32
            && x + width >= self.x
            && y <= self.y + self.height as f32
            && y + height >= self.y
    }

    pub fn world_to_screen_px(&self, x: f32, y: f32) -> (i32, i32) {
        (round_px(x - self.x), round_px(y - self.y))
    }
}

/// Rounds half away from zero, so -2.5 maps to -3.
pub fn round_px(value: f32) -> i32 {
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            x: 100.0,
            y: 50.0,
            width: 800,
            height: 600,
        }
    }

    #[test]
    fn viewport_origin_maps_to_screen_origin() {
        assert_eq!(viewport().world_to_screen_px(100.0, 50.0), (0, 0));
        assert_eq!(viewport().world_to_screen_px(420.4, 90.6), (320, 41));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_px(2.5), 3);
        assert_eq!(round_px(-2.5), -3);
        assert_eq!(round_px(-2.4), -2);
        assert_eq!(viewport().world_to_screen_px(90.5, 49.5), (-10, -1));
    }

    #[test]
    fn overlap_includes_touching_edges() {
        let viewport = viewport();
        assert!(viewport.are_world_coordinates_in_viewport(900.0, 650.0, 10.0, 10.0));
        assert!(viewport.are_world_coordinates_in_viewport(90.0, 40.0, 10.0, 10.0));
        assert!(!viewport.are_world_coordinates_in_viewport(900.5, 100.0, 10.0, 10.0));
        assert!(!viewport.are_world_coordinates_in_viewport(89.0, 100.0, 10.0, 10.0));
        assert!(!viewport.are_world_coordinates_in_viewport(200.0, 650.5, 10.0, 10.0));
    }

    #[test]
    fn partially_visible_rectangle_counts() {
        assert!(viewport().are_world_coordinates_in_viewport(60.0, 30.0, 64.0, 64.0));
    }
}
