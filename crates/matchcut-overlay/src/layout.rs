//! Scoreboard geometry.
//!
//! All dimensions are authored against a 4K (3840x2160) reference and scaled
//! linearly to the requested resolution, so the board occupies the same
//! fraction of the frame at 720p, 1080p, 1440p, or 4K.

/// Reference width the layout constants were designed against.
pub const REFERENCE_WIDTH: u32 = 3840;
/// Reference height the layout constants were designed against.
pub const REFERENCE_HEIGHT: u32 = 2160;

/// Resolved pixel geometry for one output resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Linear scale factor relative to the 4K reference.
    pub scale: f64,

    /// Distance from the left edge to the board.
    pub x_offset: i32,
    /// Distance from the bottom edge to the board's bottom.
    pub y_offset_from_bottom: i32,
    /// Full board height (two rows).
    pub total_height: i32,
    /// Height of one team row.
    pub row_height: i32,

    /// Width of the team-names panel.
    pub names_width: i32,
    /// Width of the current-games panel.
    pub games_width: i32,
    /// Width of the current-points panel.
    pub points_width: i32,
    /// Width of each completed-set panel.
    pub set_width: i32,

    /// Rounded corner radius for every panel.
    pub corner_radius: i32,
    /// Horizontal gap between panels.
    pub spacing: i32,
    /// Drop shadow offset.
    pub shadow_offset: i32,
    /// Drop shadow gaussian blur sigma.
    pub shadow_blur: f32,

    /// Font size for team names, in pixels.
    pub team_font_px: f32,
    /// Font size for the games digits, in pixels.
    pub games_font_px: f32,
    /// Font size for the points digits, in pixels.
    pub points_font_px: f32,
}

impl Layout {
    /// Compute the layout for a target resolution.
    pub fn new(width: u32, height: u32) -> Self {
        let scale = (width as f64 / REFERENCE_WIDTH as f64)
            .min(height as f64 / REFERENCE_HEIGHT as f64);

        let px = |reference: f64| (reference * scale) as i32;

        Self {
            width,
            height,
            scale,
            x_offset: px(50.0),
            y_offset_from_bottom: px(250.0),
            total_height: px(400.0),
            row_height: px(200.0),
            names_width: px(1100.0),
            games_width: px(350.0),
            points_width: px(400.0),
            set_width: px(350.0),
            corner_radius: px(50.0),
            spacing: px(30.0),
            shadow_offset: px(8.0),
            shadow_blur: (15.0 * scale) as f32,
            team_font_px: (70.0 * scale) as f32,
            games_font_px: (140.0 * scale) as f32,
            points_font_px: (130.0 * scale) as f32,
        }
    }

    /// Y coordinate of the board's top edge.
    pub fn origin_y(&self) -> i32 {
        self.height as i32 - self.y_offset_from_bottom - self.total_height
    }
}
