//! Scoreboard drawing.
//!
//! One [`ScoreboardRenderer`] is built per run (it owns the loaded font and
//! resolved [`Layout`]) and renders one transparent RGBA frame per segment.
//! Panels are drawn left to right: team names, any completed set scores,
//! current games, current points; each panel carries a blurred drop shadow
//! and a separator line between the two team rows.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;

use matchcut_core::{Error, Result, ScorePair};

use crate::fonts;
use crate::layout::Layout;

const BG_TEAMS: Rgba<u8> = Rgba([37, 66, 94, 255]);
const BG_GAMES: Rgba<u8> = Rgba([210, 210, 210, 255]);
const BG_POINTS: Rgba<u8> = Rgba([54, 79, 107, 255]);
const TEXT_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TEXT_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const SEPARATOR: Rgba<u8> = Rgba([255, 255, 255, 180]);
const SHADOW: Rgba<u8> = Rgba([0, 0, 0, 100]);

/// Padding around the shadow layer so the blur has room to spread.
const SHADOW_PAD: i32 = 20;

/// One scoreboard state to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreline {
    /// Team 1 names, top row. Rendered uppercased.
    pub team1: String,
    /// Team 2 names, bottom row. Rendered uppercased.
    pub team2: String,
    /// Current games, `"a/b"`.
    pub games: String,
    /// Current points, `"a/b"`.
    pub points: String,
    /// Completed set 1 score; its panel only appears when present.
    pub set1: Option<String>,
    /// Completed set 2 score; its panel only appears when present.
    pub set2: Option<String>,
}

/// Renders scoreboard overlays at a fixed resolution.
pub struct ScoreboardRenderer {
    layout: Layout,
    font: FontVec,
}

impl ScoreboardRenderer {
    /// Build a renderer for the given output resolution.
    ///
    /// # Errors
    ///
    /// [`Error::Font`] when no usable system font can be loaded.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            layout: Layout::new(width, height),
            font: fonts::load_bold_font()?,
        })
    }

    /// The resolved geometry this renderer draws with.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Render one scoreboard frame. Deterministic for identical inputs.
    pub fn render(&self, line: &Scoreline) -> RgbaImage {
        let lay = &self.layout;
        let mut img = RgbaImage::new(lay.width, lay.height);

        let games = ScorePair::parse(&line.games);
        let points = ScorePair::parse(&line.points);

        let x_names = lay.x_offset;
        let y_top = lay.origin_y();

        self.panel(&mut img, x_names, y_top, lay.names_width, BG_TEAMS);

        // Completed sets slot in between the names and the games panel.
        let mut x_cursor = x_names + lay.names_width + lay.spacing;
        let mut set_panels: Vec<(i32, ScorePair)> = Vec::new();
        for set in [&line.set1, &line.set2].into_iter().flatten() {
            self.panel(&mut img, x_cursor, y_top, lay.set_width, BG_TEAMS);
            set_panels.push((x_cursor, ScorePair::parse(set)));
            x_cursor += lay.set_width + lay.spacing;
        }

        let x_games = x_cursor;
        self.panel(&mut img, x_games, y_top, lay.games_width, BG_GAMES);
        let x_points = x_games + lay.games_width + lay.spacing;
        self.panel(&mut img, x_points, y_top, lay.points_width, BG_POINTS);

        // Separator between the two team rows, inset per panel.
        let sep_y = y_top + lay.row_height + 7;
        hline(&mut img, x_names + 15, x_names + lay.names_width - 15, sep_y, SEPARATOR);
        hline(&mut img, x_games + 20, x_games + lay.games_width - 20, sep_y, TEXT_BLACK);
        hline(&mut img, x_points + 20, x_points + lay.points_width - 20, sep_y, SEPARATOR);
        for (x, _) in &set_panels {
            hline(&mut img, x + 15, x + lay.set_width - 15, sep_y, SEPARATOR);
        }

        let y1 = y_top + 10;
        let y2 = y_top + lay.row_height + 12;

        self.draw_left(&mut img, &line.team1.to_uppercase(), x_names + 15, y1, lay.team_font_px, TEXT_WHITE);
        self.draw_left(&mut img, &line.team2.to_uppercase(), x_names + 15, y2, lay.team_font_px, TEXT_WHITE);

        self.draw_centered(&mut img, &games.team1, x_games, lay.games_width, y1 - 5, lay.games_font_px, TEXT_BLACK);
        self.draw_centered(&mut img, &games.team2, x_games, lay.games_width, y2 - 5, lay.games_font_px, TEXT_BLACK);

        self.draw_centered(&mut img, &points.team1, x_points, lay.points_width, y1 - 3, lay.points_font_px, TEXT_WHITE);
        self.draw_centered(&mut img, &points.team2, x_points, lay.points_width, y2 - 3, lay.points_font_px, TEXT_WHITE);

        for (x, pair) in &set_panels {
            self.draw_centered(&mut img, &pair.team1, *x, lay.set_width, y1 - 5, lay.points_font_px, TEXT_WHITE);
            self.draw_centered(&mut img, &pair.team2, *x, lay.set_width, y2 - 5, lay.points_font_px, TEXT_WHITE);
        }

        img
    }

    /// Render and write a PNG.
    pub fn render_to_file(&self, line: &Scoreline, path: &Path) -> Result<()> {
        self.render(line)
            .save(path)
            .map_err(|e| Error::Internal(format!("failed to write overlay {}: {e}", path.display())))
    }

    /// Draw one full-height panel with its drop shadow.
    fn panel(&self, img: &mut RgbaImage, x: i32, y: i32, width: i32, fill: Rgba<u8>) {
        let lay = &self.layout;
        let height = lay.total_height;

        let mut shadow = RgbaImage::new(
            (width + 2 * SHADOW_PAD).max(1) as u32,
            (height + 2 * SHADOW_PAD).max(1) as u32,
        );
        rounded_rect(&mut shadow, SHADOW_PAD, SHADOW_PAD, width, height, lay.corner_radius, SHADOW);
        let shadow = imageops::blur(&shadow, lay.shadow_blur.max(0.1));
        imageops::overlay(
            img,
            &shadow,
            (x - SHADOW_PAD + lay.shadow_offset) as i64,
            (y - SHADOW_PAD + lay.shadow_offset) as i64,
        );

        rounded_rect(img, x, y, width, height, lay.corner_radius, fill);
    }

    fn draw_left(&self, img: &mut RgbaImage, text: &str, x: i32, y: i32, px: f32, color: Rgba<u8>) {
        draw_text_mut(img, color, x, y, PxScale::from(px), &self.font, text);
    }

    fn draw_centered(
        &self,
        img: &mut RgbaImage,
        text: &str,
        panel_x: i32,
        panel_width: i32,
        y: i32,
        px: f32,
        color: Rgba<u8>,
    ) {
        let scale = PxScale::from(px);
        let text_width = text_size(scale, &self.font, text).0 as i32;
        let x = panel_x + (panel_width - text_width) / 2;
        draw_text_mut(img, color, x, y, scale, &self.font, text);
    }
}

/// Filled rounded rectangle: a cross of two rectangles plus corner discs.
fn rounded_rect(img: &mut RgbaImage, x: i32, y: i32, width: i32, height: i32, radius: i32, fill: Rgba<u8>) {
    if width <= 0 || height <= 0 {
        return;
    }
    let r = radius.clamp(0, width.min(height) / 2);
    if r == 0 {
        draw_filled_rect_mut(img, Rect::at(x, y).of_size(width as u32, height as u32), fill);
        return;
    }

    if width > 2 * r {
        draw_filled_rect_mut(
            img,
            Rect::at(x + r, y).of_size((width - 2 * r) as u32, height as u32),
            fill,
        );
    }
    if height > 2 * r {
        draw_filled_rect_mut(
            img,
            Rect::at(x, y + r).of_size(width as u32, (height - 2 * r) as u32),
            fill,
        );
    }
    for (cx, cy) in [
        (x + r, y + r),
        (x + width - 1 - r, y + r),
        (x + r, y + height - 1 - r),
        (x + width - 1 - r, y + height - 1 - r),
    ] {
        draw_filled_circle_mut(img, (cx, cy), r, fill);
    }
}

/// 2px horizontal separator line.
fn hline(img: &mut RgbaImage, x1: i32, x2: i32, y: i32, color: Rgba<u8>) {
    for dy in 0..2 {
        draw_line_segment_mut(
            img,
            (x1 as f32, (y + dy) as f32),
            (x2 as f32, (y + dy) as f32),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoreline() -> Scoreline {
        Scoreline {
            team1: "Ana / Marta".into(),
            team2: "Lucia / Bea".into(),
            games: "3/3".into(),
            points: "40/30".into(),
            set1: None,
            set2: None,
        }
    }

    /// Rightmost column containing any non-transparent pixel.
    fn rightmost_drawn_column(img: &RgbaImage) -> u32 {
        let mut max_x = 0;
        for (x, _, pixel) in img.enumerate_pixels() {
            if pixel.0[3] > 0 && x > max_x {
                max_x = x;
            }
        }
        max_x
    }

    #[test]
    fn output_matches_requested_dimensions() {
        // Hosts without any system font skip the drawing tests.
        let Ok(renderer) = ScoreboardRenderer::new(1280, 720) else {
            return;
        };
        let img = renderer.render(&scoreline());
        assert_eq!(img.width(), 1280);
        assert_eq!(img.height(), 720);
    }

    #[test]
    fn background_is_transparent() {
        let Ok(renderer) = ScoreboardRenderer::new(1280, 720) else {
            return;
        };
        let img = renderer.render(&scoreline());
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(1279, 0).0[3], 0);
    }

    #[test]
    fn render_is_deterministic() {
        let Ok(renderer) = ScoreboardRenderer::new(1280, 720) else {
            return;
        };
        let a = renderer.render(&scoreline());
        let b = renderer.render(&scoreline());
        assert_eq!(a.dimensions(), b.dimensions());
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn completed_sets_widen_the_board() {
        let Ok(renderer) = ScoreboardRenderer::new(1920, 1080) else {
            return;
        };
        let without_sets = renderer.render(&scoreline());

        let mut line = scoreline();
        line.set1 = Some("5/7".into());
        line.set2 = Some("1/0".into());
        let with_sets = renderer.render(&line);

        let lay = renderer.layout();
        let expected_growth = 2 * (lay.set_width + lay.spacing) as u32;
        let grew = rightmost_drawn_column(&with_sets) - rightmost_drawn_column(&without_sets);
        // The shadow blur softens the right edge; allow a small tolerance.
        assert!(
            grew + 4 >= expected_growth && grew <= expected_growth + 4,
            "board grew by {grew}px, expected about {expected_growth}px"
        );
    }

    #[test]
    fn single_set_panel_between_names_and_games() {
        let Ok(renderer) = ScoreboardRenderer::new(1920, 1080) else {
            return;
        };
        let mut line = scoreline();
        line.set1 = Some("6/4".into());
        let one_set = renderer.render(&line);
        let no_sets = renderer.render(&scoreline());

        let lay = renderer.layout();
        let grew = rightmost_drawn_column(&one_set) - rightmost_drawn_column(&no_sets);
        let expected = (lay.set_width + lay.spacing) as u32;
        assert!(grew + 4 >= expected && grew <= expected + 4);
    }

    #[test]
    fn render_to_file_writes_png() {
        let Ok(renderer) = ScoreboardRenderer::new(640, 360) else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay_001.png");
        renderer.render_to_file(&scoreline(), &path).unwrap();
        assert!(path.exists());

        let back = image::open(&path).unwrap();
        assert_eq!(back.width(), 640);
        assert_eq!(back.height(), 360);
    }

    #[test]
    fn malformed_scores_fall_back_to_zero() {
        let Ok(renderer) = ScoreboardRenderer::new(640, 360) else {
            return;
        };
        let mut line = scoreline();
        line.games = "broken".into();
        line.points = String::new();
        // Must not panic; the board renders "0" everywhere.
        let img = renderer.render(&line);
        assert_eq!(img.width(), 640);
    }
}
