//! System font discovery.
//!
//! The renderer needs one bold face; candidates are tried in order across
//! the platforms a run may execute on. Which face wins varies by host and is
//! an accepted non-determinism.

use ab_glyph::FontVec;

use matchcut_core::{Error, Result};

/// Bold faces to try, in preference order.
const FONT_CANDIDATES: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNSDisplay-Bold.ttf",
    // Windows
    "C:/Windows/Fonts/arialbd.ttf",
    "C:/Windows/Fonts/calibrib.ttf",
];

/// Load the first usable bold system font.
///
/// # Errors
///
/// [`Error::Font`] when no candidate can be read and parsed.
pub fn load_bold_font() -> Result<FontVec> {
    for path in FONT_CANDIDATES {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                tracing::debug!("Loaded scoreboard font from {path}");
                return Ok(font);
            }
            Err(e) => {
                tracing::debug!("Font candidate {path} unusable: {e}");
            }
        }
    }

    Err(Error::Font(
        "no usable bold system font found in standard locations".into(),
    ))
}
