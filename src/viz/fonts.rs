//! Font registration for the `ab_glyph` text path, which does not discover
//! system fonts on its own.

use plotters::style::{FontStyle, register_font};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Family name every text element in the renderer uses.
pub const FONT_FAMILY: &str = "sans-serif";

const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static TEXT_ENABLED: OnceLock<bool> = OnceLock::new();

fn candidate_paths(preferred: Option<&Path>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    if let Some(p) = preferred {
        out.push(p.to_path_buf());
    }
    if let Ok(p) = std::env::var(crate::config::ENV_FONT)
        && !p.trim().is_empty()
    {
        out.push(PathBuf::from(p.trim()));
    }
    out.extend(CANDIDATES.iter().map(PathBuf::from));
    out
}

fn load_and_register(preferred: Option<&Path>) -> bool {
    for path in candidate_paths(preferred) {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        // Registered fonts must outlive every chart; this runs once per process.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        let normal = register_font(FONT_FAMILY, FontStyle::Normal, bytes);
        let bold = register_font(FONT_FAMILY, FontStyle::Bold, bytes);
        if normal.is_ok() && bold.is_ok() {
            log::debug!("chart font: {}", path.display());
            return true;
        }
        log::debug!("{} is not a usable font", path.display());
    }
    log::warn!(
        "no TTF font found (set {}); charts will be rendered without text",
        crate::config::ENV_FONT
    );
    false
}

/// Register the chart font once per process. Returns whether text can be drawn.
/// `preferred` only matters on the first call.
pub fn ensure_fonts(preferred: Option<&Path>) -> bool {
    *TEXT_ENABLED.get_or_init(|| load_and_register(preferred))
}
