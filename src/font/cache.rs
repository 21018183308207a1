//! Process-wide font cache.
//!
//! Fonts are fetched and parsed once per source string and shared by every
//! report built afterwards. Concurrent builders may race to load the same
//! font; the first insert wins and the loser's copy is dropped.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use super::{CustomFont, FontData, FontHandle};
use crate::assets;
use crate::error::Result;

static FONT_CACHE: OnceLock<RwLock<HashMap<String, FontHandle>>> = OnceLock::new();

fn cache() -> &'static RwLock<HashMap<String, FontHandle>> {
    FONT_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Fetch, parse and cache the font at `src`, or return the cached handle.
pub fn load_font(src: &str) -> Result<FontHandle> {
    if let Some(handle) = lookup(src) {
        return Ok(handle);
    }

    let data = assets::load_bytes(src)?;
    let font = CustomFont::parse(&font_name_for(src), data)?;
    log::debug!("loaded font '{}' ({} glyphs)", font.name, font.metrics.glyph_ids.len());
    let handle: FontHandle = Arc::new(FontData::Custom(font));

    let mut map = cache().write().unwrap_or_else(|poisoned| poisoned.into_inner());
    Ok(map.entry(src.to_string()).or_insert(handle).clone())
}

/// Return a cached handle without loading.
pub fn lookup(src: &str) -> Option<FontHandle> {
    let map = cache().read().unwrap_or_else(|poisoned| poisoned.into_inner());
    map.get(src).cloned()
}

/// File stem for paths, a generic name for inline payloads.
fn font_name_for(src: &str) -> String {
    if src.starts_with('/') || src.starts_with("./") || src.starts_with("../") {
        if let Some(stem) = Path::new(src).file_stem().and_then(|s| s.to_str()) {
            return stem.to_string();
        }
    }
    "CustomFont".to_string()
}
