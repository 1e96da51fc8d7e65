use serde::Serialize;
use wasm_bindgen::prelude::*;

use selah::{Catalog, PitchClass, SelahError};

#[derive(Serialize)]
struct LoadError {
    message: String,
}

#[derive(Serialize)]
struct SongSummary<'a> {
    id: &'a str,
    title: &'a str,
    artist: Option<&'a str>,
    original_key: Option<&'a str>,
}

fn error_to_js(e: SelahError) -> JsValue {
    let error = LoadError {
        message: e.to_string(),
    };
    JsValue::from_str(&serde_json::to_string(&error).unwrap_or_else(|_| e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Fails only when a logger is already installed
    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Info).ok();

    log::info!("Selah WASM module initialized");
}

/// Transpose a chord sheet; unchanged when either key is missing or unknown
#[wasm_bindgen]
pub fn transpose_text(
    text: &str,
    original_key: Option<String>,
    target_key: Option<String>,
) -> String {
    selah::transpose_text(text, original_key.as_deref(), target_key.as_deref()).into_owned()
}

/// Index 0-11 of a root spelling, or undefined when it is not a pitch class
#[wasm_bindgen]
pub fn normalize_root(spelling: &str) -> Option<u8> {
    selah::normalize_root(spelling).map(PitchClass::index)
}

#[wasm_bindgen]
pub fn detect_key(text: &str) -> String {
    selah::detect_key(text).name().to_string()
}

#[wasm_bindgen]
pub fn slugify(title: &str, artist: &str) -> String {
    selah::slugify(title, artist)
}

/// The 12 keys offered in the key picker
#[wasm_bindgen]
pub fn keys() -> Vec<String> {
    PitchClass::ALL.iter().map(|key| key.name().to_string()).collect()
}

/// Search a database export for songs matching `query`, sorted by title.
///
/// `snapshot_json` is the value delivered for the collection (an object of
/// id -> record, or null). Returns an array of summaries.
#[wasm_bindgen]
pub fn search_songs(snapshot_json: &str, query: &str) -> Result<JsValue, JsValue> {
    let catalog = selah::source::parse_snapshot(snapshot_json, "")
        .map(Catalog::from_snapshot)
        .map_err(error_to_js)?;

    let summaries: Vec<SongSummary> = catalog
        .entries()
        .filter(|(_, song)| song.matches(query))
        .map(|(id, song)| SongSummary {
            id,
            title: &song.title,
            artist: song.artist(),
            original_key: song.original_key.as_deref(),
        })
        .collect();

    serde_wasm_bindgen::to_value(&summaries).map_err(|e| JsValue::from_str(&e.to_string()))
}
