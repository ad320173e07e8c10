//! Display names for the fixed color and shape palettes. Indices beyond the
//! named palettes fall back to a numbered label.

pub const COLOR_NAMES: [&str; 8] = [
    "red", "orange", "yellow", "green", "cyan", "blue", "purple", "pink",
];

pub const SHAPE_NAMES: [&str; 8] = [
    "star",
    "square",
    "triangle",
    "circle",
    "inverted triangle",
    "heart",
    "diamond",
    "fish",
];

pub fn color_name(index: u8) -> String {
    COLOR_NAMES
        .get(index as usize)
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| format!("color {index}"))
}

pub fn shape_name(index: u8) -> String {
    SHAPE_NAMES
        .get(index as usize)
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| format!("shape {index}"))
}
