//! Presentation palette. The store treats colors as opaque strings; this is
//! the only place that knows what they look like on screen. Two palette
//! generations exist in stored data: the current hex swatches and the older
//! lowercase labels (`red`, `blue`, ...), so lookups accept both.

use ratatui::style::Color;

use crate::models::HighlightColor;

/// One entry in the current highlight palette.
pub(crate) struct PaletteEntry {
    pub(crate) hex: &'static str,
    pub(crate) label: &'static str,
    pub(crate) border: &'static str,
}

/// Swatches offered by the highlight picker, in display order.
pub(crate) const HIGHLIGHT_COLORS: &[PaletteEntry] = &[
    PaletteEntry {
        hex: "#251413",
        label: "Red",
        border: "#521800",
    },
    PaletteEntry {
        hex: "#10212D",
        label: "Blue",
        border: "#02356C",
    },
    PaletteEntry {
        hex: "#132522",
        label: "Green",
        border: "#00523C",
    },
    PaletteEntry {
        hex: "#251F13",
        label: "Orange",
        border: "#524300",
    },
];

impl PaletteEntry {
    pub(crate) fn color(&self) -> HighlightColor {
        HighlightColor::from(self.hex)
    }
}

/// Find the palette entry for a stored value, by hex or by legacy label.
fn lookup(color: &HighlightColor) -> Option<&'static PaletteEntry> {
    let raw = color.as_str().trim();
    HIGHLIGHT_COLORS
        .iter()
        .find(|entry| entry.hex.eq_ignore_ascii_case(raw))
        .or_else(|| {
            HIGHLIGHT_COLORS
                .iter()
                .find(|entry| entry.label.eq_ignore_ascii_case(raw))
        })
}

/// Human label for a stored color; unknown values are shown verbatim.
pub(crate) fn label_for(color: &HighlightColor) -> String {
    lookup(color)
        .map(|entry| entry.label.to_string())
        .unwrap_or_else(|| color.to_string())
}

/// Card background for a stored color. Legacy labels render as the bright
/// terminal color of the same name so old highlights stay recognisable.
pub(crate) fn swatch(color: &HighlightColor) -> Option<Color> {
    let raw = color.as_str().trim();
    if let Some(rgb) = parse_hex(raw) {
        return Some(rgb);
    }
    match raw.to_ascii_lowercase().as_str() {
        "red" => Some(Color::Red),
        "blue" => Some(Color::Blue),
        "green" => Some(Color::Green),
        "orange" => Some(Color::Rgb(0xFF, 0xA5, 0x00)),
        _ => None,
    }
}

/// Card border for a stored color, when it belongs to the palette.
pub(crate) fn border(color: &HighlightColor) -> Option<Color> {
    lookup(color).and_then(|entry| parse_hex(entry.border))
}

fn parse_hex(raw: &str) -> Option<Color> {
    let digits = raw.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_hex_in_either_case() {
        assert_eq!(label_for(&"#251413".into()), "Red");
        assert_eq!(label_for(&"#10212d".into()), "Blue");
    }

    #[test]
    fn labels_legacy_names() {
        assert_eq!(label_for(&"green".into()), "Green");
        assert_eq!(label_for(&"Orange".into()), "Orange");
    }

    #[test]
    fn unknown_colors_show_raw_value() {
        assert_eq!(label_for(&"#abcdef".into()), "#abcdef");
        assert_eq!(label_for(&"teal".into()), "teal");
    }

    #[test]
    fn swatches() {
        assert_eq!(swatch(&"#251413".into()), Some(Color::Rgb(0x25, 0x14, 0x13)));
        assert_eq!(swatch(&"red".into()), Some(Color::Red));
        assert_eq!(swatch(&"#12345".into()), None);
        assert_eq!(swatch(&"teal".into()), None);
    }

    #[test]
    fn borders_only_for_palette_members() {
        assert_eq!(border(&"#132522".into()), Some(Color::Rgb(0x00, 0x52, 0x3C)));
        assert_eq!(border(&"blue".into()), Some(Color::Rgb(0x02, 0x35, 0x6C)));
        assert_eq!(border(&"#abcdef".into()), None);
    }
}
