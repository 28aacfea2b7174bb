use hexmap_shared::config::{
    DEFAULT_ACCENT, DEFAULT_BACKGROUND, DEFAULT_BORDER, DEFAULT_FOREGROUND,
};
use hexmap_shared::{Color, Theme};

/// Resolve the map theme from the page's CSS custom properties.
///
/// Variables hold bare HSL components (`"270 100% 7%"`); unset ones fall back
/// to the built-in palette.
pub fn read_css_theme() -> Theme {
    let style = web_sys::window().and_then(|window| {
        let root = window.document()?.document_element()?;
        window.get_computed_style(&root).ok().flatten()
    });
    let Some(style) = style else {
        web_sys::console::warn_1(&"computed style unavailable; using default theme".into());
        return Theme::default();
    };
    let var = |name: &str| style.get_property_value(name).unwrap_or_default();

    Theme {
        background: theme_color(&var("--background"), DEFAULT_BACKGROUND),
        border: theme_color(&var("--border"), DEFAULT_BORDER),
        accent: theme_color(&var("--accent"), DEFAULT_ACCENT),
        foreground: theme_color(&var("--foreground"), DEFAULT_FOREGROUND),
    }
}

fn theme_color(raw: &str, fallback: &str) -> Color {
    let raw = raw.trim();
    if raw.is_empty() {
        return Color::from(fallback);
    }
    if raw.starts_with('#') || raw.contains('(') {
        return Color::from(raw);
    }
    Color::new(format!("hsl({raw})"))
}
