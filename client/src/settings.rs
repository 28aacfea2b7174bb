use gloo_storage::Storage;
use hexmap_shared::{Color, EngineConfig, PaintAttributes};

const SETTINGS_KEY: &str = "hexmap_settings";

/// Everything remembered between sessions.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineConfig,
    pub paint_color: Color,
    pub icon_color: Color,
}

impl Default for Settings {
    fn default() -> Self {
        let paint = PaintAttributes::default();
        Self {
            engine: EngineConfig::default(),
            paint_color: paint.color,
            icon_color: paint.icon_color,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        let saved: Settings = gloo_storage::LocalStorage::get(SETTINGS_KEY).unwrap_or_default();
        saved.normalized()
    }

    pub fn save(&self) {
        if let Err(e) = gloo_storage::LocalStorage::set(SETTINGS_KEY, self) {
            web_sys::console::warn_1(&format!("failed to persist settings: {e}").into());
        }
    }

    fn normalized(mut self) -> Self {
        self.engine = self.engine.sanitized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_payload_fills_missing_fields() {
        let raw = r##"{"paint_color": "#ff0000"}"##;
        let settings: Settings = serde_json::from_str(raw).expect("parse settings");
        assert_eq!(settings.paint_color, Color::from("#ff0000"));
        assert_eq!(settings.icon_color, Settings::default().icon_color);
        assert_eq!(settings.engine, EngineConfig::default());
    }

    #[test]
    fn nonsense_engine_values_are_replaced() {
        let raw = r#"{"engine": {"hex_size": 0, "wheel_zoom_step": 12.5}}"#;
        let settings: Settings = serde_json::from_str(raw).expect("parse settings");
        let engine = settings.normalized().engine;
        assert_eq!(engine.hex_size, EngineConfig::default().hex_size);
        assert_eq!(engine.wheel_zoom_step, 12.5);
    }
}
