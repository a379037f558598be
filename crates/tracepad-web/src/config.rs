#![forbid(unsafe_code)]

//! Configuration for both games, loadable from TOML or JSON.
//!
//! ```toml
//! # tracepad.toml
//! [api]
//! base_url = "http://localhost:5000"
//!
//! [ink]
//! darkness_cutoff = 100
//! min_dark_pixels = 500
//!
//! [tracing_game]
//! letters = ["A", "B", "C", "D"]
//! ```
//!
//! Every field defaults to the values the games shipped with, so an empty
//! file (or no file at all) reproduces the stock behaviour. The backend
//! origin can also be overridden with `TRACEPAD_API_BASE_URL`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracepad_core::SymbolSequence;
use tracepad_render::{GlyphStyle, InkThreshold, Rgba, supports_symbol};

use crate::letter_tracing::TracingSettings;
use crate::typing_drill::DrillSettings;
use crate::viewport::SurfacePolicy;

/// Environment variable overriding [`ApiConfig::base_url`].
pub const BASE_URL_ENV: &str = "TRACEPAD_API_BASE_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracepadConfig {
    pub api: ApiConfig,
    pub surface: SurfaceConfig,
    pub ink: InkConfig,
    pub tracing_game: TracingGameConfig,
    pub typing: TypingConfig,
}

impl TracepadConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load the effective configuration: the file at `path` if given (JSON
    /// when the extension is `.json`, TOML otherwise), then environment
    /// overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.extension().is_some_and(|ext| ext == "json") => {
                Self::from_json_file(path)?
            }
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        tracing::debug!(base_url = %config.api.base_url, "configuration loaded");
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in
    /// production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = base_url.trim().to_string();
        }
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let base = &self.api.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            errors.push(format!("api.base_url must be an http(s) URL, got {base:?}"));
        }
        if self.api.connect_timeout_ms == 0 {
            errors.push("api.connect_timeout_ms must be > 0".into());
        }
        if self.api.request_timeout_ms == 0 {
            errors.push("api.request_timeout_ms must be > 0".into());
        }

        let s = &self.surface;
        for (name, value) in [
            ("surface.width_fraction", s.width_fraction),
            ("surface.height_fraction", s.height_fraction),
            ("surface.font_ratio", s.font_ratio),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                errors.push(format!("{name} must be in (0, 1], got {value}"));
            }
        }
        for (name, value) in [
            ("surface.width_cap", s.width_cap),
            ("surface.height_cap", s.height_cap),
        ] {
            if !(value >= 1.0) {
                errors.push(format!("{name} must be >= 1, got {value}"));
            }
        }
        for (name, value) in [
            ("surface.absolute_cap", s.absolute_cap),
            ("surface.outline_divisor", s.outline_divisor),
            ("surface.brush_divisor", s.brush_divisor),
            ("surface.brush_min_width", s.brush_min_width),
        ] {
            if value == 0 {
                errors.push(format!("{name} must be > 0"));
            }
        }

        let cutoff = self.ink.darkness_cutoff;
        if cutoff == 0 {
            errors.push("ink.darkness_cutoff must be > 0".into());
        }
        for (name, raw, must_be_dark) in [
            ("surface.background", &s.background, false),
            ("surface.glyph_fill", &s.glyph_fill, false),
            ("surface.glyph_outline", &s.glyph_outline, false),
            ("surface.ink_color", &s.ink_color, true),
        ] {
            match raw.parse::<Rgba>() {
                Ok(color) if color.is_darker_than(cutoff) != must_be_dark => {
                    let expected = if must_be_dark { "darker" } else { "no darker" };
                    errors.push(format!(
                        "{name} {color} must be {expected} than ink.darkness_cutoff {cutoff}"
                    ));
                }
                Ok(_) => {}
                Err(err) => errors.push(format!("{name}: {err}")),
            }
        }

        if let Err(err) = SymbolSequence::new(self.tracing_game.letters.iter().copied()) {
            errors.push(format!("tracing_game.letters: {err}"));
        }
        for letter in &self.tracing_game.letters {
            if !supports_symbol(*letter) {
                errors.push(format!("tracing_game.letters: no glyph for {letter:?}"));
            }
        }

        if self.typing.total_words == 0 {
            errors.push("typing.total_words must be > 0".into());
        }
        if self.typing.fallback_words.is_empty() {
            errors.push("typing.fallback_words must not be empty".into());
        }
        if self.typing.fallback_words.iter().any(|w| w.trim().is_empty()) {
            errors.push("typing.fallback_words must not contain blank words".into());
        }

        errors
    }

    #[must_use]
    pub fn to_surface_policy(&self) -> SurfacePolicy {
        let s = &self.surface;
        SurfacePolicy {
            width_fraction: s.width_fraction,
            width_cap: s.width_cap,
            height_fraction: s.height_fraction,
            height_cap: s.height_cap,
            absolute_cap: s.absolute_cap,
            brush_min_width: s.brush_min_width,
            brush_divisor: s.brush_divisor,
        }
    }

    #[must_use]
    pub fn to_ink_threshold(&self) -> InkThreshold {
        InkThreshold {
            darkness_cutoff: self.ink.darkness_cutoff,
            min_dark_pixels: self.ink.min_dark_pixels,
        }
    }

    /// Settings for the tracing controller. Fails with the validation errors
    /// when the configuration is invalid.
    pub fn tracing_settings(&self) -> Result<TracingSettings, ConfigError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        let s = &self.surface;
        let color = |raw: &str| {
            raw.parse::<Rgba>()
                .map_err(|err| ConfigError::Validation(vec![err.to_string()]))
        };
        let sequence = SymbolSequence::new(self.tracing_game.letters.iter().copied())
            .map_err(|err| ConfigError::Validation(vec![err.to_string()]))?;
        Ok(TracingSettings {
            sequence,
            surface: self.to_surface_policy(),
            glyph: GlyphStyle {
                fill: color(&s.glyph_fill)?,
                outline: color(&s.glyph_outline)?,
                font_ratio: s.font_ratio,
                outline_min_width: s.outline_min_width,
                outline_divisor: s.outline_divisor,
            },
            ink: self.to_ink_threshold(),
            background: color(&s.background)?,
            ink_color: color(&s.ink_color)?,
            advance_delay: Duration::from_millis(self.tracing_game.advance_delay_ms),
            navigate_delay: Duration::from_millis(self.tracing_game.navigate_delay_ms),
        })
    }

    #[must_use]
    pub fn drill_settings(&self) -> DrillSettings {
        let t = &self.typing;
        DrillSettings {
            total_words: t.total_words,
            fallback_words: t.fallback_words.clone(),
            fallback_seed: t.fallback_seed,
            feedback_duration: Duration::from_millis(t.feedback_ms),
            navigate_delay: Duration::from_millis(t.navigate_delay_ms),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub fn to_client_options(&self) -> tracepad_api::ClientOptions {
        tracepad_api::ClientOptions {
            base_url: self.api.base_url.clone(),
            connect_timeout: Duration::from_millis(self.api.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.api.request_timeout_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: tracepad_api::endpoints::DEFAULT_BASE_URL.to_string(),
            connect_timeout_ms: 2_000,
            request_timeout_ms: 10_000,
        }
    }
}

/// Surface geometry and colours. Colours are CSS hex strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width_fraction: f32,
    pub width_cap: f32,
    pub height_fraction: f32,
    pub height_cap: f32,
    pub absolute_cap: u32,
    pub font_ratio: f32,
    pub outline_min_width: u32,
    pub outline_divisor: u32,
    pub brush_min_width: u32,
    pub brush_divisor: u32,
    pub background: String,
    pub glyph_fill: String,
    pub glyph_outline: String,
    pub ink_color: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        let policy = SurfacePolicy::default();
        let glyph = GlyphStyle::default();
        Self {
            width_fraction: policy.width_fraction,
            width_cap: policy.width_cap,
            height_fraction: policy.height_fraction,
            height_cap: policy.height_cap,
            absolute_cap: policy.absolute_cap,
            font_ratio: glyph.font_ratio,
            outline_min_width: glyph.outline_min_width,
            outline_divisor: glyph.outline_divisor,
            brush_min_width: policy.brush_min_width,
            brush_divisor: policy.brush_divisor,
            background: Rgba::WHITE.to_string(),
            glyph_fill: glyph.fill.to_string(),
            glyph_outline: glyph.outline.to_string(),
            ink_color: Rgba::BLACK.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkConfig {
    pub darkness_cutoff: u8,
    pub min_dark_pixels: usize,
}

impl Default for InkConfig {
    fn default() -> Self {
        let threshold = InkThreshold::default();
        Self {
            darkness_cutoff: threshold.darkness_cutoff,
            min_dark_pixels: threshold.min_dark_pixels,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingGameConfig {
    pub letters: Vec<char>,
    /// How long the success message stays up before the next letter.
    pub advance_delay_ms: u64,
    /// Pause between the completion message and leaving the game.
    pub navigate_delay_ms: u64,
}

impl Default for TracingGameConfig {
    fn default() -> Self {
        Self {
            letters: SymbolSequence::default().symbols().to_vec(),
            advance_delay_ms: 1_500,
            navigate_delay_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub total_words: usize,
    pub fallback_words: Vec<String>,
    /// Seed for fallback word selection. Derived from the session when unset.
    pub fallback_seed: Option<u64>,
    pub feedback_ms: u64,
    pub navigate_delay_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            total_words: 10,
            fallback_words: ["cat", "dog", "sun", "tree", "book"]
                .into_iter()
                .map(String::from)
                .collect(),
            fallback_seed: None,
            feedback_ms: 1_500,
            navigate_delay_ms: 2_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_matches_component_defaults() {
        let config = TracepadConfig::default();
        assert_eq!(config.to_surface_policy(), SurfacePolicy::default());
        assert_eq!(config.to_ink_threshold(), InkThreshold::default());

        let settings = config.tracing_settings().expect("settings");
        assert_eq!(settings.glyph, GlyphStyle::default());
        assert_eq!(settings.background, Rgba::WHITE);
        assert_eq!(settings.ink_color, Rgba::BLACK);
        assert_eq!(settings.sequence, SymbolSequence::default());
        assert_eq!(settings.advance_delay, Duration::from_millis(1_500));

        let drill = config.drill_settings();
        assert_eq!(drill.total_words, 10);
        assert_eq!(drill.fallback_words.len(), 5);
    }

    #[test]
    fn default_validates_clean() {
        let errors = TracepadConfig::default().validate();
        assert!(errors.is_empty(), "default should validate: {errors:?}");
    }

    #[test]
    fn validate_catches_bad_fraction() {
        let mut config = TracepadConfig::default();
        config.surface.width_fraction = 0.0;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("surface.width_fraction")));
    }

    #[test]
    fn validate_catches_light_ink_and_dark_guide() {
        let mut config = TracepadConfig::default();
        config.surface.ink_color = "#CCCCCC".into();
        config.surface.glyph_outline = "#101010".into();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("surface.ink_color")));
        assert!(errors.iter().any(|e| e.contains("surface.glyph_outline")));
    }

    #[test]
    fn validate_catches_bad_letters() {
        let mut config = TracepadConfig::default();
        config.tracing_game.letters = vec!['A', 'A', '3'];
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("more than once")));
        assert!(errors.iter().any(|e| e.contains("no glyph")));
        assert!(matches!(
            config.tracing_settings(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_catches_unparseable_colour() {
        let mut config = TracepadConfig::default();
        config.surface.background = "white".into();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("surface.background")));
    }

    #[test]
    fn partial_override_preserves_defaults() {
        let config = TracepadConfig::from_toml_str(
            r#"
            [ink]
            min_dark_pixels = 800

            [tracing_game]
            letters = ["X", "Y"]
            "#,
        )
        .expect("toml");
        assert_eq!(config.ink.min_dark_pixels, 800);
        assert_eq!(config.ink.darkness_cutoff, 100);
        assert_eq!(config.tracing_game.letters, vec!['X', 'Y']);
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.typing, TypingConfig::default());
    }

    #[test]
    fn json_and_toml_agree() {
        let from_json =
            TracepadConfig::from_json_str(r#"{"typing":{"total_words":3}}"#).expect("json");
        let from_toml = TracepadConfig::from_toml_str("[typing]\ntotal_words = 3\n").expect("toml");
        assert_eq!(from_json, from_toml);
    }

    #[test]
    fn env_override_replaces_base_url() {
        let mut config = TracepadConfig::default();
        config.apply_overrides(|key| (key == BASE_URL_ENV).then(|| "https://api.example".into()));
        assert_eq!(config.api.base_url, "https://api.example");

        config.apply_overrides(|_| Some("   ".into()));
        assert_eq!(config.api.base_url, "https://api.example");
    }

    #[test]
    fn load_reads_file_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json_path = dir.path().join("tracepad.json");
        let mut file = std::fs::File::create(&json_path).expect("create");
        write!(file, r#"{{"ink":{{"min_dark_pixels":42}}}}"#).expect("write");
        drop(file);
        let config = TracepadConfig::from_json_file(&json_path).expect("json file");
        assert_eq!(config.ink.min_dark_pixels, 42);

        let toml_path = dir.path().join("tracepad.toml");
        std::fs::write(&toml_path, "[surface]\nabsolute_cap = 0\n").expect("write");
        match TracepadConfig::load(Some(&toml_path)) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("surface.absolute_cap")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TracepadConfig::from_toml_file("/definitely/not/here.toml").expect_err("io");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
