//! Player-facing settings
//!
//! Read once at boot from an optional JSON blob (the canvas's
//! `data-settings` attribute in the browser). Missing fields fall back to
//! their defaults; nothing is written back.

use serde::Deserialize;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Shake on contact hits
    pub screen_shake: bool,
    /// Motion trails from the translucent background wash
    pub trails: bool,
    /// Explosion particles
    pub particles: bool,

    // === HUD ===
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (disables shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            trails: true,
            particles: true,

            show_fps: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Trails cost a full-screen blend every frame
        if preset == QualityPreset::Low {
            self.trails = false;
        }
    }

    /// Parse a (possibly partial) JSON settings object
    ///
    /// The quality preset is applied on top; an explicit `trails` key still
    /// wins over it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let trails = value.get("trails").and_then(serde_json::Value::as_bool);

        let mut settings: Self = serde_json::from_value(value)?;
        settings.apply_preset(settings.quality);
        if let Some(trails) = trails {
            settings.trails = trails;
        }
        Ok(settings)
    }

    /// Like [`Settings::from_json`], falling back to defaults on bad input
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        let Some(json) = json.filter(|j| !j.trim().is_empty()) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings ({} quality)", settings.quality.as_str());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring invalid settings: {e}");
                Self::default()
            }
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"quality":"high","muted":true}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.muted);
        assert!(settings.screen_shake);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert_eq!(Settings::from_json_or_default(Some("{nope")), Settings::default());
        assert_eq!(Settings::from_json_or_default(Some("  ")), Settings::default());
        assert_eq!(Settings::from_json_or_default(None), Settings::default());
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_particle_cap() {
        let mut settings = Settings::from_json(r#"{"quality":"low"}"#).unwrap();
        assert_eq!(settings.max_particles(), 100);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_low_quality_json_disables_trails() {
        let settings = Settings::from_json(r#"{"quality":"low"}"#).unwrap();
        assert!(!settings.trails);
        assert!(!Settings::from_json_or_default(Some(r#"{"quality":"low"}"#)).trails);
        assert!(Settings::from_json(r#"{"quality":"high"}"#).unwrap().trails);
    }

    #[test]
    fn test_explicit_trails_beat_preset() {
        let settings = Settings::from_json(r#"{"quality":"low","trails":true}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.trails);
    }
}
