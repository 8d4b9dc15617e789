//! Effect settings and preferences
//!
//! Persisted in LocalStorage as JSON. Missing keys fall back to defaults and
//! unknown keys are ignored, so older saves keep loading.

use serde::{Deserialize, Serialize};

use crate::burst::{BurstConfig, BurstOptions};
use crate::transition::TransitionConfig;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
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

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
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

/// Site-wide effect preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxSettings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Effects ===
    /// Click bursts
    pub particles: bool,
    /// Scene transitions on navigation (off = navigate immediately)
    pub transitions: bool,

    /// Burst overrides applied to every click
    pub burst: BurstOptions,
    /// Transition tuning
    pub transition: TransitionConfig,

    // === Accessibility ===
    /// Reduced motion (no flash, no swirl)
    pub reduced_motion: bool,
}

impl Default for FxSettings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            transitions: true,
            burst: BurstOptions::site_defaults(),
            transition: TransitionConfig::default(),
            reduced_motion: false,
        }
    }
}

impl FxSettings {
    /// LocalStorage key
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "retro_fx_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings JSON; unknown keys are ignored
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Click burst options with accessibility applied
    pub fn effective_burst(&self) -> BurstOptions {
        let mut options = self.burst.clone();
        if self.reduced_motion {
            options.swirl = Some(false);
        }
        options
    }

    /// Base burst config with accessibility applied
    pub fn effective_burst_config(&self) -> BurstConfig {
        BurstConfig::default().with_options(&self.effective_burst())
    }

    /// Transition tuning with accessibility applied
    pub fn effective_transition(&self) -> TransitionConfig {
        let mut config = self.transition.clone();
        if self.reduced_motion {
            config.flash = false;
        }
        config
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = FxSettings::default();
        assert_eq!(settings.max_particles(), 500);
        assert_eq!(FxSettings::STORAGE_KEY, "retro_fx_settings");
        assert_eq!(settings.burst.speed, Some(1.1));
        assert!(settings.effective_transition().flash);
        assert!(settings.effective_burst_config().validate().is_ok());
    }

    #[test]
    fn test_particles_off_caps_at_zero() {
        let settings = FxSettings {
            particles: false,
            ..FxSettings::from_preset(QualityPreset::High)
        };
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_reduced_motion() {
        let settings = FxSettings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_transition().flash);
        assert_eq!(settings.effective_burst().swirl, Some(false));
        assert!(!settings.effective_burst_config().swirl);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{"quality": "Low", "transition": {"modes": ["iris"]}, "volume": 3}"#;
        let settings = FxSettings::from_json(json).unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.transition.modes.len(), 1);
        assert_eq!(settings.transition.failsafe_ms, 1200.0);
        assert!(settings.particles);

        let back = FxSettings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }
}
