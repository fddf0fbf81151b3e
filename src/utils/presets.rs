use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::models::{FormState, ParameterSet, Preset, StyleChoice};

/// Shapes understood by the processing engine.
pub const SHAPES: [&str; 5] = ["rect", "circle", "cross", "yr-add", "yr-mul"];

/// Aspect ratios offered by the selector. Any `W:H` string is still accepted.
pub const RATIOS: [&str; 5] = ["1:1", "4:3", "3:2", "16:9", "2:1"];

static PRESETS: Lazy<Vec<Preset>> = Lazy::new(|| {
    vec![
        Preset {
            name: "circle-trans",
            parameters: ParameterSet::new("1:1", "5", "circle", "transparent", "#444444", "1"),
        },
        Preset {
            name: "bw-block",
            parameters: ParameterSet::new("1:1", "6", "rect", "white", "black", "2"),
        },
        Preset {
            name: "color-thick",
            parameters: ParameterSet::new("3:2", "4", "rect", "#ffffff", "#ff0055", "10"),
        },
        Preset {
            name: "low-depth",
            parameters: ParameterSet::new("16:9", "2", "cross", "", "#0033aa", "3"),
        },
    ]
});

/// Read-only view of the built-in style presets
pub struct PresetRegistry;

impl PresetRegistry {
    /// All presets in display order
    pub fn presets() -> &'static [Preset] {
        &PRESETS
    }

    /// Look up a preset by its style key
    pub fn get(key: &str) -> Option<&'static Preset> {
        PRESETS.iter().find(|p| p.name == key)
    }

    /// Style selector entries, starting with the "no preset" sentinel
    pub fn choices() -> Vec<StyleChoice> {
        std::iter::once(StyleChoice::Custom)
            .chain(PRESETS.iter().map(|p| StyleChoice::Preset(p.name)))
            .collect()
    }
}

/// Overwrite all six form parameters with the preset named `key`.
///
/// Unknown keys leave the form untouched. Returns whether a preset was applied.
pub fn apply_preset(key: &str, form: &mut FormState) -> bool {
    match PresetRegistry::get(key) {
        Some(preset) => {
            // One assignment: the parameters are never partially updated
            form.parameters = preset.parameters.clone();
            info!("Applied style preset: {}", preset.name);
            true
        }
        None => {
            debug!("Ignoring unknown style key: {:?}", key);
            false
        }
    }
}
