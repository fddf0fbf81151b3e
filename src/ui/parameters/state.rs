use quadim_studio::models::{FormState, StyleChoice};
use quadim_studio::utils::PresetRegistry;
use quadim_studio::utils::presets::{RATIOS, SHAPES};

#[derive(Debug, Clone)]
pub struct ParametersState {
    pub form: FormState,
    pub selected_style: StyleChoice,
    pub style_choices: Vec<StyleChoice>,
    pub ratio_choices: Vec<String>,
    pub shape_choices: Vec<String>,
    pub is_picking_image: bool,
}

impl ParametersState {
    pub fn new() -> Self {
        Self {
            form: FormState::new(),
            selected_style: StyleChoice::Custom,
            style_choices: PresetRegistry::choices(),
            ratio_choices: RATIOS.iter().map(|r| r.to_string()).collect(),
            shape_choices: SHAPES.iter().map(|s| s.to_string()).collect(),
            is_picking_image: false,
        }
    }

    pub fn has_image(&self) -> bool {
        self.form.image.is_some()
    }
}

impl Default for ParametersState {
    fn default() -> Self {
        Self::new()
    }
}
