// Public library interface for quadim-studio
//
// The form model, preset registry and submission flow live here so they can
// be driven without the GUI.

pub mod models;
pub mod utils;
