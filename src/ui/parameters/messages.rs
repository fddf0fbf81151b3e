use quadim_studio::models::{ImageFile, ParameterField, StyleChoice};

#[derive(Debug, Clone)]
pub enum ParametersMessage {
    SelectStyle(StyleChoice),          // Apply a preset (Custom leaves fields alone)
    SetField(ParameterField, String),  // Direct edit of one parameter
    PickImage,                         // Open the file dialog
    ImagePicked(Option<ImageFile>),    // None when the dialog was dismissed
    ImageLoadFailed(String),
}
