use iced::widget::image;
use quadim_studio::utils::{StaleResponsePolicy, SubmissionController};

#[derive(Debug, Clone)]
pub struct SubmissionState {
    pub controller: SubmissionController,
    pub original_handle: Option<image::Handle>,  // Decoded from memory at submit time
    pub processed_handle: Option<image::Handle>, // Only set after a successful fetch
}

impl SubmissionState {
    pub fn new(policy: StaleResponsePolicy) -> Self {
        Self {
            controller: SubmissionController::new(policy),
            original_handle: None,
            processed_handle: None,
        }
    }

    /// Processed image to draw, if the current render state allows one
    pub fn processed_image(&self) -> Option<&image::Handle> {
        self.controller
            .processed_preview()
            .and(self.processed_handle.as_ref())
    }
}
