pub mod config;
pub mod presets;
pub mod processing_client;
pub mod submission;

pub use config::{StaleResponsePolicy, StudioConfig};
pub use presets::{PresetRegistry, apply_preset};
pub use processing_client::{ProcessingClient, ProcessingEndpoint, SubmitError};
pub use submission::SubmissionController;
