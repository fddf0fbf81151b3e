pub mod application;
pub mod messages;

// Workflow modules
pub mod parameters;
pub mod submission;

pub use application::QuadimStudio;
