use crate::ui::{parameters::ParametersMessage, submission::SubmissionMessage};

#[derive(Debug, Clone)]
pub enum Message {
    // App-level messages
    ShowError(String),
    DismissError,

    // Module-specific message variants
    Parameters(ParametersMessage),
    Submission(SubmissionMessage),
}
