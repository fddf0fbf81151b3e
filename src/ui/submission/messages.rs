use quadim_studio::utils::SubmitError;
use quadim_studio::utils::submission::SubmissionCompletion;

#[derive(Debug, Clone)]
pub enum SubmissionMessage {
    Submit,
    Completed(SubmissionCompletion),
    ProcessedImageLoaded {
        url: String,
        result: Result<Vec<u8>, SubmitError>,
    },
}
