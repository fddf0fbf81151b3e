use super::{SubmissionMessage, SubmissionState};
use crate::ui::messages::Message;
use iced::Task;
use iced::widget::image;
use quadim_studio::models::FormState;
use quadim_studio::utils::ProcessingClient;
use quadim_studio::utils::submission::dispatch;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub fn handle_message(
    state: &mut SubmissionState,
    form: &FormState,
    client: &Arc<ProcessingClient>,
    timeout: Duration,
    message: SubmissionMessage,
) -> Task<Message> {
    match message {
        SubmissionMessage::Submit => {
            let pending = match state.controller.begin(form) {
                Ok(pending) => pending,
                Err(e) => {
                    // Already rendered as an error by the controller
                    debug!("Submission not started: {}", e);
                    state.processed_handle = None;
                    return Task::none();
                }
            };

            // Shown before the request goes out
            state.original_handle = Some(image::Handle::from_bytes(
                pending.payload.image.bytes.to_vec(),
            ));
            state.processed_handle = None;

            Task::perform(dispatch(Arc::clone(client), pending, timeout), |completion| {
                Message::Submission(SubmissionMessage::Completed(completion))
            })
        }

        SubmissionMessage::Completed(completion) => {
            if !state.controller.complete(completion) {
                return Task::none();
            }

            state.processed_handle = None;
            match state.controller.processed_preview() {
                Some(url) => {
                    let url = url.to_string();
                    let client = Arc::clone(client);
                    Task::perform(
                        async move {
                            let result = client.fetch_output(&url).await;
                            (url, result)
                        },
                        |(url, result)| {
                            Message::Submission(SubmissionMessage::ProcessedImageLoaded {
                                url,
                                result,
                            })
                        },
                    )
                }
                None => Task::none(),
            }
        }

        SubmissionMessage::ProcessedImageLoaded { url, result } => {
            if state.controller.processed_preview() != Some(url.as_str()) {
                debug!("Dropping processed image for superseded result {}", url);
                return Task::none();
            }

            match result {
                Ok(bytes) => {
                    debug!("Loaded processed image ({} bytes)", bytes.len());
                    state.processed_handle = Some(image::Handle::from_bytes(bytes));
                }
                Err(e) => {
                    warn!("Failed to load processed image {}: {}", url, e);
                    state.processed_handle = None;
                }
            }
            Task::none()
        }
    }
}
