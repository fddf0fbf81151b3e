use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::models::{FormState, ImageFile, RenderState, SubmissionOutcome};
use crate::utils::config::StaleResponsePolicy;
use crate::utils::processing_client::{ProcessingEndpoint, SubmissionPayload, SubmitError};

pub const SUCCESS_MESSAGE: &str = "✅ Processing succeeded!";
pub const FAILURE_MARKER: &str = "❌ Error: ";
pub const SUBMITTING_MESSAGE: &str = "Processing...";
pub const GENERIC_FAILURE: &str =
    "the processing service could not be reached or sent an invalid response";

/// Monotonic id of a submission, used to recognise stale responses
pub type Generation = u64;

/// A submission that has been started but not yet sent
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub generation: Generation,
    pub payload: SubmissionPayload,
}

/// Result of one request, tagged with the submission it belongs to
#[derive(Debug, Clone)]
pub struct SubmissionCompletion {
    pub generation: Generation,
    pub result: Result<SubmissionOutcome, SubmitError>,
}

/// Append the cache-defeating `t=<millis>` token to the query.
///
/// Works on relative references too; a fragment stays at the end so the
/// token is still sent to the server.
pub fn with_cache_token(url: &str, millis: i64) -> String {
    let (resource, fragment) = match url.split_once('#') {
        Some((resource, fragment)) => (resource, Some(fragment)),
        None => (url, None),
    };
    let separator = if resource.contains('?') { '&' } else { '?' };

    match fragment {
        Some(fragment) => format!("{}{}t={}#{}", resource, separator, millis, fragment),
        None => format!("{}{}t={}", resource, separator, millis),
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Send a pending submission, bounded by `timeout`.
///
/// Every failure is folded into the completion; nothing escapes this call.
pub async fn dispatch<E: ProcessingEndpoint>(
    endpoint: Arc<E>,
    pending: PendingSubmission,
    timeout: Duration,
) -> SubmissionCompletion {
    let generation = pending.generation;
    let result = match tokio::time::timeout(timeout, endpoint.submit(pending.payload)).await {
        Ok(result) => result,
        Err(_) => Err(SubmitError::Timeout(timeout)),
    };

    SubmissionCompletion { generation, result }
}

/// Drives one submit-to-render cycle and owns what the result area shows
#[derive(Debug, Clone)]
pub struct SubmissionController {
    render: RenderState,
    original_preview: Option<ImageFile>,
    latest_generation: Generation,
    in_flight: usize,
    policy: StaleResponsePolicy,
}

impl Default for SubmissionController {
    fn default() -> Self {
        Self::new(StaleResponsePolicy::default())
    }
}

impl SubmissionController {
    pub fn new(policy: StaleResponsePolicy) -> Self {
        Self {
            render: RenderState::Idle,
            original_preview: None,
            latest_generation: 0,
            in_flight: 0,
            policy,
        }
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render
    }

    pub fn original_preview(&self) -> Option<&ImageFile> {
        self.original_preview.as_ref()
    }

    /// Cache-busted reference of the processed image, only after a success
    pub fn processed_preview(&self) -> Option<&str> {
        match &self.render {
            RenderState::Success { output_url } => Some(output_url),
            _ => None,
        }
    }

    pub fn result_message(&self) -> Option<String> {
        match &self.render {
            RenderState::Idle => None,
            RenderState::Submitting => Some(SUBMITTING_MESSAGE.to_string()),
            RenderState::Success { .. } => Some(SUCCESS_MESSAGE.to_string()),
            RenderState::Error { message } => Some(format!("{}{}", FAILURE_MARKER, message)),
        }
    }

    /// Whether the result area is waiting on the latest submission
    pub fn is_submitting(&self) -> bool {
        self.render == RenderState::Submitting
    }

    /// Requests not yet completed, including ones whose responses will be
    /// discarded as stale
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn latest_generation(&self) -> Generation {
        self.latest_generation
    }

    pub fn policy(&self) -> StaleResponsePolicy {
        self.policy
    }

    /// Start a submission from the current form.
    ///
    /// Shows the original image right away, before anything is sent. Fails
    /// fast when no image is selected.
    pub fn begin(&mut self, form: &FormState) -> Result<PendingSubmission, SubmitError> {
        let Some(image) = form.image.clone() else {
            warn!("Submit requested without an image");
            self.render = RenderState::Error {
                message: SubmitError::MissingImage.to_string(),
            };
            return Err(SubmitError::MissingImage);
        };

        self.original_preview = Some(image.clone());
        self.latest_generation += 1;
        self.in_flight += 1;
        self.render = RenderState::Submitting;

        info!(
            "Starting submission #{} for {} with {:?}",
            self.latest_generation, image.file_name, form.parameters
        );

        Ok(PendingSubmission {
            generation: self.latest_generation,
            payload: SubmissionPayload {
                parameters: form.parameters.clone(),
                image,
            },
        })
    }

    /// Render a finished request. Returns false if it was discarded as stale.
    pub fn complete(&mut self, completion: SubmissionCompletion) -> bool {
        self.complete_at(completion, now_millis())
    }

    fn complete_at(&mut self, completion: SubmissionCompletion, millis: i64) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        if completion.generation != self.latest_generation
            && self.policy == StaleResponsePolicy::DiscardStale
        {
            debug!(
                "Discarding response for submission #{} (latest is #{})",
                completion.generation, self.latest_generation
            );
            return false;
        }

        self.render = match completion.result {
            Ok(SubmissionOutcome::Processed { output_url }) => {
                info!("Submission #{} processed: {}", completion.generation, output_url);
                RenderState::Success {
                    output_url: with_cache_token(&output_url, millis),
                }
            }
            Ok(SubmissionOutcome::Rejected { message }) => {
                warn!("Submission #{} rejected: {}", completion.generation, message);
                RenderState::Error { message }
            }
            Err(e) => {
                warn!("Submission #{} failed: {}", completion.generation, e);
                let message = if e.is_transport() {
                    GENERIC_FAILURE.to_string()
                } else {
                    e.to_string()
                };
                RenderState::Error { message }
            }
        };

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParameterSet;
    use crate::utils::presets::apply_preset;
    use std::future::Future;

    struct ScriptedEndpoint(Result<SubmissionOutcome, SubmitError>);

    impl ProcessingEndpoint for ScriptedEndpoint {
        fn submit(
            &self,
            _payload: SubmissionPayload,
        ) -> impl Future<Output = Result<SubmissionOutcome, SubmitError>> + Send {
            std::future::ready(self.0.clone())
        }
    }

    struct HangingEndpoint;

    impl ProcessingEndpoint for HangingEndpoint {
        fn submit(
            &self,
            _payload: SubmissionPayload,
        ) -> impl Future<Output = Result<SubmissionOutcome, SubmitError>> + Send {
            std::future::pending()
        }
    }

    fn form_with_image() -> FormState {
        let mut form = FormState::new();
        form.image = Some(ImageFile::new("cat.png", vec![0x89u8, b'P', b'N', b'G']));
        form
    }

    fn processed(url: &str) -> Result<SubmissionOutcome, SubmitError> {
        Ok(SubmissionOutcome::Processed {
            output_url: url.to_string(),
        })
    }

    fn rejected(message: &str) -> Result<SubmissionOutcome, SubmitError> {
        Ok(SubmissionOutcome::Rejected {
            message: message.to_string(),
        })
    }

    #[test]
    fn test_cache_token() {
        assert_eq!(with_cache_token("/img/42.png", 17), "/img/42.png?t=17");
        assert_eq!(with_cache_token("/img/42.png?v=2", 17), "/img/42.png?v=2&t=17");
    }

    #[test]
    fn test_cache_token_goes_before_fragment() {
        assert_eq!(with_cache_token("/img/42.png#view", 17), "/img/42.png?t=17#view");
        assert_eq!(
            with_cache_token("http://host/img/42.png?v=2#a#b", 17),
            "http://host/img/42.png?v=2&t=17#a#b"
        );
    }

    #[test]
    fn test_begin_shows_original_and_packages_form() {
        let mut controller = SubmissionController::default();
        let mut form = form_with_image();
        apply_preset("color-thick", &mut form);

        let pending = controller.begin(&form).unwrap();

        assert_eq!(controller.original_preview(), form.image.as_ref());
        assert_eq!(controller.render_state(), &RenderState::Submitting);
        assert_eq!(controller.processed_preview(), None);
        assert_eq!(pending.generation, 1);
        assert_eq!(
            pending.payload.parameters,
            ParameterSet::new("3:2", "4", "rect", "#ffffff", "#ff0055", "10")
        );
        assert_eq!(Some(&pending.payload.image), form.image.as_ref());
    }

    #[test]
    fn test_missing_image_fails_fast() {
        let mut controller = SubmissionController::default();
        let result = controller.begin(&FormState::new());

        assert!(matches!(result, Err(SubmitError::MissingImage)));
        assert_eq!(controller.latest_generation(), 0);
        assert!(!controller.is_submitting());
        assert_eq!(controller.original_preview(), None);
        assert_eq!(controller.processed_preview(), None);
        let message = controller.result_message().unwrap();
        assert!(message.starts_with(FAILURE_MARKER));
        assert!(message.contains("No image selected"));
    }

    #[tokio::test]
    async fn test_success_renders_cache_busted_url() {
        let mut controller = SubmissionController::default();
        let pending = controller.begin(&form_with_image()).unwrap();
        let endpoint = Arc::new(ScriptedEndpoint(processed("/img/42.png")));

        let before = chrono::Utc::now().timestamp_millis();
        let completion = dispatch(endpoint, pending, Duration::from_secs(5)).await;
        assert!(controller.complete(completion));
        let after = chrono::Utc::now().timestamp_millis();

        let url = controller.processed_preview().unwrap();
        let token: i64 = url
            .strip_prefix("/img/42.png?t=")
            .expect("cache token appended")
            .parse()
            .unwrap();
        assert!(before <= token && token <= after);
        assert_eq!(controller.result_message().as_deref(), Some(SUCCESS_MESSAGE));
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn test_rejection_shows_message_and_hides_preview() {
        let mut controller = SubmissionController::default();

        // A previous success must not leak into the error state
        let first = controller.begin(&form_with_image()).unwrap();
        let completion = dispatch(
            Arc::new(ScriptedEndpoint(processed("/img/1.png"))),
            first,
            Duration::from_secs(5),
        )
        .await;
        controller.complete(completion);
        assert!(controller.processed_preview().is_some());

        let second = controller.begin(&form_with_image()).unwrap();
        let completion = dispatch(
            Arc::new(ScriptedEndpoint(rejected("bad depth"))),
            second,
            Duration::from_secs(5),
        )
        .await;
        controller.complete(completion);

        let message = controller.result_message().unwrap();
        assert!(message.starts_with(FAILURE_MARKER));
        assert!(message.contains("bad depth"));
        assert_eq!(controller.processed_preview(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_renders_generic_error() {
        let mut controller = SubmissionController::default();
        let pending = controller.begin(&form_with_image()).unwrap();
        let endpoint = Arc::new(ScriptedEndpoint(Err(SubmitError::Transport(
            "connection reset by peer".to_string(),
        ))));

        let completion = dispatch(endpoint, pending, Duration::from_secs(5)).await;
        controller.complete(completion);

        assert_eq!(
            controller.result_message(),
            Some(format!("{}{}", FAILURE_MARKER, GENERIC_FAILURE))
        );
        assert_eq!(controller.processed_preview(), None);
    }

    #[tokio::test]
    async fn test_malformed_and_status_failures_look_the_same() {
        for error in [
            SubmitError::Status(502),
            SubmitError::MalformedResponse("expected value".to_string()),
        ] {
            let mut controller = SubmissionController::default();
            let pending = controller.begin(&form_with_image()).unwrap();
            let completion = dispatch(
                Arc::new(ScriptedEndpoint(Err(error))),
                pending,
                Duration::from_secs(5),
            )
            .await;
            controller.complete(completion);

            assert_eq!(
                controller.render_state(),
                &RenderState::Error {
                    message: GENERIC_FAILURE.to_string()
                }
            );
        }
    }

    #[tokio::test]
    async fn test_original_preview_set_while_request_hangs() {
        let mut controller = SubmissionController::default();
        let form = form_with_image();
        let pending = controller.begin(&form).unwrap();

        let in_flight = tokio::spawn(dispatch(
            Arc::new(HangingEndpoint),
            pending,
            Duration::from_secs(3600),
        ));
        tokio::task::yield_now().await;

        assert_eq!(controller.original_preview(), form.image.as_ref());
        assert_eq!(controller.render_state(), &RenderState::Submitting);
        assert!(!in_flight.is_finished());
        in_flight.abort();
    }

    #[tokio::test]
    async fn test_hanging_request_times_out() {
        let mut controller = SubmissionController::default();
        let pending = controller.begin(&form_with_image()).unwrap();

        let completion =
            dispatch(Arc::new(HangingEndpoint), pending, Duration::from_millis(50)).await;
        assert_eq!(completion.result, Err(SubmitError::Timeout(Duration::from_millis(50))));

        controller.complete(completion);
        assert!(controller.result_message().unwrap().starts_with(FAILURE_MARKER));
        assert_eq!(controller.processed_preview(), None);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut controller = SubmissionController::new(StaleResponsePolicy::DiscardStale);
        let first = controller.begin(&form_with_image()).unwrap();
        let second = controller.begin(&form_with_image()).unwrap();
        assert_eq!(controller.in_flight(), 2);

        // The newer request resolves first
        assert!(controller.complete_at(
            SubmissionCompletion {
                generation: second.generation,
                result: processed("/img/new.png"),
            },
            5,
        ));
        assert!(!controller.complete_at(
            SubmissionCompletion {
                generation: first.generation,
                result: rejected("old failure"),
            },
            6,
        ));

        assert_eq!(controller.processed_preview(), Some("/img/new.png?t=5"));
        assert!(!controller.is_submitting());
    }

    #[test]
    fn test_not_submitting_once_latest_rendered_with_stale_in_flight() {
        let mut controller = SubmissionController::new(StaleResponsePolicy::DiscardStale);
        let _first = controller.begin(&form_with_image()).unwrap();
        let second = controller.begin(&form_with_image()).unwrap();

        controller.complete_at(
            SubmissionCompletion {
                generation: second.generation,
                result: processed("/img/new.png"),
            },
            3,
        );

        // The older request is still out, but its response will be dropped
        assert_eq!(controller.in_flight(), 1);
        assert!(!controller.is_submitting());
        assert_eq!(controller.processed_preview(), Some("/img/new.png?t=3"));
    }

    #[test]
    fn test_stale_response_still_pending_keeps_loading() {
        let mut controller = SubmissionController::new(StaleResponsePolicy::DiscardStale);
        let first = controller.begin(&form_with_image()).unwrap();
        let _second = controller.begin(&form_with_image()).unwrap();

        controller.complete_at(
            SubmissionCompletion {
                generation: first.generation,
                result: processed("/img/old.png"),
            },
            1,
        );

        assert_eq!(controller.render_state(), &RenderState::Submitting);
        assert!(controller.is_submitting());
    }

    #[test]
    fn test_last_resolved_wins_when_configured() {
        let mut controller = SubmissionController::new(StaleResponsePolicy::LastResolvedWins);
        let first = controller.begin(&form_with_image()).unwrap();
        let second = controller.begin(&form_with_image()).unwrap();

        controller.complete_at(
            SubmissionCompletion {
                generation: second.generation,
                result: processed("/img/new.png"),
            },
            5,
        );
        assert!(controller.complete_at(
            SubmissionCompletion {
                generation: first.generation,
                result: rejected("old failure"),
            },
            6,
        ));

        assert_eq!(controller.processed_preview(), None);
        assert!(controller.result_message().unwrap().contains("old failure"));
    }
}
