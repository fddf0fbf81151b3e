use crate::style;
use crate::ui::messages::Message;
use crate::ui::{parameters, submission};
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Alignment, Element, Length, Task};
use quadim_studio::utils::{ProcessingClient, StudioConfig};
use std::sync::Arc;
use tracing::{error, info};

pub struct QuadimStudio {
    pub config: StudioConfig,
    pub client: Arc<ProcessingClient>,
    pub parameters: parameters::ParametersState,
    pub submission: submission::SubmissionState,
    pub error_message: Option<String>,
}

impl QuadimStudio {
    pub fn new(config: StudioConfig, client: Arc<ProcessingClient>) -> Self {
        info!(
            "Using processing endpoint {} (timeout {:?}, stale responses: {:?})",
            client.base_url(),
            config.request_timeout(),
            config.stale_responses
        );

        Self {
            parameters: parameters::ParametersState::new(),
            submission: submission::SubmissionState::new(config.stale_responses),
            config,
            client,
            error_message: None,
        }
    }

    pub fn title(&self) -> String {
        if self.submission.controller.is_submitting() {
            String::from("Quadim Studio - processing...")
        } else {
            String::from("Quadim Studio")
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ShowError(e) => {
                error!("{}", e);
                self.error_message = Some(e);
                Task::none()
            }

            Message::DismissError => {
                self.error_message = None;
                Task::none()
            }

            Message::Parameters(msg) => parameters::handle_message(&mut self.parameters, msg),

            Message::Submission(msg) => submission::handle_message(
                &mut self.submission,
                &self.parameters.form,
                &self.client,
                self.config.request_timeout(),
                msg,
            ),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = column![
            text("Quadim Studio").size(28),
            text(format!("Processing endpoint: {}", self.client.base_url()))
                .size(12)
                .style(style::muted_text),
        ]
        .spacing(4);

        let mut content = column![header].spacing(20).padding(20);

        if let Some(error) = &self.error_message {
            content = content.push(
                container(
                    row![
                        text(error).width(Length::Fill),
                        button("Dismiss").on_press(Message::DismissError),
                    ]
                    .spacing(10)
                    .align_y(Alignment::Center),
                )
                .padding(10)
                .width(Length::Fill)
                .style(style::error_banner),
            );
        }

        content = content
            .push(
                container(parameters::view_parameters(&self.parameters))
                    .padding(15)
                    .width(Length::Fill)
                    .style(style::bordered_box),
            )
            .push(submission::view_submission(
                &self.submission,
                self.parameters.has_image(),
            ));

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(style::main_box)
            .into()
    }
}
