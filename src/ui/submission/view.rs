use iced::widget::{button, column, container, image, row, text};
use iced::{Alignment, ContentFit, Element, Length};

use super::{SubmissionMessage, SubmissionState};
use crate::style;
use crate::ui::messages::Message;
use quadim_studio::models::RenderState;

const PREVIEW_HEIGHT: f32 = 260.0;

pub fn view_submission<'a>(state: &'a SubmissionState, has_image: bool) -> Element<'a, Message> {
    let submit_button = button(container("Run").center_x(Length::Fill))
        .width(160)
        .padding(10)
        .on_press_maybe(has_image.then_some(Message::Submission(SubmissionMessage::Submit)));

    let result_message: Element<'a, Message> = match state.controller.result_message() {
        Some(message) => {
            let label = text(message).size(16);
            match state.controller.render_state() {
                RenderState::Success { .. } => label.style(style::success_text).into(),
                RenderState::Error { .. } => label.style(style::error_text).into(),
                _ => label.style(style::muted_text).into(),
            }
        }
        None => text("").into(),
    };

    let previews = row![
        view_preview("Original", state.original_handle.as_ref()),
        view_preview("Processed", state.processed_image()),
    ]
    .spacing(12);

    column![
        row![submit_button, result_message]
            .spacing(16)
            .align_y(Alignment::Center),
        previews,
    ]
    .spacing(16)
    .into()
}

fn view_preview<'a>(title: &'a str, handle: Option<&'a image::Handle>) -> Element<'a, Message> {
    let body: Element<'a, Message> = match handle {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(PREVIEW_HEIGHT)
            .into(),
        None => container(text("Nothing to show yet").size(12))
            .center_x(Length::Fill)
            .center_y(PREVIEW_HEIGHT)
            .style(style::preview_placeholder)
            .into(),
    };

    column![text(title).size(14), body]
        .spacing(6)
        .width(Length::FillPortion(1))
        .into()
}
