use iced::widget::{button, column, container, pick_list, row, text, text_input};
use iced::{Alignment, Element, Length};

use super::{ParametersMessage, ParametersState};
use crate::style;
use crate::ui::messages::Message;
use quadim_studio::models::ParameterField;

const LABEL_WIDTH: f32 = 140.0;

pub fn view_parameters(state: &ParametersState) -> Element<'_, Message> {
    let style_row = labeled(
        "Style preset",
        pick_list(
            state.style_choices.as_slice(),
            Some(state.selected_style),
            |choice| Message::Parameters(ParametersMessage::SelectStyle(choice)),
        )
        .style(style::pick_list_style)
        .width(Length::Fill)
        .into(),
    );

    let parameters = &state.form.parameters;

    column![
        view_image_picker(state),
        style_row,
        labeled(
            ParameterField::Ratio.label(),
            pick_list(
                state.ratio_choices.as_slice(),
                Some(parameters.ratio.clone()),
                |ratio| {
                    Message::Parameters(ParametersMessage::SetField(ParameterField::Ratio, ratio))
                },
            )
            .style(style::pick_list_style)
            .width(Length::Fill)
            .into(),
        ),
        view_text_field(ParameterField::Depth, &parameters.depth, "8"),
        labeled(
            ParameterField::Shape.label(),
            pick_list(
                state.shape_choices.as_slice(),
                Some(parameters.shape.clone()),
                |shape| {
                    Message::Parameters(ParametersMessage::SetField(ParameterField::Shape, shape))
                },
            )
            .style(style::pick_list_style)
            .width(Length::Fill)
            .into(),
        ),
        view_text_field(
            ParameterField::BgColor,
            &parameters.bg_color,
            "none, white, transparent, #rrggbb"
        ),
        view_text_field(ParameterField::StrokeColor, &parameters.stroke_color, "black"),
        view_text_field(ParameterField::StrokeWidth, &parameters.stroke_width, "0"),
    ]
    .spacing(12)
    .into()
}

fn view_image_picker(state: &ParametersState) -> Element<'_, Message> {
    let label = match &state.form.image {
        Some(image) => text(format!("{} ({} KB)", image.file_name, image.len() / 1024 + 1)),
        None => text("No image selected").style(style::muted_text),
    };

    let pick_button = button("Choose image...")
        .padding([6, 12])
        .on_press_maybe(
            (!state.is_picking_image).then_some(Message::Parameters(ParametersMessage::PickImage)),
        );

    container(row![pick_button, label].spacing(12).align_y(Alignment::Center))
        .width(Length::Fill)
        .padding(10)
        .style(style::bordered_box)
        .into()
}

fn view_text_field<'a>(
    field: ParameterField,
    value: &'a str,
    placeholder: &'a str,
) -> Element<'a, Message> {
    labeled(
        field.label(),
        text_input(placeholder, value)
            .on_input(move |value| Message::Parameters(ParametersMessage::SetField(field, value)))
            .style(style::default_text_input)
            .padding(6)
            .into(),
    )
}

fn labeled<'a>(label: &'a str, control: Element<'a, Message>) -> Element<'a, Message> {
    row![text(label).width(LABEL_WIDTH), control]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
}
