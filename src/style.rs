use iced::widget::{container, pick_list, text, text_input};
use iced::{Border, Color, Theme};
use std::sync::Arc;

// Main theme colors
pub const PRIMARY: Color = Color::from_rgb(0.0, 0.4, 0.8);
pub const BACKGROUND: Color = Color::from_rgb(0.05, 0.05, 0.1);
pub const TEXT: Color = Color::from_rgb(0.9, 0.9, 0.9);
pub const MUTED: Color = Color::from_rgb(0.6, 0.6, 0.6);
pub const ERROR: Color = Color::from_rgb(0.9, 0.2, 0.2);
pub const SUCCESS: Color = Color::from_rgb(0.0, 0.8, 0.3);
pub const WARNING: Color = Color::from_rgb(0.9, 0.6, 0.0);

pub fn custom_theme() -> Theme {
    let palette = iced::theme::Palette {
        background: BACKGROUND,
        text: TEXT,
        primary: PRIMARY,
        success: SUCCESS,
        danger: ERROR,
        warning: WARNING,
    };

    Theme::Custom(Arc::new(iced::theme::Custom::new(
        "quadim-dark".to_string(),
        palette,
    )))
}

pub fn main_box(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.weak.color.into()),
        text_color: Some(TEXT),
        ..container::Style::default()
    }
}

pub fn bordered_box(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.weakest.color.into()),
        border: Border {
            width: 1.0,
            radius: 5.0.into(),
            color: palette.background.strong.color,
        },
        ..container::Style::default()
    }
}

// Empty frame shown where a preview will appear
pub fn preview_placeholder(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.base.color.into()),
        text_color: Some(MUTED),
        border: Border {
            width: 1.0,
            radius: 5.0.into(),
            color: palette.background.weak.color,
        },
        ..container::Style::default()
    }
}

pub fn error_banner(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Color { a: 0.15, ..ERROR }.into()),
        text_color: Some(ERROR),
        border: Border {
            width: 1.0,
            radius: 5.0.into(),
            color: ERROR,
        },
        ..container::Style::default()
    }
}

pub fn success_text(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(SUCCESS),
        ..text::Style::default()
    }
}

pub fn error_text(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(ERROR),
        ..text::Style::default()
    }
}

pub fn muted_text(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(MUTED),
        ..text::Style::default()
    }
}

pub fn default_text_input(theme: &Theme, _status: text_input::Status) -> text_input::Style {
    let palette = theme.extended_palette();

    text_input::Style {
        background: palette.background.weak.color.into(),
        border: Border {
            radius: 5.0.into(),
            width: 1.0,
            color: palette.background.strong.color,
        },
        icon: TEXT,
        placeholder: palette.background.strong.color,
        value: TEXT,
        selection: palette.primary.weak.color,
    }
}

pub fn pick_list_style(theme: &Theme, _status: pick_list::Status) -> pick_list::Style {
    let palette = theme.extended_palette();

    pick_list::Style {
        text_color: theme.palette().text,
        placeholder_color: palette.background.strong.text,
        background: iced::Background::Color(palette.background.weak.color),
        handle_color: palette.background.strong.color,
        border: Border {
            width: 1.0,
            radius: 5.0.into(),
            color: palette.background.strong.color,
        },
    }
}
