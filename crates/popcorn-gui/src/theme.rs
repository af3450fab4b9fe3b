//! Light/dark selection and the few container styles the screens share.

use iced::widget::container;
use iced::{Border, Theme};

use popcorn_core::config::ThemeMode;

use crate::style;

/// Resolve `ThemeMode::System` to a concrete Dark or Light.
pub fn resolve_mode(mode: ThemeMode) -> ThemeMode {
    match mode {
        ThemeMode::System => match dark_light::detect() {
            Ok(dark_light::Mode::Light) => ThemeMode::Light,
            _ => ThemeMode::Dark,
        },
        other => other,
    }
}

pub fn iced_theme(mode: ThemeMode) -> Theme {
    match resolve_mode(mode) {
        ThemeMode::Light => Theme::Light,
        _ => Theme::Dark,
    }
}

/// Background of the two content boxes.
pub fn panel(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            radius: style::BOX_RADIUS.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}

/// Top navigation bar.
pub fn nav_bar(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.primary.base.color.into()),
        text_color: Some(palette.primary.base.text),
        border: Border {
            radius: style::BOX_RADIUS.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}

/// Summary strip above the watched list.
pub fn summary(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.strong.color.into()),
        border: Border {
            radius: style::BOX_RADIUS.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}
