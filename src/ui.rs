use ratatui::{prelude::*, widgets::*};

use crate::models::{ToastStatus, UpscaleModel};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Border style for a form control
pub fn border_style(is_focused: bool, is_editing: bool) -> Style {
    if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Renders the model choices as tabs, highlighting the selected one
pub fn render_model_selector(selected: UpscaleModel, is_focused: bool) -> Tabs<'static> {
    let titles: Vec<Line> = UpscaleModel::ALL
        .iter()
        .map(|m| Line::from(format!(" {} ", m.label())))
        .collect();
    let index = UpscaleModel::ALL
        .iter()
        .position(|m| *m == selected)
        .unwrap_or(0);

    Tabs::new(titles)
        .select(index)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(is_focused, false))
                .title(" Upscaling Model (m) "),
        )
}

/// A single checkbox line
pub fn checkbox<'a>(label: &'a str, checked: bool, is_focused: bool) -> Line<'a> {
    let mark = if checked { "[x]" } else { "[ ]" };
    let style = if is_focused {
        Style::default().fg(Color::Yellow).bold()
    } else if checked {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    Line::from(Span::styled(format!("{} {}", mark, label), style))
}

/// Colors and icon for a toast
pub fn toast_style(status: ToastStatus) -> (Color, &'static str) {
    match status {
        ToastStatus::Success => (Color::Green, "✔"),
        ToastStatus::Fail => (Color::Red, "✖"),
    }
}

/// Busy indicator frame for the given tick
pub fn spinner_frame(tick: usize) -> char {
    SPINNER[tick % SPINNER.len()]
}
