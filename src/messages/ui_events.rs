//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Focus navigation
    NextField,
    PrevField,

    // Enhancement options
    CycleModel,
    ToggleGpu,
    ToggleCpuEgpu,

    // File path input
    StartFileInput,
    FileInputChar(char),
    FileInputBackspace,
    FileInputCursorLeft,
    FileInputCursorRight,
    FileInputAutocomplete,
    ConfirmFileInput,
    CancelFileInput,

    // Actions
    Submit,
    Download,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Focusable control of the options form
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Field {
    #[default]
    Model,
    File,
    Gpu,
    CpuEgpu,
    Submit,
}

impl Field {
    pub fn next(&self) -> Field {
        match self {
            Field::Model => Field::File,
            Field::File => Field::Gpu,
            Field::Gpu => Field::CpuEgpu,
            Field::CpuEgpu => Field::Submit,
            Field::Submit => Field::Model,
        }
    }

    pub fn prev(&self) -> Field {
        match self {
            Field::Model => Field::Submit,
            Field::File => Field::Model,
            Field::Gpu => Field::File,
            Field::CpuEgpu => Field::Gpu,
            Field::Submit => Field::CpuEgpu,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a file path
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context.
///
/// A disabled submit control swallows its keys, so no `Submit` is produced
/// while `submit_disabled` is set.
pub fn key_to_ui_event(
    key: KeyEvent,
    focus: Field,
    input_mode: InputMode,
    show_help: bool,
    submit_disabled: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    let submit = || (!submit_disabled).then_some(UiEvent::Submit);

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Char('m') => Some(UiEvent::CycleModel),
            KeyCode::Char('g') => Some(UiEvent::ToggleGpu),
            KeyCode::Char('o') => Some(UiEvent::ToggleCpuEgpu),
            KeyCode::Char('f') => Some(UiEvent::StartFileInput),
            KeyCode::Char('d') => Some(UiEvent::Download),
            KeyCode::Char('s') => submit(),
            KeyCode::Left | KeyCode::Right if focus == Field::Model => Some(UiEvent::CycleModel),
            KeyCode::Enter | KeyCode::Char(' ') => match focus {
                Field::Model => Some(UiEvent::CycleModel),
                Field::File => Some(UiEvent::StartFileInput),
                Field::Gpu => Some(UiEvent::ToggleGpu),
                Field::CpuEgpu => Some(UiEvent::ToggleCpuEgpu),
                Field::Submit => submit(),
            },
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::CancelFileInput),
            KeyCode::Enter => Some(UiEvent::ConfirmFileInput),
            KeyCode::Tab => Some(UiEvent::FileInputAutocomplete),
            KeyCode::Left => Some(UiEvent::FileInputCursorLeft),
            KeyCode::Right => Some(UiEvent::FileInputCursorRight),
            KeyCode::Backspace => Some(UiEvent::FileInputBackspace),
            KeyCode::Char(c) => Some(UiEvent::FileInputChar(c)),
            _ => None,
        },
    }
}
