//! Anime Image Enhancer TUI - Actor-based front-end for an upscaling service
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async uploads and downloads

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use enhancer_tui::app::{AppActor, AppState};
use enhancer_tui::config::Config;
use enhancer_tui::constants::{APP_NAME, APP_VERSION, LOG_FILE_NAME};
use enhancer_tui::messages::ui_events::{key_to_ui_event, Field, InputMode};
use enhancer_tui::messages::{NetworkCommand, NetworkResponse, RenderState, ResultView, UiEvent};
use enhancer_tui::network::NetworkActor;
use enhancer_tui::ui::{border_style, checkbox, render_model_selector, spinner_frame, toast_style};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config = Config::load();
    tracing::info!(endpoint = %config.endpoint, "Starting {}", APP_NAME);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::new(config), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();
    let mut tick: usize = 0;

    loop {
        terminal.draw(|f| draw_ui(f, &current_state, tick))?;
        tick = tick.wrapping_add(1);

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.focus,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.submit_disabled,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState, tick: usize) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(" ▣ ", Style::default().fg(Color::Magenta)),
        Span::styled(
            "Enhance and Upscale your Anime Image",
            Style::default().fg(Color::White).bold(),
        ),
    ]));
    f.render_widget(title, main_chunks[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(main_chunks[1]);

    draw_options(f, state, content[0], tick);
    draw_result(f, state, content[1]);
    draw_status_bar(f, state, main_chunks[2]);

    if state.toast.visible {
        draw_toast(f, state, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_options(f: &mut Frame, state: &RenderState, area: Rect, tick: usize) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" Enhancement Options ");
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Model
            Constraint::Length(3), // File
            Constraint::Length(4), // Acceleration
            Constraint::Length(3), // Submit
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(
        render_model_selector(state.model, state.focus == Field::Model),
        chunks[0],
    );

    draw_file_input(f, state, chunks[1]);

    let accel = Paragraph::new(vec![
        checkbox(
            "Use NVIDIA GPU (CUDA)  (g)",
            state.use_gpu,
            state.focus == Field::Gpu,
        ),
        checkbox(
            "Use Intel eGPU or AMD (OpenCL)  (o)",
            state.use_cpu_egpu,
            state.focus == Field::CpuEgpu,
        ),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(
                matches!(state.focus, Field::Gpu | Field::CpuEgpu),
                false,
            ))
            .title(" Acceleration "),
    );
    f.render_widget(accel, chunks[2]);

    draw_submit_button(f, state, chunks[3], tick);
}

fn draw_file_input(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.focus == Field::File;
    let is_editing = state.input_mode == InputMode::Editing;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_focused || is_editing, is_editing))
        .title(if is_editing {
            " Image path (Tab:complete Enter:select Esc:cancel) "
        } else {
            " Image (f) "
        });

    let content = if is_editing {
        Span::raw(state.path_input.as_str())
    } else if state.file_name.is_empty() {
        Span::styled("Choose an image to enhance", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(state.file_name.as_str(), Style::default().fg(Color::Green))
    };
    f.render_widget(Paragraph::new(Line::from(content)).block(block), area);

    if is_editing {
        let column = state
            .path_input
            .get(..state.path_cursor)
            .map_or(0, |before| before.chars().count());
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x as usize + column + 1).min(max_x as usize) as u16;
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_submit_button(f: &mut Frame, state: &RenderState, area: Rect, tick: usize) {
    let is_focused = state.focus == Field::Submit;

    let (label, style) = if state.is_loading {
        (
            format!("{} Enhancing...", spinner_frame(tick)),
            Style::default().fg(Color::Yellow),
        )
    } else if state.submit_disabled {
        (
            String::from("Enhance Image"),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            String::from("Enhance Image (s)"),
            Style::default().fg(Color::Black).bg(Color::Magenta).bold(),
        )
    };

    let button = Paragraph::new(label)
        .style(style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(is_focused, false)),
        );
    f.render_widget(button, area);
}

fn draw_result(f: &mut Frame, state: &RenderState, area: Rect) {
    match &state.result {
        ResultView::Placeholder => {
            let block = Block::default().borders(Borders::ALL).title(" Result ");
            let inner = block.inner(area);
            f.render_widget(block, area);

            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Percentage(45),
                    Constraint::Length(2),
                    Constraint::Min(0),
                ])
                .split(inner);
            let placeholder = Paragraph::new(vec![
                Line::from("🖼"),
                Line::from("Your enhanced image will appear here"),
            ])
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
            f.render_widget(placeholder, rows[1]);
        }
        ResultView::Image { path, url } => {
            let download = if state.is_downloading {
                Span::styled(" Downloading... ", Style::default().fg(Color::Yellow))
            } else {
                Span::styled(
                    " ⭳ [d] Download enhanced image ",
                    Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
                )
            };

            let block = Block::default()
                .borders(Borders::ALL)
                .title(" Result ")
                .title_bottom(Line::from(download).right_aligned())
                .style(Style::default().bg(Color::Rgb(32, 24, 48)));

            let body = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(path.as_str(), Style::default().fg(Color::White).bold())),
                Line::from(""),
                Line::from(Span::styled(url.as_str(), Style::default().fg(Color::Cyan).underlined())),
            ])
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });
            f.render_widget(body, area);
        }
    }
}

fn draw_toast(f: &mut Frame, state: &RenderState, area: Rect) {
    let (color, icon) = toast_style(state.toast.status);
    let text = format!(" {} {} ", icon, state.toast.message);
    let width = (text.chars().count() as u16 + 2).min(area.width);
    let toast_area = Rect::new(area.x + area.width.saturating_sub(width + 1), area.y + 1, width, 3)
        .intersection(area);
    if toast_area.is_empty() {
        return;
    }

    let toast = Paragraph::new(text).style(Style::default().fg(color)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(Color::Black)),
    );
    f.render_widget(Clear, toast_area);
    f.render_widget(toast, toast_area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.is_loading {
        " Enhancing... "
    } else if state.input_mode == InputMode::Editing {
        " Type a path | Tab:complete | Enter:select | Esc:cancel "
    } else {
        " Tab:field | m:model | f:file | g/o:acceleration | s:enhance | d:download | ?:help | q:quit "
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = r#"
 KEYBOARD SHORTCUTS

 NAVIGATION
   Tab / Shift+Tab    Next / previous control
   Enter / Space      Activate focused control

 OPTIONS
   m                  Switch upscaling model (2x / 3x)
   g                  Toggle NVIDIA GPU (CUDA)
   o                  Toggle Intel eGPU / AMD (OpenCL)
   f                  Choose an image (.jpg .jpeg .png)

 ACTIONS
   s                  Enhance image
   d                  Download enhanced image

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} v{} ", APP_NAME, APP_VERSION))
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
