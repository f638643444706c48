//! App actor - message loop processing UI events, network responses and timers

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, TimerEvent, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        AppActor {
            state,
            network_tx,
            render_tx,
            timer_tx,
            timer_rx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                }
                Some(timer) = self.timer_rx.recv() => {
                    match timer {
                        TimerEvent::ToastExpired => self.state.expire_toast(),
                    }
                }
                else => break,
            }

            self.schedule_timers();
            let _ = self.render_tx.send(self.state.to_render_state());
        }
    }

    /// Spawn one sleep per requested toast expiry. They are never cancelled.
    fn schedule_timers(&mut self) {
        for timeout in self.state.take_scheduled_timers() {
            let timer_tx = self.timer_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                let _ = timer_tx.send(TimerEvent::ToastExpired);
            });
        }
    }

    fn send_command(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Focus
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),

            // Options
            UiEvent::CycleModel => self.state.cycle_model(),
            UiEvent::ToggleGpu => self.state.toggle_gpu(),
            UiEvent::ToggleCpuEgpu => self.state.toggle_cpu_egpu(),

            // File input
            UiEvent::StartFileInput => self.state.start_file_input(),
            UiEvent::FileInputChar(c) => self.state.file_input_char(c),
            UiEvent::FileInputBackspace => self.state.file_input_backspace(),
            UiEvent::FileInputCursorLeft => self.state.file_input_cursor_left(),
            UiEvent::FileInputCursorRight => self.state.file_input_cursor_right(),
            UiEvent::FileInputAutocomplete => self.state.file_input_autocomplete(),
            UiEvent::ConfirmFileInput => self.state.confirm_file_input(),
            UiEvent::CancelFileInput => self.state.cancel_file_input(),

            // Actions
            UiEvent::Submit => {
                let cmd = self.state.submit_form();
                self.send_command(cmd);
            }
            UiEvent::Download => {
                let cmd = self.state.download();
                self.send_command(cmd);
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
