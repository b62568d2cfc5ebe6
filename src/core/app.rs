//! Main application orchestrator

use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, Notify};

use crate::config::Config;
use crate::core::assembler::SnapshotAssembler;
use crate::core::events::{Event, EventHandler, EventResult};
use crate::core::input::{InputHandler, RunState};
use crate::core::scheduler::RefreshScheduler;
use crate::core::state::DashboardState;
use crate::integrations::system::SysinfoProvider;
use crate::metrics::ProviderError;
use crate::ui::renderer::Renderer;
use crate::ui::theme::Theme;

#[derive(Debug, Error)]
pub enum RenderSubsystemError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
    #[error("all event sources closed")]
    EventSourceClosed,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Render(#[from] RenderSubsystemError),
}

pub struct App<B: Backend> {
    terminal: Terminal<B>,
    state: DashboardState,
    theme: Theme,
    input: InputHandler,
    assembler: SnapshotAssembler,
    period: Duration,
    /// Signalled once a refreshed snapshot has been drawn
    landed: Arc<Notify>,
}

impl<B: Backend> App<B> {
    /// Take the first snapshot, then attach to the terminal.
    ///
    /// A failed first snapshot is fatal and happens before the backend is
    /// touched, so no frame is ever produced from incomplete data.
    pub async fn start(
        backend: B,
        assembler: SnapshotAssembler,
        config: &Config,
    ) -> Result<Self, AppError> {
        let first = assembler.assemble().await.inspect_err(|e| {
            tracing::error!("initial metrics assembly failed: {}", e);
        })?;
        tracing::info!(
            cores = first.cpu.per_core_percent.len(),
            partitions = first.disk.partitions.len(),
            "initial snapshot ready"
        );

        let state = DashboardState::new(first, config.display.bar_width);
        let theme = Theme::from_name(&config.display.theme);
        tracing::debug!(theme = %theme.name, "theme selected");
        let terminal = Terminal::new(backend).map_err(RenderSubsystemError::from)?;

        Ok(Self {
            terminal,
            state,
            theme,
            input: InputHandler::new(),
            assembler,
            period: config.refresh.interval(),
            landed: Arc::new(Notify::new()),
        })
    }

    #[cfg(test)]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Drive the dashboard until quit or a fatal error. `tx` feeds `events`;
    /// the refresh scheduler is started on it and stopped on the way out.
    async fn event_loop(
        &mut self,
        mut events: EventHandler,
        tx: mpsc::UnboundedSender<Event>,
    ) -> Result<(), AppError> {
        let scheduler =
            RefreshScheduler::new(self.assembler.clone(), self.period, Arc::clone(&self.landed))
                .spawn(tx);

        let result = self.pump(&mut events).await;

        // An in-flight assembly is dropped along with the task.
        scheduler.abort();
        result
    }

    async fn pump(&mut self, events: &mut EventHandler) -> Result<(), AppError> {
        self.draw()?;

        loop {
            let Some(event) = events.next().await else {
                return Err(RenderSubsystemError::EventSourceClosed.into());
            };

            match self.dispatch(event)? {
                EventResult::Continue => {}
                EventResult::Quit => return Ok(()),
            }
        }
    }

    /// The single state transition function; every event passes through here.
    pub fn dispatch(&mut self, event: Event) -> Result<EventResult, AppError> {
        match event {
            Event::Key(key) => match self.input.handle_key(&key) {
                RunState::Terminated => Ok(EventResult::Quit),
                RunState::Running => Ok(EventResult::Continue),
            },
            Event::Resize(w, h) => {
                tracing::debug!(w, h, "terminal resized");
                self.draw()?;
                Ok(EventResult::Continue)
            }
            Event::Refresh(snapshot) => {
                self.state.apply(*snapshot);
                self.draw()?;
                self.landed.notify_one();
                Ok(EventResult::Continue)
            }
            Event::RefreshFailed(e) => Err(e.into()),
            Event::Quit => Ok(EventResult::Quit),
        }
    }

    fn draw(&mut self) -> Result<(), RenderSubsystemError> {
        let Self {
            terminal,
            state,
            theme,
            ..
        } = self;
        terminal.draw(|frame| Renderer::draw(frame, state, theme))?;
        Ok(())
    }
}

impl App<CrosstermBackend<Stdout>> {
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let provider = Arc::new(SysinfoProvider::new(config.refresh.cpu_sample()));
        tracing::info!(
            sample_ms = provider.sample_window().as_millis() as u64,
            interval_ms = config.refresh.interval().as_millis() as u64,
            "starting"
        );

        let assembler = SnapshotAssembler::new(provider);
        Self::start(CrosstermBackend::new(io::stdout()), assembler, config).await
    }

    pub async fn run(&mut self) -> Result<(), AppError> {
        if let Err(e) = self.setup_terminal() {
            let _ = self.shutdown();
            return Err(e.into());
        }

        let (events, tx) = EventHandler::new();
        let input = EventHandler::spawn_terminal(tx.clone());
        let signals = EventHandler::spawn_signals(tx.clone());

        let result = self.event_loop(events, tx).await;

        input.abort();
        signals.abort();

        // Restore the terminal before any error is reported
        let restored = self.shutdown();
        result?;
        restored?;
        tracing::info!("clean exit");
        Ok(())
    }

    fn setup_terminal(&mut self) -> Result<(), RenderSubsystemError> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::cursor::Hide,
        )?;
        self.terminal.clear()?;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), RenderSubsystemError> {
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show,
        )?;
        Ok(())
    }
}
