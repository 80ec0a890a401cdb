use crate::actions::{apply_action, AppAction};
use crate::config::Config;
use crate::request::execute_request_background;
use crate::state::AppState;
use crate::swagger;
use crate::types::{BackgroundEvent, LoadingState, SourceSubmission};
use crate::ui::draw;
use crate::ui::events::{handle_event, Effect};
use color_eyre::Result;
use crossterm::event;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Upper bound on how long the loop blocks waiting for input
const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct App {
    state: AppState,
    tx: UnboundedSender<BackgroundEvent>,
    rx: UnboundedReceiver<BackgroundEvent>,
    config: Config,
    spinner_index: usize,
    last_tick: Instant,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(&config);

        // Ask for a source before anything else if none is configured
        if state.spec_source.is_none() {
            apply_action(AppAction::OpenSourceInput, &mut state);
        }

        Self {
            state,
            tx,
            rx,
            config,
            spinner_index: 0,
            last_tick: Instant::now(),
        }
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        if self.state.spec_source.is_some() {
            self.load_spec();
        }

        while !self.state.should_quit {
            while let Ok(event) = self.rx.try_recv() {
                self.state.handle_background(event);
            }
            self.state.tick(Instant::now());

            // Update spinner animation
            if self.is_busy() && self.last_tick.elapsed() >= TICK_RATE {
                self.spinner_index = self.spinner_index.wrapping_add(1);
                self.last_tick = Instant::now();
            }

            terminal.draw(|frame| draw::draw(frame, &mut self.state, self.spinner_index))?;
            self.handle_events()?;
        }

        tracing::info!("quitting");
        Ok(())
    }

    fn is_busy(&self) -> bool {
        matches!(
            self.state.loading_state,
            LoadingState::Fetching | LoadingState::Parsing
        ) || self.state.request.any_executing()
    }

    /// Wait for input until the next paste flush or tick is due, then handle
    /// every event already queued so a paste burst lands in one frame.
    fn handle_events(&mut self) -> Result<()> {
        let timeout = self
            .state
            .next_flush_in(Instant::now())
            .map_or(TICK_RATE, |due| due.min(TICK_RATE));

        if !event::poll(timeout)? {
            return Ok(());
        }

        loop {
            let effect = handle_event(event::read()?, &mut self.state);
            self.perform(effect);
            if self.state.should_quit || !event::poll(Duration::ZERO)? {
                break;
            }
        }
        Ok(())
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::LoadSpec => self.load_spec(),
            Effect::SubmitSource(submission) => self.submit_source(submission),
            Effect::Execute {
                endpoint,
                config,
                base_url,
            } => execute_request_background(
                endpoint,
                config,
                base_url,
                self.state.auth.token.clone(),
                self.tx.clone(),
            ),
        }
    }

    fn submit_source(&mut self, submission: SourceSubmission) {
        self.config
            .set_spec_source(submission.spec_source, submission.base_url);
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "could not save config");
            apply_action(
                AppAction::SetStatus(format!("Could not save config: {e}")),
                &mut self.state,
            );
        }

        self.state.spec_source = self.config.server.spec_source.clone();
        self.state.base_url = self.config.server.base_url.clone();
        self.state.retry_count = 0;
        self.load_spec();
    }

    fn load_spec(&mut self) {
        let Some(source) = self.state.spec_source.clone() else {
            return;
        };
        tracing::info!(source = %source, "loading spec");
        self.state.begin_loading();
        swagger::load_spec_background(source, self.tx.clone());
    }
}
