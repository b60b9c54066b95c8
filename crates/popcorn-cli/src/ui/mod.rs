//! Interactive terminal UI.
//!
//! The [`Controller`] owns all application state. This module only owns
//! presentation state (focus, list cursors), turns terminal input into
//! key dispatches and actions, and redraws the view model after every event.

mod draw;
mod input;
mod title;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use input::{KeyOutcome, UiState};
use popcorn_config::Config;
use popcorn_core::{AppEvent, Controller, KeyListener, SlotStore, WindowTitle};
use popcorn_sources::MovieCatalog;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use title::TerminalTitle;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run(catalog: Arc<dyn MovieCatalog>, store: Arc<dyn SlotStore>, config: &Config) -> Result<()> {
    let title = Arc::new(TerminalTitle);
    title.set_window_title(&config.display.default_title);

    let keys = KeyListener::new();
    let (controller, rx) = Controller::new(catalog, store, keys.clone(), title.clone(), config);

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, controller, rx, &keys).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    title.set_window_title(&config.display.default_title);
    info!("Interactive UI closed");

    result
}

/// Raw mode and the alternate screen; both are rolled back if any step fails
fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let terminal = (|| -> io::Result<Term> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        Terminal::new(CrosstermBackend::new(stdout))
    })();

    terminal.map_err(|e| {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
        e.into()
    })
}

async fn event_loop(
    terminal: &mut Term,
    mut controller: Controller,
    mut rx: UnboundedReceiver<AppEvent>,
    keys: &KeyListener,
) -> Result<()> {
    let mut ui = UiState::default();
    let mut input = EventStream::new();

    loop {
        let view = controller.view();
        ui.clamp(&view);
        terminal.draw(|f| draw::render(f, &view, &ui))?;

        tokio::select! {
            maybe_event = input.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match input::handle_key(key, keys, &mut ui, &view) {
                        KeyOutcome::Quit => break,
                        KeyOutcome::Action(action) => controller.handle_action(action),
                        KeyOutcome::Handled | KeyOutcome::Ignored => {}
                    }
                }
                // Resize and the rest only need a redraw
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(event) = rx.recv() => {
                controller.handle_event(event);
            }
        }

        // Apply whatever key handlers and fetches queued meanwhile before the next frame
        while let Ok(event) = rx.try_recv() {
            controller.handle_event(event);
        }
    }

    debug!(watched = controller.watched().len(), "Leaving event loop");
    Ok(())
}
