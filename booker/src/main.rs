//! A TUI for booking dates. Every date is taken.

/// The "functional core" to the main module's "imperative shell"
mod app;

/// Configuration and argument parsing
mod config;

/// Buttons that take turns having focus
mod focus_ring;

use app::App;
use booker_core::{content, Booking};
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::{fs, io, process::ExitCode};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedSender},
    task::JoinHandle,
    time,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let config = config::Config::parse();

    // The terminal belongs to the UI, so logs go to a file instead.
    let data_dir = config.data_dir();
    fs::create_dir_all(&data_dir)?;
    let (log_writer, _log_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&data_dir, "booker.log"));
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_writer)
        .with_ansi(false)
        .init();

    let booking = Booking::new(content::rng(config.seed))
        .with_timings(config.timings())
        .with_wiring(config.wiring());
    tracing::info!(?config, "starting up");

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let res = run(terminal, App::new(booking, chrono::Local::now().date_naive())).await;
    ratatui::restore();
    res
}

/// Manage the lifecycle of the app
async fn run(mut terminal: DefaultTerminal, mut app: App) -> io::Result<ExitCode> {
    // Timers run as async tasks. When one is due, its task sends the next
    // action over this channel. We keep track of outstanding timers so we can
    // cancel them on the way out.
    let (effect_tx, mut effect_rx) = unbounded_channel();
    let mut outstanding_effects: Vec<JoinHandle<()>> = Vec::new();

    terminal.draw(|frame| app.render(frame))?;

    let mut event_stream = EventStream::new();

    // Only used to animate spinners
    let mut ticks = time::interval(time::Duration::from_millis(100));

    // Start our event loop!
    loop {
        // First thing we do is wait for an event. This can be either external
        // input, a tick, or a timer coming due. This is an `Option<_>` because
        // we don't necessarily need to pay attention to every single piece of
        // external input.
        let next_action_opt = tokio::select! {
            event_opt = event_stream.next() => {
                match event_opt {
                    Some(Ok(Event::Key(key_event))) => {
                        Some(app::Action::Key(key_event))
                    }
                    Some(Err(err)) => {
                        Some(app::Action::Problem(err.to_string()))
                    }
                    _ => None,
                }
            },

            _ = ticks.tick() => {
                Some(app::Action::TimePassed)
            },

            effect_opt = effect_rx.recv() => {
                effect_opt.flatten()
            }
        };

        if let Some(action) = next_action_opt {
            for effect in app.handle(action) {
                outstanding_effects.push(spawn_effect_task(effect_tx.clone(), effect));
            }
        }

        // Now that we handle the event, we re-render to display any changes the
        // app cares about.
        terminal.draw(|frame| app.render(frame))?;

        // This list should never be too long (since we do this on every pass
        // through the event loop) so a full scan is fine.
        outstanding_effects.retain(|handle| !handle.is_finished());

        // Timers only move dialogs along, so cancel them rather than waiting.
        if let Some(code) = app.should_exit() {
            tracing::info!(
                outstanding = outstanding_effects.len(),
                "exiting; cancelling timers"
            );

            for effect in outstanding_effects.drain(..) {
                effect.abort();
            }

            return Ok(code);
        }
    }
}

/// Spawn a task to run an effect and send the next action to the app.
fn spawn_effect_task(
    effect_tx: UnboundedSender<Option<app::Action>>,
    effect: app::Effect,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let next_action = effect.run().await;

        // If the channel is closed we're shutting down, and the action has
        // nowhere to go anyway.
        if effect_tx.send(next_action).is_err() {
            tracing::debug!("dropping action; app is gone");
        }
    })
}
