//! Interactive terminal dashboard.

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::config::{Settings, INPUT_POLL_INTERVAL};
use crate::data::{FetchError, HttpSnapshotSource, SnapshotSource};
use crate::models::{DashboardSnapshot, Period};
use crate::view::{DashboardView, Page, RefreshOutcome, RefreshTicket, RetainedEngine, Trigger};
use crate::visualization::{draw, trigger_key, Screen};


type FetchResult = (RefreshTicket, Result<DashboardSnapshot, FetchError>);


/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Activate(Trigger),
    Reload,
    Quit,
}


fn command_for(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('r') => Some(Command::Reload),
        KeyCode::Char(c) => Trigger::ALL
            .into_iter()
            .find(|trigger| trigger_key(*trigger) == c)
            .map(Command::Activate),
        _ => None,
    }
}


/// Raw mode and alternate screen, restored on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}


impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .context("Failed to initialize terminal")?;
        Ok(Self { terminal })
    }
}


impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}


/// Forward terminal events to the UI task until `stop` is set.
fn spawn_input_thread(events: mpsc::UnboundedSender<io::Result<Event>>, stop: Arc<AtomicBool>) {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            let next = match event::poll(INPUT_POLL_INTERVAL) {
                Ok(true) => event::read(),
                Ok(false) => continue,
                Err(e) => Err(e),
            };

            let failed = next.is_err();
            if events.send(next).is_err() || failed {
                break;
            }
        }
    });
}


/// Run the fetch for `ticket` off the UI task.
fn spawn_fetch<S>(source: Arc<S>, ticket: RefreshTicket, results: mpsc::UnboundedSender<FetchResult>)
where
    S: SnapshotSource + 'static,
{
    tokio::spawn(async move {
        let result = source.fetch(&ticket.period).await;
        let _ = results.send((ticket, result));
    });
}


/// Run the watch command.
pub async fn run(settings: &Settings, period: Period) -> Result<()> {
    let source = Arc::new(HttpSnapshotSource::new(&settings.endpoint)?);
    let page = Page::from_layout(&settings.layout);
    let mut view = DashboardView::new(source, RetainedEngine::default(), page);

    let mut guard = TerminalGuard::enter()?;
    let stop = Arc::new(AtomicBool::new(false));
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    spawn_input_thread(event_tx, Arc::clone(&stop));

    tracing::info!(endpoint = %settings.endpoint, period = %period, "Starting dashboard");
    let result = event_loop(&mut guard.terminal, &mut view, period, event_rx).await;

    stop.store(true, Ordering::Relaxed);
    tracing::info!("Dashboard closed");
    result
}


async fn event_loop<S>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    view: &mut DashboardView<S, RetainedEngine>,
    period: Period,
    mut events: mpsc::UnboundedReceiver<io::Result<Event>>,
) -> Result<()>
where
    S: SnapshotSource + 'static,
{
    let (result_tx, mut results) = mpsc::unbounded_channel::<FetchResult>();

    let mut requested = period.clone();
    let mut shown = period.clone();
    let mut last_refresh = None;

    spawn_fetch(view.source(), view.begin_refresh(period), result_tx.clone());

    loop {
        terminal
            .draw(|frame| {
                let screen = Screen {
                    page: view.page(),
                    charts: view.charts(),
                    period: &shown,
                    last_refresh,
                    loading: view.is_loading(),
                };
                draw(frame, &screen);
            })
            .context("Failed to draw dashboard")?;

        tokio::select! {
            next = events.recv() => {
                let event = match next {
                    Some(event) => event.context("Failed to read terminal input")?,
                    None => break,
                };
                let Event::Key(key) = event else { continue };

                match command_for(key) {
                    Some(Command::Quit) => break,
                    Some(Command::Reload) => {
                        let ticket = view.begin_refresh(requested.clone());
                        spawn_fetch(view.source(), ticket, result_tx.clone());
                    }
                    Some(Command::Activate(trigger)) => {
                        if let Some(ticket) = view.trigger(trigger) {
                            requested = ticket.period.clone();
                            spawn_fetch(view.source(), ticket, result_tx.clone());
                        }
                    }
                    None => {}
                }
            }
            Some((ticket, result)) = results.recv() => {
                let period = ticket.period.clone();
                if view.complete_refresh(ticket, result) == RefreshOutcome::Applied {
                    tracing::debug!(generation = view.applied_generation(), "Showing new snapshot");
                    shown = period;
                    last_refresh = Some(Local::now());
                }
            }
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_trigger_keys() {
        assert_eq!(command_for(press(KeyCode::Char('7'))), Some(Command::Activate(Trigger::Filter7)));
        assert_eq!(command_for(press(KeyCode::Char('3'))), Some(Command::Activate(Trigger::Filter30)));
        assert_eq!(command_for(press(KeyCode::Char('a'))), Some(Command::Activate(Trigger::FilterAll)));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(command_for(press(KeyCode::Char('r'))), Some(Command::Reload));
        assert_eq!(command_for(press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(command_for(press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(
            command_for(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(command_for(press(KeyCode::Char('c'))), None);
        assert_eq!(command_for(press(KeyCode::Enter)), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(command_for(key), None);
    }
}
