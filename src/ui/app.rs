use super::draw::draw;
use super::runtime::Runtime;
use super::state::{Event, Navigator};
use super::view::render;
use crate::api::{Gateway, HttpGateway};
use crate::config::ConfigStore;
use crate::error::Result;
use crossterm::{
    event::{self, Event as TermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// How long to wait for input before checking background results
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct App {
    runtime: Runtime,
}

impl App {
    pub fn new(store: ConfigStore) -> Self {
        Self::with_gateway(store, Arc::new(HttpGateway::new()))
    }

    pub fn with_gateway(store: ConfigStore, gateway: Arc<dyn Gateway>) -> Self {
        let (document, notice) = match store.load() {
            Ok(document) => (document, None),
            Err(e) => {
                tracing::warn!("Starting with no platforms: {}", e);
                (
                    Default::default(),
                    Some(format!("{} (starting with no platforms)", e)),
                )
            }
        };
        tracing::info!(
            "Loaded {} platform(s) from {}",
            document.len(),
            store.path().display()
        );

        let navigator = Navigator::new(document).with_notice(notice);
        Self {
            runtime: Runtime::new(navigator, store, gateway),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_event_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            let view = render(self.runtime.navigator());
            terminal.draw(|f| draw(f, &view))?;

            if self.runtime.navigator().should_quit() {
                break;
            }

            // crossterm's poll blocks; keep it off the runtime's worker threads
            let input = tokio::task::block_in_place(|| -> io::Result<Option<TermEvent>> {
                if event::poll(INPUT_POLL_INTERVAL)? {
                    event::read().map(Some)
                } else {
                    Ok(None)
                }
            })?;

            if let Some(TermEvent::Key(key)) = input {
                // Only handle key press events, ignore key release
                if key.kind == KeyEventKind::Press {
                    self.runtime.dispatch(Event::Key(key));
                }
            }

            self.runtime.drain_results();
        }
        tracing::info!("Exiting");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockGateway;
    use tempfile::TempDir;

    #[test]
    fn test_corrupt_config_starts_empty_with_notice() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("platforms.json");
        std::fs::write(&path, "{ not json").unwrap();

        let app = App::with_gateway(ConfigStore::new(&path), Arc::new(MockGateway::new()));
        let nav = app.runtime.navigator();
        assert!(nav.document().is_empty());
        let notice = nav.notice().unwrap_or_default();
        assert!(notice.contains("Failed to parse config file"), "{notice}");
        // The broken file is left alone until the next save
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_missing_config_starts_empty_without_notice() {
        let dir = TempDir::new().unwrap();
        let app = App::with_gateway(
            ConfigStore::new(dir.path().join("absent.json")),
            Arc::new(MockGateway::new()),
        );
        assert!(app.runtime.navigator().document().is_empty());
        assert_eq!(app.runtime.navigator().notice(), None);
    }
}
