use std::io;
use std::path::Path;

use anyhow::Result;
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tracing::{debug, info};

use carousel_core::{find_block, AppConfig, Carousel, CarouselHandle, CarouselService, HostEvent};
use carousel_tui::{
    event::EventHandler,
    input::handle_event,
    keymap::Keymap,
    widgets::{CarouselWidget, StatusBarWidget},
    App,
};

use super::load_document;

pub async fn run(config: AppConfig, path: &Path) -> Result<()> {
    let mut doc = load_document(path)?;
    let block = find_block(&doc);

    let Some(carousel) = Carousel::decorate(&mut doc, block, &config.carousel, &config.extract)?
    else {
        println!("No slides found in {}", path.display());
        return Ok(());
    };

    let keymap = Keymap::from_config(&config.keymap);
    let mut app = App::new(
        config.clone(),
        &doc,
        carousel.controls().clone(),
        carousel.snapshot(&doc),
    );
    let handle = CarouselService::spawn(doc, carousel);
    // The terminal owns keyboard focus from the start
    handle.send(HostEvent::FocusIn)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        SetTitle("Carousel")
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &handle, &keymap).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    handle.dispose().await?;
    info!("Carousel closed");
    result
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    handle: &CarouselHandle,
    keymap: &Keymap,
) -> Result<()> {
    let event_handler = EventHandler::new(app.config.ui.tick_rate_ms);
    let mut state = handle.subscribe();

    loop {
        app.snapshot = state.borrow_and_update().clone();
        terminal.draw(|frame| draw(frame, app))?;

        let Some(event) = event_handler.next()? else {
            continue;
        };

        let Some(events) = handle_event(&event, app, keymap) else {
            app.should_quit = true;
            break;
        };
        for event in events {
            debug!("Host event: {:?}", event);
            handle.send(event)?;
        }

        // Give the service a chance to publish before the next draw
        tokio::task::yield_now().await;
    }

    Ok(())
}

fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let show_status = app.config.ui.show_status_bar;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(if show_status { 1 } else { 0 }),
        ])
        .split(size);

    CarouselWidget::render(frame, layout[0], app);
    if show_status {
        StatusBarWidget::render(frame, layout[1], app);
    }
}
