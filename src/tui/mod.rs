pub mod app;
pub mod ui;

use std::{error::Error, io};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use crate::api::TodoApi;
use app::{App, Focus, FormField};
use ui::ui;

pub fn run_tui<A: TodoApi>(api: A) -> Result<(), Box<dyn Error>> {
    // Fetch before touching the terminal so a dead server fails cleanly
    let mut app = App::new(api)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend, A: TodoApi>(terminal: &mut Terminal<B>, app: &mut App<A>) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.focus {
                Focus::List => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Char(' ') => app.toggle_selected(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                    KeyCode::Char('e') | KeyCode::Enter => app.edit_selected(),
                    KeyCode::Char('a') => app.start_add(),
                    _ => {}
                },
                Focus::Form => match key.code {
                    KeyCode::Enter => app.submit(),
                    KeyCode::Esc => app.cancel(),
                    KeyCode::Tab => app.next_field(),
                    KeyCode::Left if app.field == FormField::Priority => app.cycle_priority(false),
                    KeyCode::Right if app.field == FormField::Priority => app.cycle_priority(true),
                    KeyCode::Char(c) => app.input_char(c),
                    KeyCode::Backspace => app.backspace(),
                    _ => {}
                }
            }
        }
    }
}
