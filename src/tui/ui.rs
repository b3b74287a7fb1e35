use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use chrono::{Local, NaiveDateTime, TimeZone};
use crate::api::TodoApi;
use crate::models::{Priority, Task};
use super::app::{App, Focus, FormField};

pub fn ui<A: TodoApi>(f: &mut Frame, app: &App<A>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Form
            Constraint::Min(4),    // Upcoming
            Constraint::Min(4),    // Completed
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    render_form(f, app, chunks[0]);

    let sections = app.sections();
    let (upcoming_sel, completed_sel) = match app.selected {
        Some(i) if i < sections.upcoming.len() => (Some(i), None),
        Some(i) => (None, Some(i - sections.upcoming.len())),
        None => (None, None),
    };
    let list_focused = app.focus == Focus::List;
    render_list(f, "Upcoming", &sections.upcoming, upcoming_sel.filter(|_| list_focused), chunks[1]);
    render_list(f, "Completed", &sections.completed, completed_sel.filter(|_| list_focused), chunks[2]);

    let help_text = match (&app.status, app.focus) {
        (Some(err), _) => format!("Error: {}", err),
        (None, Focus::List) => "q: Quit | a: Add | e: Edit | Space: Toggle Done | d: Del | j/k: Move".to_string(),
        (None, Focus::Form) if app.vm.is_editing() => "Enter: Update | Tab: Next Field | Left/Right: Priority | Esc: Cancel".to_string(),
        (None, Focus::Form) => "Enter: Add | Tab: Next Field | Left/Right: Priority | Esc: Back".to_string(),
    };
    let help_style = if app.status.is_some() { Style::default().fg(Color::Red) } else { Style::default().fg(Color::Gray) };

    let help = Paragraph::new(help_text)
        .style(help_style)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[3]);
}

fn render_form<A: TodoApi>(f: &mut Frame, app: &App<A>, area: Rect) {
    let form = &app.vm.form;
    let field_style = |field: FormField| {
        if app.focus == Focus::Form && app.field == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };
    let due = if form.due_date.is_empty() && !(app.focus == Focus::Form && app.field == FormField::Due) {
        "YYYY-MM-DDTHH:MM".to_string()
    } else {
        form.due_date.clone()
    };

    let line = Line::from(vec![
        Span::raw("Title: "),
        Span::styled(format!("{:<30}", form.title), field_style(FormField::Title)),
        Span::raw(" Due: "),
        Span::styled(format!("{:<17}", due), field_style(FormField::Due)),
        Span::raw(" Priority: "),
        Span::styled(format!("< {} >", form.priority), field_style(FormField::Priority)),
    ]);

    let title = if app.vm.is_editing() { "Update Task (Esc: Cancel)" } else { "Add Task" };
    let border = if app.focus == Focus::Form { Style::default().fg(Color::Yellow) } else { Style::default() };
    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).border_style(border).title(title));
    f.render_widget(paragraph, area);
}

fn render_list(f: &mut Frame, title: &str, tasks: &[Task], selected: Option<usize>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());

    if tasks.is_empty() {
        let empty = Paragraph::new("No tasks")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = tasks
        .iter()
        .map(|t| {
            let style = if t.completed {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(if t.completed { "[x]" } else { "[ ]" }),
                Cell::from(t.title.clone()),
                Cell::from(t.due_at().map(local_string).or_else(|| t.due_date.clone()).unwrap_or_default()),
                Cell::from(t.priority.to_string()).style(Style::default().fg(priority_color(t.priority))),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["", "Title", "Due", "Priority"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut state = TableState::default();
    state.select(selected);
    f.render_stateful_widget(table, area, &mut state);
}

/// Due dates carry no zone; show them as local wall-clock time.
fn local_string(due: NaiveDateTime) -> String {
    match Local.from_local_datetime(&due).earliest() {
        Some(local) => local.format("%x %H:%M").to_string(),
        None => due.format("%Y-%m-%d %H:%M").to_string(),
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}
