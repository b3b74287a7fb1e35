use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::api::TodoApi;
use crate::error::{Error, Result};
use crate::models::{Priority, Task};
use crate::view_model::ViewModel;

/// Adds a new task.
///
/// The title is checked before anything is sent; an empty one is rejected
/// without contacting the server.
pub fn cmd_add<A: TodoApi>(api: A, title: String, due: Option<String>, priority: Option<Priority>, silent: bool) -> Result<Task> {
    let mut vm = ViewModel::new(api);
    vm.form.title = title;
    vm.form.due_date = due.unwrap_or_default();
    vm.form.priority = priority.unwrap_or_default();
    let task = vm.submit_create()?;
    if !silent { println!("Task added (id = {})", task.id); }
    Ok(task)
}

/// Edits an existing task's details.
///
/// Fields left as `None` keep their current value; `due` set to an empty
/// string clears the due date.
pub fn cmd_edit<A: TodoApi>(api: A, id: &str, title: Option<String>, due: Option<String>, priority: Option<Priority>, silent: bool) -> Result<Task> {
    let mut vm = ViewModel::new(api);
    vm.load()?;
    let task = vm.find(id).cloned().ok_or_else(|| Error::NotFound(id.to_string()))?;
    vm.start_edit(&task);
    if let Some(t) = title { vm.form.title = t; }
    if let Some(d) = due { vm.form.due_date = d; }
    if let Some(p) = priority { vm.form.priority = p; }
    let updated = vm.submit()?;
    if !silent { println!("Task {} updated.", id); }
    Ok(updated)
}

/// Toggles the completion flag of a task.
pub fn cmd_complete<A: TodoApi>(api: A, id: &str, silent: bool) -> Result<Task> {
    let mut vm = ViewModel::new(api);
    vm.load()?;
    let task = vm.find(id).cloned().ok_or_else(|| Error::NotFound(id.to_string()))?;
    let updated = vm.toggle_complete(&task)?;
    if !silent {
        let state = if updated.completed { "complete" } else { "not complete" };
        println!("Task {} marked as {}.", id, state);
    }
    Ok(updated)
}

/// Removes a task by ID.
pub fn cmd_remove<A: TodoApi>(api: A, id: &str, silent: bool) -> Result<()> {
    let mut vm = ViewModel::new(api);
    vm.remove(id)?;
    if !silent { println!("Task {} removed.", id); }
    Ok(())
}

/// Prints the Upcoming and Completed sections as tables.
pub fn cmd_list<A: TodoApi>(api: A) -> Result<()> {
    let mut vm = ViewModel::new(api);
    vm.load()?;
    let sections = vm.categorized();

    println!("Upcoming");
    print_section(&sections.upcoming);
    println!("Completed");
    print_section(&sections.completed);
    Ok(())
}

fn print_section(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let status = if t.completed { "Done" } else { "Pending" };
        let status_color = if t.completed { Color::Green } else { Color::Yellow };

        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(&t.title),
            Cell::new(t.due_at().map(|d| d.format("%Y-%m-%d %H:%M").to_string()).or_else(|| t.due_date.clone()).unwrap_or_default()),
            Cell::new(t.priority).fg(priority_color(t.priority)),
            Cell::new(status).fg(status_color),
        ]);
    }

    println!("{table}");
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}
