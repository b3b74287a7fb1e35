use crate::api::TodoApi;
use crate::error::Result;
use crate::models::Task;
use crate::view_model::{Categorized, ViewModel};

/// Which pane receives key presses.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Focus {
    List,
    Form,
}

/// Field of the form currently being typed into.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum FormField {
    Title,
    Due,
    Priority,
}

impl FormField {
    fn next(self) -> FormField {
        match self {
            FormField::Title => FormField::Due,
            FormField::Due => FormField::Priority,
            FormField::Priority => FormField::Title,
        }
    }
}

pub struct App<A: TodoApi> {
    pub vm: ViewModel<A>,
    pub focus: Focus,
    pub field: FormField,
    /// Index into upcoming followed by completed.
    pub selected: Option<usize>,
    /// Last error, shown in the help bar until the next action.
    pub status: Option<String>,
}

impl<A: TodoApi> App<A> {
    /// Creates a new App instance and loads initial data.
    pub fn new(api: A) -> Result<App<A>> {
        let mut vm = ViewModel::new(api);
        vm.load()?;
        let mut app = App {
            vm,
            focus: Focus::List,
            field: FormField::Title,
            selected: None,
            status: None,
        };
        app.clamp_selection();
        Ok(app)
    }

    pub fn sections(&self) -> Categorized {
        self.vm.categorized()
    }

    pub fn selected_task(&self) -> Option<Task> {
        let i = self.selected?;
        self.sections().get(i).cloned()
    }

    /// Selects the next item in the combined list.
    pub fn next(&mut self) {
        let len = self.sections().len();
        if len == 0 { return; }
        let i = match self.selected {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.selected = Some(i);
    }

    /// Selects the previous item in the combined list.
    pub fn previous(&mut self) {
        let len = self.sections().len();
        if len == 0 { return; }
        let i = match self.selected {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    /// Flips completion of the selected task.
    pub fn toggle_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            let res = self.vm.toggle_complete(&task).map(|_| ());
            self.report(res);
        }
    }

    /// Deletes the selected task.
    pub fn delete_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            let res = self.vm.remove(&task.id);
            self.report(res);
        }
    }

    /// Loads the selected task into the form.
    pub fn edit_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.vm.start_edit(&task);
            self.focus = Focus::Form;
            self.field = FormField::Title;
            self.status = None;
        }
    }

    /// Moves focus to the form, keeping whatever mode it is in.
    pub fn start_add(&mut self) {
        self.focus = Focus::Form;
        self.field = FormField::Title;
        self.status = None;
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn input_char(&mut self, c: char) {
        match self.field {
            FormField::Title => self.vm.form.title.push(c),
            FormField::Due => self.vm.form.due_date.push(c),
            FormField::Priority => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            FormField::Title => { self.vm.form.title.pop(); }
            FormField::Due => { self.vm.form.due_date.pop(); }
            FormField::Priority => {}
        }
    }

    pub fn cycle_priority(&mut self, forward: bool) {
        let p = self.vm.form.priority;
        self.vm.form.priority = if forward { p.next() } else { p.previous() };
    }

    /// Submits the form: Add in idle mode, Update while editing.
    ///
    /// An empty title keeps focus on the form and sends nothing.
    pub fn submit(&mut self) {
        match self.vm.submit() {
            Ok(_) => {
                self.status = None;
                self.focus = Focus::List;
                self.field = FormField::Title;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
        self.clamp_selection();
    }

    /// Leaves the form; while editing this also discards the edit.
    pub fn cancel(&mut self) {
        if self.vm.is_editing() {
            self.vm.cancel_edit();
        }
        self.focus = Focus::List;
        self.field = FormField::Title;
        self.status = None;
    }

    fn report(&mut self, res: Result<()>) {
        self.status = res.err().map(|e| e.to_string());
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.sections().len();
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            None => Some(0),
            keep => keep,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::storage::Store;

    fn app_with(titles: &[(&str, Priority)]) -> (tempfile::TempDir, App<Store>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("todos.json"));
        for (title, priority) in titles {
            store
                .create(&crate::models::NewTask {
                    title: title.to_string(),
                    due_date: None,
                    priority: Some(*priority),
                })
                .unwrap();
        }
        let app = App::new(store).unwrap();
        (dir, app)
    }

    #[test]
    fn selection_walks_upcoming_then_completed() {
        let (_dir, mut app) = app_with(&[("low", Priority::Low), ("high", Priority::High)]);
        assert_eq!(app.selected_task().unwrap().title, "high");
        app.next();
        assert_eq!(app.selected_task().unwrap().title, "low");
        app.next();
        assert_eq!(app.selected_task().unwrap().title, "high");
        app.previous();
        assert_eq!(app.selected_task().unwrap().title, "low");
    }

    #[test]
    fn typing_and_submitting_adds_a_task() {
        let (_dir, mut app) = app_with(&[]);
        assert_eq!(app.selected, None);
        app.start_add();
        for c in "Buy milk".chars() {
            app.input_char(c);
        }
        app.next_field();
        app.next_field();
        app.cycle_priority(false);
        app.submit();
        assert_eq!(app.focus, Focus::List);
        assert_eq!(app.status, None);
        let task = app.selected_task().unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn empty_title_keeps_the_form_open() {
        let (_dir, mut app) = app_with(&[]);
        app.start_add();
        app.submit();
        assert_eq!(app.focus, Focus::Form);
        assert!(app.status.is_some());
        assert!(app.vm.tasks().is_empty());
    }

    #[test]
    fn cancel_discards_an_edit() {
        let (_dir, mut app) = app_with(&[("write", Priority::Medium)]);
        app.edit_selected();
        assert!(app.vm.is_editing());
        app.input_char('!');
        app.cancel();
        assert!(!app.vm.is_editing());
        assert_eq!(app.vm.form.title, "");
        assert_eq!(app.vm.tasks()[0].title, "write");
    }

    #[test]
    fn toggle_moves_task_to_completed() {
        let (_dir, mut app) = app_with(&[("write", Priority::Medium)]);
        app.toggle_selected();
        let sections = app.sections();
        assert!(sections.upcoming.is_empty());
        assert_eq!(sections.completed.len(), 1);
        app.delete_selected();
        assert!(app.sections().is_empty());
        assert_eq!(app.selected, None);
    }
}
