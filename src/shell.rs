// Interactive menu loop over the task store

use crate::export::ExportFormat;
use crate::store::TaskStore;
use crate::task::{Task, Urgency};
use colored::Colorize;
use eyre::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::warn;

/// Menu-driven shell. Generic over input/output so tests can drive it
/// with in-memory buffers; `main` wires up stdin/stdout.
pub struct Shell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run the menu loop until the user exits or input reaches EOF.
    pub fn run(&mut self, store: &mut TaskStore) -> Result<()> {
        loop {
            self.print_menu()?;

            let Some(choice) = self.read_number()? else {
                // EOF: treat as exit
                return Ok(());
            };

            let result = match choice {
                1 => self.handle_add(store),
                2 => self.print_table("=== ALL TASKS ===", store.tasks()),
                3 => self.print_table("=== TASKS SORTED BY URGENCY ===", &store.sorted_by_urgency()),
                4 => self.handle_mark_completed(store),
                5 => self.handle_remove(store),
                6 => self.print_statistics(store),
                7 => self.handle_export(store),
                8 => self.handle_clear_completed(store),
                9 => self.handle_filter(store),
                0 => {
                    writeln!(self.output, "Thank you for using TODO App! Goodbye!")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "Invalid choice! Please select 0-9.")?;
                    Ok(())
                }
            };

            // Recoverable failures (unwritable export/log paths) keep the
            // session alive
            if let Err(e) = result {
                warn!(error = ?e, "Menu action failed");
                writeln!(self.output, "{} {:#}", "Error:".red(), e)?;
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "=== TODO APP MENU ===".bold())?;
        writeln!(self.output, "1. Add Task")?;
        writeln!(self.output, "2. View All Tasks")?;
        writeln!(self.output, "3. View Tasks Sorted by Urgency")?;
        writeln!(self.output, "4. Mark Task as Completed")?;
        writeln!(self.output, "5. Remove Task")?;
        writeln!(self.output, "6. View Statistics")?;
        writeln!(self.output, "7. Export Tasks")?;
        writeln!(self.output, "8. Clear Completed Tasks")?;
        writeln!(self.output, "9. Filter Tasks by Urgency")?;
        writeln!(self.output, "0. Exit")?;
        write!(self.output, "Enter your choice: ")?;
        self.output.flush()?;
        Ok(())
    }

    /// Read one line; None at EOF.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Read lines until one parses as a number; None at EOF.
    fn read_number(&mut self) -> Result<Option<u32>> {
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => {
                    write!(self.output, "Invalid input! Please enter a number: ")?;
                    self.output.flush()?;
                }
            }
        }
    }

    /// Re-prompt until a valid urgency is chosen; None at EOF.
    fn read_urgency(&mut self) -> Result<Option<Urgency>> {
        loop {
            writeln!(self.output, "\nSelect urgency level:")?;
            writeln!(self.output, "1. Low")?;
            writeln!(self.output, "2. Medium")?;
            writeln!(self.output, "3. High")?;
            writeln!(self.output, "4. Critical")?;
            write!(self.output, "Enter urgency (1-4): ")?;
            self.output.flush()?;

            let Some(choice) = self.read_number()? else {
                return Ok(None);
            };
            match Urgency::from_menu_choice(choice) {
                Some(urgency) => return Ok(Some(urgency)),
                None => {
                    writeln!(self.output, "Invalid input! Please enter a number between 1-4.")?
                }
            }
        }
    }

    fn handle_add(&mut self, store: &mut TaskStore) -> Result<()> {
        write!(self.output, "Enter task description: ")?;
        self.output.flush()?;

        let Some(description) = self.read_line()? else {
            return Ok(());
        };
        if description.is_empty() {
            writeln!(self.output, "Task description cannot be empty!")?;
            return Ok(());
        }

        let Some(urgency) = self.read_urgency()? else {
            return Ok(());
        };

        let id = store.add(description, urgency)?;
        writeln!(self.output, "{} ID: {}", "Task added successfully!".green(), id)?;
        Ok(())
    }

    fn handle_mark_completed(&mut self, store: &mut TaskStore) -> Result<()> {
        if store.tasks().is_empty() {
            writeln!(self.output, "No tasks available!")?;
            return Ok(());
        }

        self.print_table("=== ALL TASKS ===", store.tasks())?;
        write!(self.output, "Enter task ID to mark as completed: ")?;
        self.output.flush()?;

        let Some(id) = self.read_number()? else {
            return Ok(());
        };
        if store.mark_completed(id as u64)? {
            writeln!(self.output, "{}", "Task marked as completed!".green())?;
        } else {
            writeln!(self.output, "Task with ID {} not found!", id)?;
        }
        Ok(())
    }

    fn handle_remove(&mut self, store: &mut TaskStore) -> Result<()> {
        if store.tasks().is_empty() {
            writeln!(self.output, "No tasks available!")?;
            return Ok(());
        }

        self.print_table("=== ALL TASKS ===", store.tasks())?;
        write!(self.output, "Enter task ID to remove: ")?;
        self.output.flush()?;

        let Some(id) = self.read_number()? else {
            return Ok(());
        };
        if store.remove(id as u64)? {
            writeln!(self.output, "{}", "Task removed successfully!".green())?;
        } else {
            writeln!(self.output, "Task with ID {} not found!", id)?;
        }
        Ok(())
    }

    fn handle_export(&mut self, store: &mut TaskStore) -> Result<()> {
        if store.tasks().is_empty() {
            writeln!(self.output, "No tasks to export!")?;
            return Ok(());
        }

        writeln!(self.output, "\nSelect export format:")?;
        writeln!(self.output, "1. Text file (.txt)")?;
        writeln!(self.output, "2. CSV file (.csv)")?;
        writeln!(self.output, "3. JSON file (.json)")?;
        write!(self.output, "Enter format (1-3): ")?;
        self.output.flush()?;

        let Some(choice) = self.read_number()? else {
            return Ok(());
        };
        let Some(format) = ExportFormat::from_menu_choice(choice) else {
            writeln!(self.output, "Invalid choice!")?;
            return Ok(());
        };

        write!(self.output, "Enter filename (without extension): ")?;
        self.output.flush()?;
        let Some(mut name) = self.read_line()? else {
            return Ok(());
        };
        if name.is_empty() {
            name = "todo_export".to_string();
        }

        let path = PathBuf::from(format!("{}.{}", name, format.extension()));
        store.export(format, &path)?;
        writeln!(
            self.output,
            "{} {}",
            "Tasks exported successfully to".green(),
            path.display()
        )?;
        Ok(())
    }

    fn handle_clear_completed(&mut self, store: &mut TaskStore) -> Result<()> {
        let removed = store.clear_completed()?;
        if removed > 0 {
            writeln!(self.output, "Cleared {} completed tasks.", removed)?;
        } else {
            writeln!(self.output, "No completed tasks to clear.")?;
        }
        Ok(())
    }

    fn handle_filter(&mut self, store: &mut TaskStore) -> Result<()> {
        if store.tasks().is_empty() {
            writeln!(self.output, "No tasks available!")?;
            return Ok(());
        }

        let Some(urgency) = self.read_urgency()? else {
            return Ok(());
        };
        let filtered = store.filter_by_urgency(urgency);
        if filtered.is_empty() {
            writeln!(self.output, "No tasks found with {} urgency.", urgency)?;
            return Ok(());
        }

        self.print_table(&format!("=== TASKS WITH {} URGENCY ===", urgency), &filtered)
    }

    fn print_table(&mut self, title: &str, tasks: &[Task]) -> Result<()> {
        if tasks.is_empty() {
            writeln!(self.output, "No tasks available.")?;
            return Ok(());
        }

        writeln!(self.output, "\n{}", title.bold())?;
        // Plain header cells: width specifiers and ANSI color codes do
        // not compose
        writeln!(
            self.output,
            "{:<5}{:<40}{:<12}{:<20}{:<10}",
            "ID", "Description", "Urgency", "Created", "Status"
        )?;
        writeln!(self.output, "{}", "-".repeat(87))?;

        for task in tasks {
            let description: String = task.description.chars().take(39).collect();
            writeln!(
                self.output,
                "{:<5}{:<40}{:<12}{:<20}{:<10}",
                task.id,
                description,
                task.urgency.to_string(),
                task.created_str(),
                if task.completed { "DONE" } else { "PENDING" }
            )?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    fn print_statistics(&mut self, store: &TaskStore) -> Result<()> {
        let counts = store.counts();
        let by_urgency = store.pending_by_urgency();

        writeln!(self.output, "\n{}", "=== STATISTICS ===".bold())?;
        writeln!(self.output, "Total Tasks: {}", counts.total)?;
        writeln!(self.output, "Pending Tasks: {}", counts.pending)?;
        writeln!(self.output, "Completed Tasks: {}", counts.completed)?;

        writeln!(self.output, "\nPending Tasks by Urgency:")?;
        for urgency in Urgency::ALL.iter().rev() {
            writeln!(
                self.output,
                "  {}: {}",
                urgency.as_str(),
                by_urgency.get(*urgency)
            )?;
        }
        writeln!(self.output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_session(temp: &TempDir, input: &str) -> (String, TaskStore) {
        colored::control::set_override(false);

        let mut store =
            TaskStore::new(AuditLog::new(temp.path().join("todo_log.txt"))).unwrap();
        let mut output = Vec::new();
        Shell::new(Cursor::new(input.to_string()), &mut output)
            .run(&mut store)
            .unwrap();
        (String::from_utf8(output).unwrap(), store)
    }

    #[test]
    fn test_exit_choice() {
        let temp = TempDir::new().unwrap();
        let (output, _) = run_session(&temp, "0\n");
        assert!(output.contains("=== TODO APP MENU ==="));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_eof_exits_cleanly() {
        let temp = TempDir::new().unwrap();
        let (output, _) = run_session(&temp, "");
        assert!(output.contains("Enter your choice: "));
    }

    #[test]
    fn test_add_task_flow() {
        let temp = TempDir::new().unwrap();
        let (output, store) = run_session(&temp, "1\nBuy milk\n1\n0\n");

        assert!(output.contains("Enter task description: "));
        assert!(output.contains("Task added successfully! ID: 1"));
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].description, "Buy milk");
        assert_eq!(store.tasks()[0].urgency, Urgency::Low);
    }

    #[test]
    fn test_add_rejects_empty_description() {
        let temp = TempDir::new().unwrap();
        let (output, store) = run_session(&temp, "1\n\n0\n");

        assert!(output.contains("Task description cannot be empty!"));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_invalid_menu_choice_reprompts() {
        let temp = TempDir::new().unwrap();
        let (output, _) = run_session(&temp, "12\nabc\n0\n");

        assert!(output.contains("Invalid choice! Please select 0-9."));
        assert!(output.contains("Invalid input! Please enter a number: "));
    }

    #[test]
    fn test_invalid_urgency_reprompts() {
        let temp = TempDir::new().unwrap();
        let (output, store) = run_session(&temp, "1\nTask\n9\n4\n0\n");

        assert!(output.contains("Invalid input! Please enter a number between 1-4."));
        assert_eq!(store.tasks()[0].urgency, Urgency::Critical);
    }

    #[test]
    fn test_view_all_tasks_table() {
        let temp = TempDir::new().unwrap();
        let (output, _) = run_session(&temp, "1\nBuy milk\n1\n2\n0\n");

        assert!(output.contains("=== ALL TASKS ==="));
        assert!(output.contains("Buy milk"));
        assert!(output.contains("PENDING"));
    }

    #[test]
    fn test_view_all_empty() {
        let temp = TempDir::new().unwrap();
        let (output, _) = run_session(&temp, "2\n0\n");
        assert!(output.contains("No tasks available."));
    }

    #[test]
    fn test_sorted_view_orders_by_urgency() {
        let temp = TempDir::new().unwrap();
        let input = "1\nBuy milk\n1\n1\nFix prod outage\n4\n3\n0\n";
        let (output, _) = run_session(&temp, input);

        let section = output
            .split("=== TASKS SORTED BY URGENCY ===")
            .nth(1)
            .unwrap();
        let outage_pos = section.find("Fix prod outage").unwrap();
        let milk_pos = section.find("Buy milk").unwrap();
        assert!(outage_pos < milk_pos);
    }

    #[test]
    fn test_mark_completed_and_unknown_id() {
        let temp = TempDir::new().unwrap();
        let input = "1\nTask\n2\n4\n1\n4\n42\n0\n";
        let (output, store) = run_session(&temp, input);

        assert!(output.contains("Task marked as completed!"));
        assert!(output.contains("Task with ID 42 not found!"));
        assert!(store.tasks()[0].completed);
    }

    #[test]
    fn test_remove_flow() {
        let temp = TempDir::new().unwrap();
        let input = "1\nTask\n2\n5\n1\n0\n";
        let (output, store) = run_session(&temp, input);

        assert!(output.contains("Task removed successfully!"));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_remove_guard_when_empty() {
        let temp = TempDir::new().unwrap();
        let (output, _) = run_session(&temp, "5\n0\n");
        assert!(output.contains("No tasks available!"));
    }

    #[test]
    fn test_statistics_output() {
        let temp = TempDir::new().unwrap();
        let input = "1\na\n4\n1\nb\n2\n4\n2\n6\n0\n";
        let (output, _) = run_session(&temp, input);

        assert!(output.contains("=== STATISTICS ==="));
        assert!(output.contains("Total Tasks: 2"));
        assert!(output.contains("Pending Tasks: 1"));
        assert!(output.contains("Completed Tasks: 1"));
        assert!(output.contains("CRITICAL: 1"));
        assert!(output.contains("MEDIUM: 0"));
    }

    #[test]
    fn test_clear_completed_messages() {
        let temp = TempDir::new().unwrap();
        let input = "8\n1\na\n1\n4\n1\n8\n0\n";
        let (output, store) = run_session(&temp, input);

        assert!(output.contains("No completed tasks to clear."));
        assert!(output.contains("Cleared 1 completed tasks."));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_filter_by_urgency() {
        let temp = TempDir::new().unwrap();
        let input = "1\nlow one\n1\n1\nhigh one\n3\n9\n3\n0\n";
        let (output, _) = run_session(&temp, input);

        let section = output.split("=== TASKS WITH HIGH URGENCY ===").nth(1).unwrap();
        assert!(section.contains("high one"));
        assert!(!section.contains("low one"));
    }

    #[test]
    fn test_filter_no_match() {
        let temp = TempDir::new().unwrap();
        let input = "1\nonly low\n1\n9\n4\n0\n";
        let (output, _) = run_session(&temp, input);
        assert!(output.contains("No tasks found with CRITICAL urgency."));
    }

    #[test]
    fn test_export_guard_when_empty() {
        let temp = TempDir::new().unwrap();
        let (output, _) = run_session(&temp, "7\n0\n");
        assert!(output.contains("No tasks to export!"));
    }

    #[test]
    fn test_export_invalid_format_choice() {
        let temp = TempDir::new().unwrap();
        let input = "1\na\n1\n7\n9\n0\n";
        let (output, _) = run_session(&temp, input);
        assert!(output.contains("Invalid choice!"));
    }

    #[test]
    fn test_export_writes_file() {
        let temp = TempDir::new().unwrap();
        let export_base = temp.path().join("out");
        let input = format!("1\na\n1\n7\n2\n{}\n0\n", export_base.display());
        let (output, _) = run_session(&temp, &input);

        assert!(output.contains("Tasks exported successfully to"));
        let content = std::fs::read_to_string(temp.path().join("out.csv")).unwrap();
        assert!(content.starts_with("ID,Description,Urgency,Created,Status"));
    }

    #[test]
    fn test_export_failure_keeps_session_alive() {
        let temp = TempDir::new().unwrap();
        let bad_base = temp.path().join("missing").join("out");
        let input = format!("1\na\n1\n7\n1\n{}\n2\n0\n", bad_base.display());
        let (output, _) = run_session(&temp, &input);

        assert!(output.contains("Error:"));
        // Next menu action still works
        assert!(output.contains("=== ALL TASKS ==="));
    }

    #[test]
    fn test_long_description_truncated_in_table() {
        let temp = TempDir::new().unwrap();
        let long = "x".repeat(60);
        let input = format!("1\n{}\n1\n2\n0\n", long);
        let (output, _) = run_session(&temp, &input);

        assert!(output.contains(&"x".repeat(39)));
        assert!(!output.contains(&"x".repeat(40)));
    }
}
