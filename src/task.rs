use std::fmt;
use std::io::{self, Write};

/// Default planned length of a task, in minutes.
pub const DEFAULT_LENGTH: u32 = 25;

/// Default width of the label column in verbose output.
pub const DEFAULT_LABEL_WIDTH: usize = 15;

/// Two-slot line template used by verbose output: a right-aligned label
/// column followed by the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    pub label_width: usize,
}

impl LineFormat {
    pub fn new(label_width: usize) -> Self {
        Self { label_width }
    }

    pub fn line(&self, label: &str, value: &str) -> String {
        format!("{label:>width$} : {value}", width = self.label_width)
    }

    /// Write one formatted line to `out`.
    pub fn say(&self, out: &mut dyn Write, label: &str, value: &str) -> io::Result<()> {
        writeln!(out, "{}", self.line(label, value))
    }
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_WIDTH)
    }
}

/// Something that can be shown in a task listing.
///
/// `Display` is the short, one-line form. `verbose_output` writes the
/// detailed field-per-line form.
pub trait Render: fmt::Display {
    fn verbose_output(&self, format: &LineFormat, out: &mut dyn Write) -> io::Result<()>;
}

/// Print `tasks` to `out`: one short line each, or every field followed by
/// a blank line when `verbose` is set.
pub fn print_tasks<T: Render>(
    tasks: &[T],
    verbose: bool,
    format: &LineFormat,
    out: &mut dyn Write,
) -> io::Result<()> {
    for task in tasks {
        if verbose {
            task.verbose_output(format, out)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{task}")?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub length: u32,
    complete: bool,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            length: DEFAULT_LENGTH,
            complete: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_length(mut self, minutes: u32) -> Self {
        self.length = minutes;
        self
    }

    pub fn complete(&mut self) {
        self.complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Render for Task {
    fn verbose_output(&self, format: &LineFormat, out: &mut dyn Write) -> io::Result<()> {
        format.say(out, "name", &self.name)?;
        format.say(out, "length", &format!("{} minutes", self.length))?;
        if !self.description.is_empty() {
            format.say(out, "description", &self.description)?;
        }
        let mark = if self.complete { "[✓]" } else { "[ ]" };
        format.say(out, "complete", mark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verbose(task: &Task, format: &LineFormat) -> String {
        let mut out = Vec::new();
        task.verbose_output(format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_line_format_right_aligns_label() {
        let format = LineFormat::new(8);
        assert_eq!(format.line("url", "x"), "     url : x");
    }

    #[test]
    fn test_line_format_does_not_truncate_long_label() {
        let format = LineFormat::new(2);
        assert_eq!(format.line("project", "a/b"), "project : a/b");
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("Write docs");
        assert_eq!(task.name, "Write docs");
        assert_eq!(task.description, "");
        assert_eq!(task.length, DEFAULT_LENGTH);
        assert!(!task.is_complete());
    }

    #[test]
    fn test_complete() {
        let mut task = Task::new("Write docs");
        task.complete();
        assert!(task.is_complete());
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(Task::new("Write docs").to_string(), "Write docs");
    }

    #[test]
    fn test_print_tasks_short() {
        let tasks = vec![Task::new("one"), Task::new("two")];
        let mut out = Vec::new();
        print_tasks(&tasks, false, &LineFormat::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_print_tasks_verbose_separates_with_blank_line() {
        let tasks = vec![Task::new("one"), Task::new("two")];
        let mut out = Vec::new();
        print_tasks(&tasks, true, &LineFormat::new(8), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("\n\n").count(), 2);
        assert!(out.starts_with("    name : one\n"));
        assert!(out.contains("\n\n    name : two\n"));
    }

    #[test]
    fn test_print_tasks_empty() {
        let mut out = Vec::new();
        print_tasks::<Task>(&[], true, &LineFormat::default(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_verbose_omits_empty_description() {
        let out = verbose(&Task::new("a").with_length(10), &LineFormat::new(6));
        assert_eq!(out, "  name : a\nlength : 10 minutes\ncomplete : [ ]\n");
    }

    #[test]
    fn test_verbose_includes_description_and_completion() {
        let mut task = Task::new("a").with_description("details");
        task.complete();
        let out = verbose(&task, &LineFormat::new(11));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "       name : a",
                "     length : 25 minutes",
                "description : details",
                "   complete : [✓]",
            ]
        );
    }
}
