//! Output formatting: table, JSON, plain.
//!
//! Table uses `tabled`, JSON serializes the underlying wire data, plain
//! emits one value per line for scripting.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

/// Whether decorated output makes sense on this stdout.
pub fn use_color() -> bool {
    io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err()
}

/// Render serializable data in the chosen format. `rows` feeds the
/// table view, `plain_fn` emits the scripting view.
pub fn render<T, R>(
    format: &OutputFormat,
    data: &T,
    rows: Vec<R>,
    plain_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => render_table(&rows),
        OutputFormat::Json => render_json(data),
        OutputFormat::Plain => plain_fn(data),
    }
}

pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}
