//! Terminal presentation: colors, progress and diagnostics.

use indicatif::{ProgressBar, ProgressStyle};
use libmanifest::{ColorChoice, Palette};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

/// Whether output styled for `choice` should carry colors on a stream.
pub fn should_color(choice: ColorChoice, is_terminal: bool) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => is_terminal,
    }
}

/// Palette for human-readable output written to stdout.
pub fn stdout_palette(choice: ColorChoice) -> Palette {
    Palette::new(should_color(choice, std::io::stdout().is_terminal()))
}

/// Create a spinner on stderr, hidden when stderr is not a terminal.
pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print an error message to stderr
pub fn error(message: &str) {
    let colored = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    eprintln!("{}", error_line(message, colored));
}

fn error_line(message: &str, colored: bool) -> String {
    if colored {
        format!("{} {}", "✗".red().bold(), message)
    } else {
        format!("✗ {}", message)
    }
}
