//! Output helpers: the JSON mode switch, colored human lines, and progress
//! notes on stderr.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

/// Pretty-print a report struct as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `     label  message` with a colored label column.
pub fn labeled(label: &str, message: &str) -> anyhow::Result<()> {
    let mut out = StandardStream::stdout(ColorChoice::Auto);
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(out, "{label:>12}")?;
    out.reset()?;
    writeln!(out, "  {message}")?;
    Ok(())
}

/// Progress note on stderr; shown in both output modes.
pub fn note(message: &str) {
    let _ = writeln!(std::io::stderr(), "{message}");
}
