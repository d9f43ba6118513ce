//! Diagnostics for git-owl.
//!
//! Everything here goes to stderr; command results (paths, `check`
//! findings) are printed to stdout by the commands themselves so they stay
//! pipeable. `--quiet` keeps only warnings and errors, `--verbose` adds
//! per-step detail.

use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};

/// How much diagnostic output to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Warnings and errors only
    Quiet = 0,
    /// Notices and per-file actions
    Normal = 1,
    /// Also per-step detail
    Verbose = 2,
}

static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Normal as u8);

/// Sets the process-wide verbosity, once from `main`.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

fn shows(level: Verbosity) -> bool {
    VERBOSITY.load(Ordering::Relaxed) >= level as u8
}

/// A finished operation, in green.
pub fn success(message: &str) {
    if shows(Verbosity::Normal) {
        eprintln!("{}", message.green());
    }
}

/// A fatal error, prefixed `error:`; always shown.
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

/// Something the user should look at; always shown.
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

/// A dimmed notice.
pub fn info(message: &str) {
    if shows(Verbosity::Normal) {
        eprintln!("{}", message.dimmed());
    }
}

/// Per-step detail, only with `--verbose`.
pub fn verbose(message: &str) {
    if shows(Verbosity::Verbose) {
        eprintln!("{}", message.dimmed());
    }
}

/// `verb path` line for a file a command acted on, e.g. `added: data/x.bin`.
pub fn action(verb: &str, subject: &str) {
    if shows(Verbosity::Normal) {
        eprintln!("{} {subject}", verb.dimmed().bold());
    }
}
