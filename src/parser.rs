//! Console script parsing.
//!
//! A script is one command per line: a keyword followed by its arguments.
//! `#` starts a comment unless it sits inside a double-quoted argument.

use crate::command::ConsoleCommand;
use crate::commands::{Expect, Login, Reboot, SendInput, Show, TypeText, Wait};
use anyhow::{Context as _, Result, anyhow, bail};
use std::path::Path;
use std::time::Duration;

type ParseFn = fn(&str) -> Result<Box<dyn ConsoleCommand>>;

/// Script keywords and the parsers for their arguments.
static REGISTRY: &[(&str, ParseFn)] = &[
    (Login::NAME, Login::parse_boxed),
    (Reboot::NAME, Reboot::parse_boxed),
    (TypeText::NAME, TypeText::parse_boxed),
    (SendInput::NAME, SendInput::parse_boxed),
    (Show::NAME, Show::parse_boxed),
    (Wait::NAME, Wait::parse_boxed),
    (Expect::NAME, Expect::parse_boxed),
];

/// Duration suffixes in milliseconds, longest first so `ms` is not read as `m`.
const UNITS: &[(&str, f64)] = &[("ms", 1.0), ("s", 1_000.0), ("m", 60_000.0)];

/// Parse a whole script held in memory.
///
/// Errors name the offending line number.
///
/// ```
/// use serial_console::parse_str;
///
/// let commands = parse_str("login \"root\" \"toor\"\nreboot\n").unwrap();
/// assert_eq!(commands.len(), 2);
/// ```
pub fn parse_str(content: &str) -> Result<Vec<Box<dyn ConsoleCommand>>> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let code = without_comment(raw);
            (!code.is_empty()).then_some((idx + 1, code))
        })
        .map(|(number, code)| {
            parse_line(code).with_context(|| format!("Failed to parse line {}: {}", number, code))
        })
        .collect()
}

/// Read and parse the script at `path`.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Box<dyn ConsoleCommand>>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script file: {}", path.display()))?;
    parse_str(&content)
}

fn parse_line(code: &str) -> Result<Box<dyn ConsoleCommand>> {
    let (keyword, args) = code
        .split_once(char::is_whitespace)
        .unwrap_or((code, ""));
    let (_, parse) = REGISTRY
        .iter()
        .find(|(name, _)| *name == keyword)
        .ok_or_else(|| anyhow!("Unknown command: {}", keyword))?;
    parse(args)
}

/// The trimmed part of `line` before any unquoted `#`.
fn without_comment(line: &str) -> &str {
    let mut quoted = false;
    let mut chars = line.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' if quoted => {
                chars.next();
            }
            '"' => quoted = !quoted,
            '#' if !quoted => return line[..idx].trim(),
            _ => {}
        }
    }
    line.trim()
}

/// Parse `500ms`, `1.5s` or `2m`.
pub(crate) fn parse_duration(text: &str) -> Result<Duration> {
    let text = text.trim();
    let (number, scale) = UNITS
        .iter()
        .find_map(|(suffix, scale)| text.strip_suffix(suffix).map(|number| (number, *scale)))
        .ok_or_else(|| anyhow!("Duration needs a unit (ms, s or m), got: {}", text))?;
    let value: f64 = number
        .trim()
        .parse()
        .with_context(|| format!("Invalid duration: {}", text))?;
    Duration::try_from_secs_f64(value * scale / 1_000.0).with_context(|| format!("Invalid duration: {}", text))
}

/// Parse an argument that is exactly one quoted string.
pub(crate) fn parse_quoted_string(args: &str) -> Result<String> {
    let (text, rest) = take_quoted_string(args)?;
    if !rest.is_empty() {
        bail!("Unexpected text after quoted string: {}", rest);
    }
    Ok(text)
}

/// Split a leading quoted string off `args`.
///
/// Returns the unescaped contents and the trimmed text after the closing
/// quote. Recognised escapes are `\n`, `\r`, `\t`, `\"` and `\\`; any other
/// backslash is kept as written.
pub(crate) fn take_quoted_string(args: &str) -> Result<(String, &str)> {
    let args = args.trim_start();
    let Some(body) = args.strip_prefix('"') else {
        bail!("Expected a quoted string, got: {}", args);
    };

    let mut text = String::new();
    let mut chars = body.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => return Ok((text, body[idx + 1..].trim())),
            '\\' => match chars.next().map(|(_, escaped)| escaped) {
                Some('n') => text.push('\n'),
                Some('r') => text.push('\r'),
                Some('t') => text.push('\t'),
                Some('"') => text.push('"'),
                Some('\\') => text.push('\\'),
                Some(other) => {
                    text.push('\\');
                    text.push(other);
                }
                None => break,
            },
            _ => text.push(ch),
        }
    }
    bail!("Unclosed quote in: {}", args)
}
