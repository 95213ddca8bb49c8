//! `expect "pattern" [timeout]`: block until `pattern` shows up on the console.
//!
//! Script syntax:
//! - `expect "# "` gives up after 5 seconds
//! - `expect "Password:" 10s` gives up after 10

use crate::command::{Context, ConsoleCommand};
use crate::parser::{parse_duration, take_quoted_string};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Reads console lines until `pattern` appears, or until `timeout` elapses.
///
/// Lines read while waiting are echoed to the output handler.
pub struct Expect {
    pub pattern: String,
    pub timeout: Duration,
}

impl Expect {
    pub const NAME: &'static str = "expect";

    /// Create an `Expect` command with the default 5-second timeout.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Create an `Expect` command with a custom timeout.
    pub fn with_timeout(pattern: impl Into<String>, timeout: Duration) -> Self {
        Self {
            pattern: pattern.into(),
            timeout,
        }
    }
}

#[async_trait(?Send)]
impl ConsoleCommand for Expect {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        let (pattern, remainder) = take_quoted_string(args)?;
        if remainder.is_empty() {
            Ok(Self::new(pattern))
        } else {
            Ok(Self::with_timeout(pattern, parse_duration(remainder)?))
        }
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.wait_for_pattern(&self.pattern, self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ConsoleCommand;

    #[test]
    fn test_parse_default_timeout() {
        let cmd = Expect::parse(r##""# ""##).unwrap();
        assert_eq!(cmd.pattern, "# ");
        assert_eq!(cmd.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_parse_custom_timeout() {
        let cmd = Expect::parse(r#""reached target" 90s"#).unwrap();
        assert_eq!(cmd.pattern, "reached target");
        assert_eq!(cmd.timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_parse_ms_timeout() {
        let cmd = Expect::parse(r#""Ready" 500ms"#).unwrap();
        assert_eq!(cmd.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_parse_unclosed_quote() {
        assert!(Expect::parse(r#""unclosed"#).is_err());
    }

    #[test]
    fn test_parse_missing_quote() {
        assert!(Expect::parse("no_quotes").is_err());
    }
}
