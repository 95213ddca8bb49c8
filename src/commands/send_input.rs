//! `send "text"`: write a whole line to the console at once.
//!
//! Script syntax: `send "text here"`

use crate::command::{Context, ConsoleCommand};
use crate::parser::parse_quoted_string;
use anyhow::Result;
use async_trait::async_trait;

/// Writes a line to the console immediately, then waits the settle delay.
///
/// A newline is appended so the console receives a complete line.
pub struct SendInput {
    pub data: Vec<u8>,
}

impl SendInput {
    pub const NAME: &'static str = "send";

    /// Create a `SendInput` command. A newline is appended automatically.
    pub fn new(text: impl Into<String>) -> Self {
        let mut bytes = text.into().into_bytes();
        bytes.push(b'\n');
        Self { data: bytes }
    }
}

#[async_trait(?Send)]
impl ConsoleCommand for SendInput {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        Ok(Self::new(parse_quoted_string(args)?))
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        let session = ctx.session();
        session.write(&self.data).await?;
        session.settle().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ConsoleCommand;

    #[test]
    fn test_parse() {
        let cmd = SendInput::parse(r#""uname -a""#).unwrap();
        assert_eq!(cmd.data, b"uname -a\n");
    }

    #[test]
    fn test_newline_appended() {
        let cmd = SendInput::new("id");
        assert_eq!(cmd.data.last(), Some(&b'\n'));
    }
}
