//! `type "text"`: key a line in one character at a time.
//!
//! Script syntax: `type "text here"`

use crate::command::{Context, ConsoleCommand};
use crate::parser::parse_quoted_string;
use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Sends `text` to the console one character at a time with random
/// per-character delays, then submits the line with a newline.
///
/// Serial consoles with small receive buffers or slow getty loops drop
/// characters from pasted input; typing paces the writes.
pub struct TypeText {
    pub text: String,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl TypeText {
    pub const NAME: &'static str = "type";

    /// Create a `TypeText` command with default timing (20–60 ms per character).
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_timing(text, Duration::from_millis(20), Duration::from_millis(60))
    }

    /// Create a `TypeText` command with custom per-character timing.
    pub fn with_timing(text: impl Into<String>, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            text: text.into(),
            min_delay,
            max_delay,
        }
    }
}

#[async_trait(?Send)]
impl ConsoleCommand for TypeText {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        Ok(Self::new(parse_quoted_string(args)?))
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        let session = ctx.session();
        let mut buf = [0u8; 4];
        for ch in self.text.chars() {
            session.write(ch.encode_utf8(&mut buf).as_bytes()).await?;
            // Drop rng before the await so it does not cross the yield point.
            let delay_ms = {
                let mut rng = rand::thread_rng();
                rng.gen_range(self.min_delay.as_millis()..=self.max_delay.as_millis())
            };
            sleep(Duration::from_millis(delay_ms as u64)).await;
        }

        session.write(b"\n").await?;
        session.settle().await;

        Ok(())
    }
}
