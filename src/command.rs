//! The [`ConsoleCommand`] trait and the [`Context`] type commands receive when executed.

use crate::classify::contains;
use crate::session::Session;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub(crate) type OutputHandler = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Execution context passed to [`ConsoleCommand::execute`].
///
/// Provides access to the console session and the output handler that
/// echoed console lines and annotations are written to.
pub struct Context {
    pub(crate) session: Session,
    pub(crate) output_handler: OutputHandler,
}

impl Context {
    /// The console session the script is driving.
    pub fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Pass bytes through the output handler (e.g. to stdout or a custom sink).
    pub fn emit(&self, data: &[u8]) {
        (self.output_handler)(data);
    }

    /// Read console lines until `pattern` appears, or until `timeout`
    /// elapses. Every line read is echoed through the output handler.
    ///
    /// A pattern split across a partial read and its continuation still
    /// matches; output before the match is consumed.
    pub async fn wait_for_pattern(&mut self, pattern: &str, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut current = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Err(anyhow::anyhow!(
                    "Timeout waiting for pattern: '{}'",
                    pattern
                ));
            }

            let line = self.session.read_line_within(remaining).await?;
            if line.is_empty() {
                continue;
            }
            self.emit(&line);

            current.extend_from_slice(&line);
            if contains(&current, pattern.as_bytes()) {
                return Ok(());
            }
            if current.ends_with(b"\n") {
                current.clear();
            }
        }
    }
}

/// One step of a console script.
///
/// Each command carries a `NAME` constant holding its script keyword and is
/// listed, with its `parse_boxed`, in the parser's keyword registry.
#[async_trait(?Send)]
pub trait ConsoleCommand: 'static {
    /// The script keyword, for log lines and error context.
    fn name(&self) -> &'static str;

    /// Build the command from the text following its keyword.
    fn parse(args: &str) -> Result<Self>
    where
        Self: Sized;

    /// [`parse`](Self::parse), boxed for the keyword registry.
    fn parse_boxed(args: &str) -> Result<Box<dyn ConsoleCommand>>
    where
        Self: Sized,
    {
        Ok(Box::new(Self::parse(args)?))
    }

    /// Run against the script's console session.
    async fn execute(&self, ctx: &mut Context) -> Result<()>;
}
