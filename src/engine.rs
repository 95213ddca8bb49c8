use crate::command::{ConsoleCommand, Context};
use crate::session::Session;
use anyhow::{Context as _, Result};
use std::io::{self, Write};
use std::sync::Arc;

/// Runs console script commands against one session, in order.
pub struct Engine {
    ctx: Context,
}

impl Engine {
    /// Create an engine whose echoed console output goes to stdout.
    pub fn new(session: Session) -> Self {
        Self::with_handler(session, |data| {
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(data);
            let _ = stdout.flush();
        })
    }

    /// Create an engine that sends echoed console output to `handler`.
    pub fn with_handler<F>(session: Session, handler: F) -> Self
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        Engine {
            ctx: Context {
                session,
                output_handler: Arc::new(handler),
            },
        }
    }

    /// Execute commands until one fails.
    pub async fn execute(&mut self, commands: Vec<Box<dyn ConsoleCommand>>) -> Result<()> {
        for (idx, command) in commands.iter().enumerate() {
            tracing::debug!(step = idx + 1, command = command.name(), "executing");
            command
                .execute(&mut self.ctx)
                .await
                .with_context(|| format!("Step {} ({}) failed", idx + 1, command.name()))?;
        }
        Ok(())
    }

    pub fn session(&mut self) -> &mut Session {
        self.ctx.session()
    }

    /// Close the console session.
    pub fn close(mut self) {
        self.ctx.session.close();
    }
}
