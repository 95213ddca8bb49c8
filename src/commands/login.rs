//! `login "user" ["password"]`: run the login handshake.
//!
//! Script syntax:
//! - `login "root"` sends an empty password
//! - `login "operator" "s3cret"`

use crate::command::{Context, ConsoleCommand};
use crate::error::LoginOutcome;
use crate::login::Credentials;
use crate::parser::take_quoted_string;
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;

/// Logs in on the console, failing the script if no shell is confirmed.
pub struct Login {
    pub credentials: Credentials,
}

impl Login {
    pub const NAME: &'static str = "login";

    pub fn new(user: impl Into<String>, password: Option<&str>) -> Self {
        Self {
            credentials: Credentials::new(user, password),
        }
    }
}

#[async_trait(?Send)]
impl ConsoleCommand for Login {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        let (user, rest) = take_quoted_string(args)?;
        if user.is_empty() {
            return Err(anyhow!("User name must not be empty"));
        }
        if rest.is_empty() {
            return Ok(Self::new(user, None));
        }

        let (password, rest) = take_quoted_string(rest)?;
        if !rest.is_empty() {
            return Err(anyhow!("Unexpected arguments after password: {}", rest));
        }
        Ok(Self::new(user, Some(&password)))
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        let user = self.credentials.user();
        match ctx.session().login(&self.credentials).await? {
            LoginOutcome::Authenticated => Ok(()),
            LoginOutcome::Failed(reason) => bail!("Login failed for {}: {}", user, reason),
        }
    }
}
