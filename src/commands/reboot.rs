//! `reboot`: restart the device and wait for its login prompt.
//!
//! Script syntax: `reboot`

use crate::command::{Context, ConsoleCommand};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;

/// Writes `reboot` and fails the script unless a login prompt returns
/// within the hang budget.
pub struct Reboot;

impl Reboot {
    pub const NAME: &'static str = "reboot";
}

#[async_trait(?Send)]
impl ConsoleCommand for Reboot {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        if !args.trim().is_empty() {
            return Err(anyhow!("'reboot' takes no arguments, got: {}", args.trim()));
        }
        Ok(Self)
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        let outcome = ctx.session().reboot().await?;
        if let Some(reason) = outcome.failure() {
            bail!("Reboot not confirmed: {}", reason);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ConsoleCommand;

    #[test]
    fn test_parse() {
        assert_eq!(Reboot::parse("").unwrap().name(), "reboot");
        assert!(Reboot::parse("  ").is_ok());
    }

    #[test]
    fn test_parse_rejects_arguments() {
        assert!(Reboot::parse("now").is_err());
    }
}
