//! `wait [duration]`: idle without touching the console.
//!
//! A bare `wait` (or `wait settle`) lasts one settle delay of the session's
//! [`Timing`](crate::Timing), so scripts follow `--settle-ms`.

use crate::command::{ConsoleCommand, Context};
use crate::parser::parse_duration;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

pub struct Wait {
    /// `None` means one settle delay.
    pub duration: Option<Duration>,
}

impl Wait {
    pub const NAME: &'static str = "wait";
}

#[async_trait(?Send)]
impl ConsoleCommand for Wait {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        let duration = match args.trim() {
            "" | "settle" => None,
            explicit => Some(parse_duration(explicit)?),
        };
        Ok(Self { duration })
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        let session = ctx.session();
        match self.duration {
            Some(duration) => session.pause(duration).await,
            None => session.settle().await,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explicit_duration() {
        assert_eq!(Wait::parse("2s").unwrap().duration, Some(Duration::from_secs(2)));
        assert_eq!(
            Wait::parse("250ms").unwrap().duration,
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_parse_settle() {
        assert_eq!(Wait::parse("").unwrap().duration, None);
        assert_eq!(Wait::parse(" settle ").unwrap().duration, None);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Wait::parse("soon").is_err());
    }
}
