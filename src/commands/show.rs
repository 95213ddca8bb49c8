//! `show "text"`: narrate a script step through the session's progress handler.

use crate::command::{ConsoleCommand, Context};
use crate::event::Progress;
use crate::parser::take_quoted_string;
use anyhow::{Result, bail};
use async_trait::async_trait;

/// Reports a note alongside the login and reboot progress events. Nothing is
/// written to the console.
pub struct Show {
    pub text: String,
}

impl Show {
    pub const NAME: &'static str = "show";
}

#[async_trait(?Send)]
impl ConsoleCommand for Show {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        let (text, rest) = take_quoted_string(args)?;
        if !rest.is_empty() {
            bail!("show takes a single quoted note, got trailing: {}", rest);
        }
        Ok(Self { text })
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.session().emit(Progress::Note(self.text.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note() {
        assert_eq!(Show::parse(r#""flashing rootfs""#).unwrap().text, "flashing rootfs");
    }

    #[test]
    fn test_parse_rejects_trailing_words() {
        assert!(Show::parse(r#""flashing" rootfs"#).is_err());
        assert!(Show::parse(r#""unclosed"#).is_err());
    }
}
