use anyhow::{Context, Result, bail};
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgGroup, Parser};
use serial_console::{Credentials, Engine, LoginOutcome, Session, Timing, parse_file};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "serial-console",
    about = "Log in to a device console and supervise reboots without a human present",
    version
)]
#[command(group(ArgGroup::new("console").required(true).args(["port", "command"])))]
#[command(group(ArgGroup::new("mode").required(true).args(["script", "user"])))]
struct Args {
    /// Serial device to open, e.g. /dev/ttyUSB0
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate for the serial device
    #[arg(short, long, default_value_t = 115_200)]
    baud: u32,

    /// Program whose terminal is the console, e.g. virsh
    #[arg(short, long)]
    command: Option<String>,

    /// Path to a console script
    #[arg(short, long)]
    script: Option<String>,

    /// User to log in as when no script is given
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    user: Option<String>,

    /// Password for --user; empty when omitted
    #[arg(long)]
    password: Option<String>,

    /// After logging in, reboot and log in again
    #[arg(long, requires = "user")]
    reboot: bool,

    /// Delay after each write before reading the answer
    #[arg(long, default_value_t = 500)]
    settle_ms: u64,

    /// Upper bound on a single line read
    #[arg(long, default_value_t = 1000)]
    read_timeout_ms: u64,

    /// Upper bound on collecting output from a console that never goes quiet
    #[arg(long, default_value_t = 5000)]
    collect_limit_ms: u64,

    /// Consecutive empty reads tolerated before giving up
    #[arg(long, default_value_t = 60)]
    hang_budget: u32,

    /// Arguments to pass to the console program
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

impl Args {
    fn timing(&self) -> Timing {
        Timing {
            settle: Duration::from_millis(self.settle_ms),
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            collect_limit: Duration::from_millis(self.collect_limit_ms),
            hang_budget: self.hang_budget,
            ..Timing::default()
        }
    }

    fn open_session(&self) -> Result<Session> {
        let session = match (&self.port, &self.command) {
            (Some(port), _) => Session::open_serial(port, self.baud, self.timing())?,
            (None, Some(command)) => Session::spawn(command, &self.args, self.timing())?,
            (None, None) => bail!("either --port or --command is required"),
        };
        Ok(session.with_progress_handler(|event| println!("{event}")))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Surface script errors before touching the console.
    let commands = args
        .script
        .as_deref()
        .map(|path| {
            parse_file(path).with_context(|| format!("Failed to parse script file: {}", path))
        })
        .transpose()?;

    let mut session = args.open_session().context("Failed to open console")?;

    match (commands, &args.user) {
        (Some(commands), _) => {
            let mut engine = Engine::new(session);
            let result = engine
                .execute(commands)
                .await
                .context("Failed to execute script");
            engine.close();
            result
        }
        (None, Some(user)) => {
            let credentials = Credentials::new(user.as_str(), args.password.as_deref());
            let result = login_and_reboot(&mut session, &credentials, args.reboot).await;
            session.close();
            result
        }
        (None, None) => bail!("either --script or --user is required"),
    }
}

/// Log in, and with `reboot` set: reboot, then log in again.
async fn login_and_reboot(session: &mut Session, credentials: &Credentials, reboot: bool) -> Result<()> {
    login(session, credentials).await?;
    if reboot {
        let outcome = session.reboot().await?;
        if let Some(reason) = outcome.failure() {
            bail!("Reboot not confirmed: {}", reason);
        }
        login(session, credentials).await?;
    }
    Ok(())
}

async fn login(session: &mut Session, credentials: &Credentials) -> Result<()> {
    match session.login(credentials).await? {
        LoginOutcome::Authenticated => Ok(()),
        LoginOutcome::Failed(reason) => {
            bail!("Login failed for {}: {}", credentials.user(), reason)
        }
    }
}
