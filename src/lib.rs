//! # serial-console
//!
//! Unattended login and reboot supervision for text consoles.
//!
//! A [`Session`] owns one console transport: a serial line
//! ([`SerialTransport`]) or a program running inside a PTY
//! ([`PtyTransport`]), such as `virsh console`. On top of it sit two state
//! machines:
//!
//! - the **login handshake** ([`Session::login`]) works out whether the
//!   console shows a fresh login prompt, a stale password prompt or an
//!   existing shell, types the credentials, waits for the `<user>@` shell
//!   marker and checks `whoami`;
//! - the **reboot monitor** ([`Session::reboot`]) writes `reboot` and
//!   watches the bursty boot log until a login prompt comes back, giving up
//!   after a run of silent read cycles.
//!
//! Both flows report expected device behaviour as outcome values and only
//! return `Err` for transport faults or a closed session.
//!
//! ## Quick start
//!
//! ```no_run
//! use serial_console::{Session, Timing};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut session = Session::open_serial("/dev/ttyUSB0", 115200, Timing::default())?;
//!
//!     if !session.try_login("root", Some("toor")).await? {
//!         anyhow::bail!("login failed");
//!     }
//!     if session.try_reboot().await? {
//!         session.try_login("root", Some("toor")).await?;
//!     }
//!     session.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Console scripts
//!
//! Use [`parse_str`] or [`parse_file`] to turn a script into commands and
//! run them with an [`Engine`]:
//!
//! | Command | Description |
//! |---------|-------------|
//! | `login "user" "password"` | Run the login handshake; the password is optional |
//! | `reboot` | Reboot and wait for the login prompt to return |
//! | `send "text"` | Write a line to the console at once |
//! | `type "text"` | Write a line one character at a time |
//! | `expect "pattern" 5s` | Wait until `pattern` appears in the console output |
//! | `wait 500ms` | Pause for a duration (`ms`, `s` or `m`, floats allowed); a bare `wait` lasts one settle delay |
//! | `show "text"` | Report a note through the session's progress handler |
//! | `# comment` | Full-line or inline comment |
//!
//! ```no_run
//! use serial_console::{Engine, Session, Timing, parse_str};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let commands = parse_str(r#"
//! login "root" "toor"
//! send "uname -r"
//! expect "6."
//! reboot
//! login "root" "toor"
//! "#)?;
//!
//!     let args = vec!["console".to_string(), "testvm".to_string()];
//!     let session = Session::spawn("virsh", &args, Timing::default())?;
//!     let mut engine = Engine::new(session);
//!     engine.execute(commands).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Custom transports
//!
//! Anything that implements [`Transport`] can back a session, which is how
//! the flows are tested against scripted consoles.

pub mod classify;
pub mod command;
pub mod commands;
pub mod engine;
pub mod error;
pub mod event;
pub(crate) mod line_reader;
pub mod login;
pub mod parser;
pub mod pty;
pub mod reboot;
pub mod serial;
pub mod session;
pub mod timing;
pub mod transport;

pub use classify::{LoginState, RebootState};
pub use command::{ConsoleCommand, Context};
pub use commands::{Expect, Login, Reboot, SendInput, Show, TypeText, Wait};
pub use engine::Engine;
pub use error::{Failure, LoginOutcome, RebootOutcome, SessionError};
pub use event::Progress;
pub use login::Credentials;
pub use parser::{parse_file, parse_str};
pub use pty::PtyTransport;
pub use serial::SerialTransport;
pub use session::Session;
pub use timing::{HangCounter, Timing};
pub use transport::Transport;
