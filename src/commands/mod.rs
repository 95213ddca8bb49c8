mod expect;
mod login;
mod reboot;
mod send_input;
mod show;
mod type_text;
mod wait;

pub use expect::Expect;
pub use login::Login;
pub use reboot::Reboot;
pub use send_input::SendInput;
pub use show::Show;
pub use type_text::TypeText;
pub use wait::Wait;
