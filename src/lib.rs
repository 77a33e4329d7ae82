pub mod channel;
pub mod config;
pub mod detect;
pub mod error;
pub mod personality;
pub mod session;
pub mod transfer;

pub use channel::Channel;
pub use config::SessionOptions;
pub use error::{CliError, Result};
pub use personality::Personality;
pub use session::CliSession;
pub use transfer::{Direction, TransferSpec, TransferVerifier};
