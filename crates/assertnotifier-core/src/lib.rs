#![forbid(unsafe_code)]

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod fatal;
pub mod location;
pub mod messenger;
pub mod notifier;
pub mod startup;

pub use config::Config;
pub use error::{NotifierError, NotifierResult};
pub use location::SourceLocation;
pub use messenger::{AssertionMessenger, MessengerHandle};
pub use notifier::{AssertionNotifier, DEFAULT_DELAY, LOG_TARGET};
