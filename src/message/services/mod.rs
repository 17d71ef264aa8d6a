//! Application services for the message log.

mod log;

pub use log::{MessageLog, MessageLogError, MessageLogResult};
