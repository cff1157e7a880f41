mod args;
mod error;
mod logger;

pub use args::CliArgs;
pub use error::{TabchatError, UploadRejection};
pub use logger::setup_logging;
