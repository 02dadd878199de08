pub mod base64;
pub mod error;
pub mod list;
pub mod log;

pub use error::{Result, UtilsError};
pub use list::{Cursor, ItemKey, ItemPolicy, List, ListError, Plain};
pub use log::{Backend, Level, LevelFilter, Logger, LoggerBuilder};
