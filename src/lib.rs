pub mod cleaner;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod smi;
pub mod status;
pub mod system;

pub use error::{Error, Result};
