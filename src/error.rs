use std::io;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("nvidia-smi not found. Make sure NVIDIA drivers are installed.")]
    ToolUnavailable,

    #[error("nvidia-smi {args} did not finish within {timeout:?}")]
    Timeout { args: String, timeout: Duration },

    #[error("failed to run nvidia-smi: {0}")]
    Spawn(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_unavailable_message_is_actionable() {
        assert_eq!(
            Error::ToolUnavailable.to_string(),
            "nvidia-smi not found. Make sure NVIDIA drivers are installed."
        );
    }

    #[test]
    fn timeout_message_names_the_query() {
        let err = Error::Timeout {
            args: "pmon -c 1 -s um".to_string(),
            timeout: Duration::from_secs(10),
        };
        assert_eq!(
            err.to_string(),
            "nvidia-smi pmon -c 1 -s um did not finish within 10s"
        );
    }
}
