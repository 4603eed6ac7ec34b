use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors which end a capture session
///
/// Only initialization and stream control produce these. A frame that could not be fetched
/// while streaming is not an error, see [`crate::io::mmap::Stream::next`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to open device {}: {source}", .path.display())]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to set video device {what}: {source}")]
    FormatNegotiation {
        what: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("unable to set up buffers ({stage}{}): {source}", slot_suffix(.index))]
    BufferSetup {
        stage: &'static str,
        index: Option<u32>,
        #[source]
        source: io::Error,
    },

    #[error("unable to {action} stream: {source}")]
    Stream {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn buffer_setup(stage: &'static str, index: Option<u32>, source: io::Error) -> Self {
        Error::BufferSetup {
            stage,
            index,
            source,
        }
    }
}

fn slot_suffix(index: &Option<u32>) -> String {
    index.map(|i| format!(", index {i}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = Error::DeviceOpen {
            path: PathBuf::from("/dev/video9"),
            source: io::Error::from_raw_os_error(libc::ENOENT),
        };
        assert!(e.to_string().starts_with("unable to open device /dev/video9: "));

        let e = Error::buffer_setup(
            "query",
            Some(3),
            io::Error::new(io::ErrorKind::Other, "boom"),
        );
        assert_eq!(e.to_string(), "unable to set up buffers (query, index 3): boom");

        let e = Error::buffer_setup("request", None, io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(e.to_string(), "unable to set up buffers (request): boom");
    }
}
