use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid folder: {0}")]
    InvalidRoot(String),

    #[error("Invalid include pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidRoot(_) => "INVALID_ROOT",
            Error::Pattern { .. } => "INVALID_PATTERN",
            Error::Io(_) => "IO_ERROR",
            Error::Zip(_) => "ZIP_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(Error::InvalidRoot("x".into()).code(), "INVALID_ROOT");
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(io.code(), "IO_ERROR");
    }

    #[test]
    fn invalid_root_message_names_the_path() {
        let err = Error::InvalidRoot("/tmp/nope".into());
        assert_eq!(err.to_string(), "Invalid folder: /tmp/nope");
    }
}
