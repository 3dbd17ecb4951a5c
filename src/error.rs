//! Crate-wide error type shared by every container.

use thiserror::Error;

/// Kind of failure, for callers that want to branch without matching fields.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    IndexOutOfBounds,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// A positional argument fell outside the range valid for the operation.
    /// Raised before any mutation, so the container is left unchanged.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

/// `Ok(())` when `index < len`.
#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::IndexOutOfBounds { index, len })
    }
}

/// `Ok(())` when `index <= len`; inserting at `len` appends.
#[inline]
pub(crate) fn check_position(index: usize, len: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(Error::IndexOutOfBounds { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_index_and_len() {
        let e = Error::IndexOutOfBounds { index: 7, len: 3 };
        assert_eq!(e.to_string(), "index 7 out of bounds for length 3");
        assert_eq!(e.kind(), ErrorKind::IndexOutOfBounds);
    }

    #[test]
    fn bounds_helpers() {
        assert!(check_index(0, 1).is_ok());
        assert!(check_index(1, 1).is_err());
        assert!(check_index(0, 0).is_err());
        assert!(check_position(1, 1).is_ok());
        assert!(check_position(0, 0).is_ok());
        assert_eq!(
            check_position(2, 1),
            Err(Error::IndexOutOfBounds { index: 2, len: 1 })
        );
    }
}
