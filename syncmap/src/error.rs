use std::time::Duration;

/// Errors returned by map operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The key was not present when the lookup or removal took place.
    #[error("the key doesn't exist")]
    UnknownKey,
    /// The lock could not be acquired within the given duration.
    ///
    /// Only the `try_*_for` methods return this.
    #[error("lock not acquired within {0:?}")]
    LockTimeout(Duration),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(Error::UnknownKey.to_string(), "the key doesn't exist");
        assert_eq!(
            Error::LockTimeout(Duration::from_millis(5)).to_string(),
            "lock not acquired within 5ms"
        );
    }
}
