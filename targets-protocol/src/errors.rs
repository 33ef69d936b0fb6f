use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("Malformed key {key:?}: expected {expected} segments, found {found}")]
    Malformed {
        key: String,
        expected: usize,
        found: usize,
    },
}
