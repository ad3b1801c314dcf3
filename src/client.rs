mod core;

pub use self::core::{Client, DEFAULT_BASE_URL};

/// Reports whether a required identifier carries a usable value.
pub(crate) fn valid_string(value: &str) -> bool {
    !value.is_empty()
}
