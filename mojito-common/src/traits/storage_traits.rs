// File: mojito-common/src/traits/storage_traits.rs

use crate::error::Error;

/// String-keyed durable storage that survives a restart.
///
/// The batch operations are atomic: after a failed `set_many` or
/// `remove_many` the store still holds exactly what it held before the call.
pub trait SessionStorage: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), Error>;

    fn remove_many(&self, keys: &[&str]) -> Result<(), Error>;
}
