//! Lock poisoning helpers
//!
//! Convert poisoned `std::sync` locks into the caller's error type instead of
//! panicking. A poisoned lock means another thread panicked while holding it;
//! the data may be inconsistent, so callers get an error they can report.

use std::sync::{LockResult, RwLockReadGuard, RwLockWriteGuard};

fn poisoned(kind: &str, err: impl std::fmt::Debug) -> String {
    format!(
        "Internal synchronisation error ({} poisoned): a thread panicked while holding the lock. {:?}",
        kind, err
    )
}

/// Map a poisoned mutex lock into an application error
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use prioq::core::sync::handle_mutex_poison;
/// use prioq::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |message| QueueError::Internal { message })
///     .unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|err| error_constructor(poisoned("mutex", err)))
}

/// Map a poisoned RwLock read into an application error
pub fn handle_rwlock_read<T, E>(
    result: LockResult<RwLockReadGuard<T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockReadGuard<T>, E> {
    result.map_err(|err| error_constructor(poisoned("RwLock read", err)))
}

/// Map a poisoned RwLock write into an application error
pub fn handle_rwlock_write<T, E>(
    result: LockResult<RwLockWriteGuard<T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockWriteGuard<T>, E> {
    result.map_err(|err| error_constructor(poisoned("RwLock write", err)))
}
