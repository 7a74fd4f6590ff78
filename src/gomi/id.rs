use std::sync::{LazyLock, Mutex};
use ulid::{Generator, Ulid};

static GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::new()));

/// Returns a new ULID string.
///
/// Ids from one process are strictly increasing, including ids generated in
/// the same millisecond from different threads, so lexical order is creation
/// order. On the (practically unreachable) monotonic overflow a fresh random
/// ULID is returned instead.
pub fn new_id() -> String {
    let mut generator = GENERATOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    generator
        .generate()
        .unwrap_or_else(|_| Ulid::new())
        .to_string()
}
