use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};
use std::time::Instant;

pub static LAST_LOG: LazyLock<Mutex<HashMap<String, Instant>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Returns true at most once per `seconds` for a given call site.
pub fn should_log(location: String, seconds: u64) -> bool {
    let mut last_log = LAST_LOG
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if last_log
        .get(&location)
        .map_or(true, |then| then.elapsed().as_secs() >= seconds)
    {
        last_log.insert(location, Instant::now());
        true
    } else {
        false
    }
}

#[macro_export]
macro_rules! info_every_seconds {
    ($seconds:expr, $($args:expr),+) => {
        if $crate::util::log::should_log($crate::util::assert::current_location!(), $seconds) {
            $crate::core::prelude::info!($($args),+);
        }
    }
}

#[macro_export]
macro_rules! warn_every_seconds {
    ($seconds:expr, $($args:expr),+) => {
        if $crate::util::log::should_log($crate::util::assert::current_location!(), $seconds) {
            $crate::core::prelude::warn!($($args),+);
        }
    }
}
