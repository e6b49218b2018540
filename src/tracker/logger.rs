use std::sync::LazyLock;

use crate::logger::Logger;
use crate::tracker::constants::TAG;

pub static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new(TAG));
