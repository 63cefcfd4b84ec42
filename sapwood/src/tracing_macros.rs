//! Terse wrappers over `tracing` so call sites can `use crate::{debug, trace};`.

macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

pub(crate) use {debug, trace};
