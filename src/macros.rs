// Logging macros that forward to the 'log' crate when the 'logging' feature
// is enabled and compile down to nothing otherwise.

#[allow(unused_macros)]
macro_rules! log {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    }
}

#[allow(unused_macros)]
macro_rules! debug {
    ($($tt:tt)*) => { log!(log::debug!($($tt)*)) }
}

#[allow(unused_macros)]
macro_rules! trace {
    ($($tt:tt)*) => { log!(log::trace!($($tt)*)) }
}
