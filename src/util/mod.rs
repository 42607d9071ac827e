/*!
Data structures shared by the compiler and the matcher.
*/

pub mod charset;
pub mod interval;
pub mod iteration;
#[cfg(feature = "perf-literal")]
pub mod prefilter;
pub mod primitives;
pub mod stream;
