#![forbid(unsafe_code)]

pub mod import;
pub mod model;
pub mod time;

pub use time::Clock;
