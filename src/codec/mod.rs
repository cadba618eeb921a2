pub mod race_time;

pub use race_time::{format_time, parse_time, TimeParseError, TimeValue};
