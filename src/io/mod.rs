pub mod csv;
pub mod json;

pub use self::csv::{series, write_samples, write_samples_file, Column};
pub use self::json::{write_summary, write_summary_file, FlightSummary};
