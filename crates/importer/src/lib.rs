pub mod error;
pub mod format;
pub mod pipeline;
pub mod sinks;
pub mod traits;

pub use error::{ImporterError, Result};
pub use pipeline::{ImportOutcome, import_file, load_file};
pub use sinks::{DryRunSink, PostgresSink};
pub use traits::RecordSink;
