//! File I/O, validation, and serialization for the sbd pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::ExperimentName;
pub use error::IoError;
pub use reader::MatrixReader;
pub use writer::ResultWriter;
