//! CSV import pipeline

pub mod dispatcher;
pub mod event;
pub mod file_parser;
pub mod mover;
pub mod parser;

pub use dispatcher::{DispatchSummary, RecordDispatcher};
pub use event::S3Event;
pub use file_parser::{ImportFileParser, ImportReport, ObjectReport};
pub use mover::{FileMover, MoveOutcome};
pub use parser::{CsvRecord, CsvRowParser};
