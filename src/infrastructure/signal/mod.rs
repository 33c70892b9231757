//! Signal file readers

mod csv_source;

pub use csv_source::CsvSignalSource;
