pub mod csv_table;
pub mod dataset;
pub mod error;
pub mod frame;

pub use csv_table::{CsvTable, read_csv_bytes, read_csv_table};
pub use dataset::{LabelledDataset, file_sha256, labelled_dataset_from_table, load_labelled_dataset};
pub use error::{IngestError, Result};
pub use frame::{any_to_f64, column_f64, find_column, parse_f64, single_row_frame, table_frame};
