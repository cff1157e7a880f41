//! Tabular loading: upload bytes in, Arrow record batch out.

mod convert;
mod loader;
mod names;
mod sniff;
mod xlsx;

pub use convert::to_records;
pub use loader::{FileKind, load_path, load_upload, load_upload_in, read_delimited};
pub use names::dedupe_names;
pub use sniff::{SAMPLE_BYTES, sniff_delimiter};
pub use xlsx::{range_to_batch, read_first_sheet};
