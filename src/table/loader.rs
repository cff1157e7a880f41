use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use log::debug;
use tempfile::NamedTempFile;

use crate::core::TabchatError;

use super::names::dedupe_names;
use super::sniff::{SAMPLE_BYTES, sniff_delimiter};
use super::xlsx;

const DEFAULT_DELIMITER: u8 = b',';
const BATCH_SIZE: usize = 8192;

/// Upload formats the loader knows how to read, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Delimited text, delimiter sniffed from the first bytes.
    Csv,
    /// Delimited text, always read with a comma.
    Txt,
    Xlsx,
}

impl FileKind {
    /// Case-insensitive match on the text after the last `.` of a filename.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileKind::Csv),
            "txt" => Some(FileKind::Txt),
            "xlsx" => Some(FileKind::Xlsx),
            _ => None,
        }
    }
}

/// Spool an upload to a temporary file and parse it into a table.
///
/// The temporary file is removed when this returns, whether parsing
/// succeeded or not.
pub fn load_upload(kind: FileKind, bytes: &[u8]) -> Result<RecordBatch, TabchatError> {
    load_upload_in(&std::env::temp_dir(), kind, bytes)
}

/// Same as [`load_upload`], spooling into `dir`.
pub fn load_upload_in(
    dir: &Path,
    kind: FileKind,
    bytes: &[u8],
) -> Result<RecordBatch, TabchatError> {
    let mut spool = NamedTempFile::new_in(dir)?;
    spool.write_all(bytes)?;
    spool.flush()?;
    debug!(path:? = spool.path(), size = bytes.len(); "spooled upload");

    load_path(spool.path(), kind)
}

pub fn load_path(path: &Path, kind: FileKind) -> Result<RecordBatch, TabchatError> {
    match kind {
        FileKind::Csv => {
            let delimiter = sniff_delimiter(&read_sample(path)?)?;
            debug!(delimiter:? = delimiter as char; "sniffed delimiter");
            read_delimited(path, delimiter)
        }
        FileKind::Txt => read_delimited(path, DEFAULT_DELIMITER),
        FileKind::Xlsx => xlsx::read_first_sheet(path),
    }
}

fn read_sample(path: &Path) -> Result<Vec<u8>, TabchatError> {
    let mut sample = Vec::with_capacity(SAMPLE_BYTES);
    File::open(path)?
        .take(SAMPLE_BYTES as u64)
        .read_to_end(&mut sample)?;
    Ok(sample)
}

/// Read delimited text with a header row, inferring one type per column.
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<RecordBatch, TabchatError> {
    let format = Format::default()
        .with_header(true)
        .with_delimiter(delimiter);

    let (schema, _) = format.infer_schema(File::open(path)?, None)?;
    if schema.fields().is_empty() {
        return Err(TabchatError::ParseError(
            "No columns to parse from file".to_string(),
        ));
    }
    let names = dedupe_names(schema.fields().iter().map(|f| f.name().clone()));
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .zip(names)
        .map(|(field, name)| field.as_ref().clone().with_name(name))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(BATCH_SIZE)
        .build(File::open(path)?)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    Ok(concat_batches(&schema, &batches)?)
}
