//! Arrow IPC stream encoding for the cached table.

use std::io::Cursor;

use arrow::ipc::reader::StreamReader;
use arrow::ipc::writer::StreamWriter;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;

use crate::core::TabchatError;

pub fn encode(batch: &RecordBatch) -> Result<Bytes, TabchatError> {
    let mut buf = Vec::new();
    {
        let mut writer = StreamWriter::try_new(&mut buf, &batch.schema())
            .map_err(|e| TabchatError::CacheError(format!("encoding table: {e}")))?;
        writer
            .write(batch)
            .map_err(|e| TabchatError::CacheError(format!("encoding table: {e}")))?;
        writer
            .finish()
            .map_err(|e| TabchatError::CacheError(format!("encoding table: {e}")))?;
    }
    Ok(Bytes::from(buf))
}

pub fn decode(blob: &[u8]) -> Result<RecordBatch, TabchatError> {
    let mut reader = StreamReader::try_new(Cursor::new(blob), None)
        .map_err(|e| TabchatError::CacheError(format!("decoding cached table: {e}")))?;
    reader
        .next()
        .ok_or_else(|| TabchatError::CacheError("cached table stream is empty".to_string()))?
        .map_err(|e| TabchatError::CacheError(format!("decoding cached table: {e}")))
}
