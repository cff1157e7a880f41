use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, TimestampMillisecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use calamine::{Data, DataType as _, Range, Reader, Xlsx, open_workbook};

use crate::core::TabchatError;

use super::names::dedupe_names;

static EMPTY_CELL: Data = Data::Empty;

/// Largest magnitude at which every integer is exactly representable as f64.
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Read the first worksheet, taking its first row as column headers.
pub fn read_first_sheet(path: &Path) -> Result<RecordBatch, TabchatError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TabchatError::ParseError("workbook has no worksheets".to_string()))??;
    range_to_batch(&range)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CellKind {
    Empty,
    Int,
    Float,
    Bool,
    DateTime,
    Text,
}

impl CellKind {
    fn of(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellKind::Empty,
            Data::Int(_) => CellKind::Int,
            // Spreadsheets store every number as a double.
            Data::Float(v) if is_whole(*v) => CellKind::Int,
            Data::Float(_) => CellKind::Float,
            Data::Bool(_) => CellKind::Bool,
            Data::DateTime(dt) if dt.is_datetime() => CellKind::DateTime,
            Data::DateTimeIso(_) => CellKind::DateTime,
            _ => CellKind::Text,
        }
    }

    fn widen(self, other: CellKind) -> CellKind {
        use CellKind::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Empty, b) => b,
            (a, Empty) => a,
            (Int, Float) | (Float, Int) => Float,
            _ => Text,
        }
    }
}

fn is_whole(v: f64) -> bool {
    v.fract() == 0.0 && v.abs() <= MAX_EXACT_FLOAT_INT
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) if dt.is_datetime() => dt
            .as_datetime()
            .map_or_else(|| dt.to_string(), |d| d.to_string()),
        other => other.to_string(),
    }
}

pub fn range_to_batch(range: &Range<Data>) -> Result<RecordBatch, TabchatError> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| TabchatError::ParseError("No columns to parse from file".to_string()))?;
    let body: Vec<&[Data]> = rows.collect();

    let names = dedupe_names(header.iter().enumerate().map(|(i, title)| match title {
        Data::Empty => format!("Unnamed: {i}"),
        other => cell_text(other),
    }));

    let mut fields = Vec::with_capacity(header.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(header.len());

    for (i, name) in names.into_iter().enumerate() {
        let cells: Vec<&Data> = body
            .iter()
            .map(|row| row.get(i).unwrap_or(&EMPTY_CELL))
            .collect();
        let kind = cells
            .iter()
            .fold(CellKind::Empty, |acc, cell| acc.widen(CellKind::of(cell)));

        let (dtype, array) = build_column(kind, &cells);
        fields.push(Field::new(name, dtype, true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let options = RecordBatchOptions::new().with_row_count(Some(body.len()));
    Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
}

fn build_column(kind: CellKind, cells: &[&Data]) -> (DataType, ArrayRef) {
    match kind {
        CellKind::Int => {
            let arr: Int64Array = cells
                .iter()
                .map(|cell| match cell {
                    Data::Int(v) => Some(*v),
                    Data::Float(v) => Some(*v as i64),
                    _ => None,
                })
                .collect();
            (DataType::Int64, Arc::new(arr))
        }
        CellKind::Float => {
            let arr: Float64Array = cells
                .iter()
                .map(|cell| match cell {
                    Data::Int(v) => Some(*v as f64),
                    Data::Float(v) => Some(*v),
                    _ => None,
                })
                .collect();
            (DataType::Float64, Arc::new(arr))
        }
        CellKind::Bool => {
            let arr: BooleanArray = cells
                .iter()
                .map(|cell| match cell {
                    Data::Bool(v) => Some(*v),
                    _ => None,
                })
                .collect();
            (DataType::Boolean, Arc::new(arr))
        }
        CellKind::DateTime => {
            let arr: TimestampMillisecondArray = cells
                .iter()
                .map(|cell| cell.as_datetime().map(|dt| dt.and_utc().timestamp_millis()))
                .collect();
            (DataType::Timestamp(TimeUnit::Millisecond, None), Arc::new(arr))
        }
        CellKind::Text | CellKind::Empty => {
            let arr: StringArray = cells
                .iter()
                .map(|cell| match cell {
                    Data::Empty => None,
                    other => Some(cell_text(other)),
                })
                .collect();
            (DataType::Utf8, Arc::new(arr))
        }
    }
}
