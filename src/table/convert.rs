use arrow::array::{Array, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use serde_json::{Map, Value};

use crate::core::TabchatError;

/// Row-major JSON view of a table: one object per row, keys in column order.
pub fn to_records(batch: &RecordBatch) -> Result<Vec<Map<String, Value>>, TabchatError> {
    let schema = batch.schema();
    let columns = batch
        .columns()
        .iter()
        .map(|col| array_to_json_values(col.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let records = (0..batch.num_rows())
        .map(|row| {
            schema
                .fields()
                .iter()
                .zip(&columns)
                .map(|(field, values)| (field.name().clone(), values[row].clone()))
                .collect()
        })
        .collect();
    Ok(records)
}

fn array_to_json_values(array: &dyn Array) -> Result<Vec<Value>, TabchatError> {
    let nulls = array.logical_nulls();
    let is_null = |i: usize| nulls.as_ref().is_some_and(|n| n.is_null(i));

    let values = if let Some(arr) = array.as_any().downcast_ref::<Int64Array>() {
        (0..arr.len())
            .map(|i| if is_null(i) { Value::Null } else { Value::from(arr.value(i)) })
            .collect()
    } else if let Some(arr) = array.as_any().downcast_ref::<Float64Array>() {
        (0..arr.len())
            .map(|i| if is_null(i) { Value::Null } else { Value::from(arr.value(i)) })
            .collect()
    } else if let Some(arr) = array.as_any().downcast_ref::<BooleanArray>() {
        (0..arr.len())
            .map(|i| if is_null(i) { Value::Null } else { Value::Bool(arr.value(i)) })
            .collect()
    } else if let Some(arr) = array.as_any().downcast_ref::<StringArray>() {
        (0..arr.len())
            .map(|i| {
                if is_null(i) {
                    Value::Null
                } else {
                    Value::String(arr.value(i).to_string())
                }
            })
            .collect()
    } else {
        // Dates, timestamps and anything else the CSV inference produces.
        let formatter = ArrayFormatter::try_new(array, &FormatOptions::default())?;
        (0..array.len())
            .map(|i| {
                if is_null(i) {
                    Value::Null
                } else {
                    Value::String(formatter.value(i).to_string())
                }
            })
            .collect()
    };
    Ok(values)
}
