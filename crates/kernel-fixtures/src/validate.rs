//! Structural validation of computed kernel outputs.
//!
//! Validation is read-only and never repairs a value. Arrays are checked in
//! full through [`ArrayData::validate_full`]: buffer extents against the
//! stated length, cached null counts against the validity bitmap, offsets
//! within value buffers, child lengths against the parent layout, UTF-8 and
//! dictionary keys. Scalars must hold exactly one slot; a null scalar's
//! payload is not inspected beyond its layout.

use arrow::array::{Array, ArrayData, RecordBatch};
use arrow::error::ArrowError;

use crate::error::{FixtureError, Result};
use crate::value::{slot_is_valid, ExecBatch, ExecValue};

/// Check that a kernel output is internally consistent.
///
/// # Errors
///
/// Returns [`FixtureError::Validation`] describing the first violated invariant.
pub fn validate_output(value: &ExecValue) -> Result<()> {
    let outcome = match value {
        ExecValue::Array(array) => validate_array(array.as_ref()),
        ExecValue::Scalar(array) => validate_scalar(array.as_ref()),
    };
    if let Err(err) = &outcome {
        tracing::debug!(
            data_type = %value.data_type(),
            scalar = value.is_scalar(),
            error = %err,
            "Output validation failed"
        );
    }
    outcome
}

/// Panicking form of [`validate_output`] for test bodies.
///
/// # Panics
///
/// Panics with the validation failure message.
#[track_caller]
pub fn assert_output_valid(value: &ExecValue) {
    if let Err(err) = validate_output(value) {
        panic!("{err}");
    }
}

/// Validate every column and check array lengths against the row count.
///
/// # Errors
///
/// Returns [`FixtureError::Validation`] naming the offending column.
pub fn validate_batch(batch: &ExecBatch) -> Result<()> {
    for (index, value) in batch.values.iter().enumerate() {
        if let ExecValue::Array(array) = value {
            if array.len() != batch.num_rows {
                return Err(FixtureError::validation(format!(
                    "column {index} has length {} but the batch has {} rows",
                    array.len(),
                    batch.num_rows
                )));
            }
        }
        validate_output(value).map_err(|err| match err {
            FixtureError::Validation { message } => {
                FixtureError::validation(format!("column {index}: {message}"))
            }
            other => other,
        })?;
    }
    Ok(())
}

/// Validate every column of a record batch.
///
/// # Errors
///
/// Returns [`FixtureError::Validation`] naming the offending column.
pub fn validate_record_batch(batch: &RecordBatch) -> Result<()> {
    validate_batch(&ExecBatch::from_record_batch(batch))
}

fn validate_array(array: &dyn Array) -> Result<()> {
    let data = array.to_data();
    data.validate_full().map_err(|e| invalid(&data, &e))
}

fn validate_scalar(array: &dyn Array) -> Result<()> {
    if array.len() != 1 {
        return Err(FixtureError::validation(format!(
            "{} scalar must hold exactly one slot, found {}",
            array.data_type(),
            array.len()
        )));
    }
    let data = array.to_data();
    data.validate().map_err(|e| invalid(&data, &e))?;
    if slot_is_valid(array, 0) {
        data.validate_full().map_err(|e| invalid(&data, &e))?;
    }
    Ok(())
}

fn invalid(data: &ArrayData, error: &ArrowError) -> FixtureError {
    FixtureError::validation(format!(
        "{} of length {}: {error}",
        data.data_type(),
        data.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::array::{make_array, ArrayDataBuilder, ArrayRef, Int32Array, StringArray};
    use arrow::buffer::{BooleanBuffer, Buffer, NullBuffer, ScalarBuffer};
    use arrow::datatypes::{DataType, Field};

    /// Offsets claim three one-byte strings but the values buffer holds two bytes.
    fn truncated_utf8() -> ArrayRef {
        let data = unsafe {
            ArrayDataBuilder::new(DataType::Utf8)
                .len(3)
                .add_buffer(Buffer::from_slice_ref([0i32, 1, 2, 3]))
                .add_buffer(Buffer::from_slice_ref(b"ab"))
                .build_unchecked()
        };
        make_array(data)
    }

    /// List offsets reach five child slots but the child holds three.
    fn overlong_list() -> ArrayRef {
        let child = Int32Array::from(vec![1, 2, 3]).into_data();
        let data = unsafe {
            ArrayDataBuilder::new(DataType::List(Arc::new(Field::new(
                "item",
                DataType::Int32,
                true,
            ))))
            .len(2)
            .add_buffer(Buffer::from_slice_ref([0i32, 2, 5]))
            .add_child_data(child)
            .build_unchecked()
        };
        make_array(data)
    }

    #[test]
    fn accepts_well_formed_values() {
        let array: ArrayRef = Arc::new(StringArray::from(vec![Some("a"), None]));
        assert!(validate_output(&ExecValue::Array(array)).is_ok());
        let scalar: ArrayRef = Arc::new(Int32Array::from(vec![None::<i32>]));
        assert!(validate_output(&ExecValue::Scalar(scalar)).is_ok());
    }

    #[test]
    fn rejects_offsets_past_value_buffer() {
        let err = validate_output(&ExecValue::Array(truncated_utf8())).unwrap_err();
        assert!(matches!(err, FixtureError::Validation { .. }), "got: {err}");
        assert!(err.to_string().contains("Utf8 of length 3"), "got: {err}");
    }

    #[test]
    fn rejects_list_child_shorter_than_offsets() {
        assert!(validate_output(&ExecValue::Array(overlong_list())).is_err());
    }

    #[test]
    fn rejects_scalar_with_several_slots() {
        let array: ArrayRef = Arc::new(Int32Array::from(vec![1, 2]));
        let err = validate_output(&ExecValue::Scalar(array)).unwrap_err();
        assert!(err.to_string().contains("exactly one slot"), "got: {err}");
    }

    #[test]
    fn rejects_stale_null_count() {
        // One unset bit, cached count of two.
        let validity = BooleanBuffer::from(vec![true, false, true]);
        let nulls = unsafe { NullBuffer::new_unchecked(validity, 2) };
        let array = Int32Array::new(ScalarBuffer::from(vec![1, 2, 3]), Some(nulls));
        let err = validate_output(&ExecValue::Array(Arc::new(array))).unwrap_err();
        assert!(err.to_string().contains("Int32 of length 3"), "got: {err}");
    }

    #[test]
    fn batch_rejects_column_length_mismatch() {
        let batch = ExecBatch::new(
            vec![ExecValue::Array(Arc::new(Int32Array::from(vec![1, 2])))],
            3,
        );
        let err = validate_batch(&batch).unwrap_err();
        assert!(err.to_string().contains("column 0 has length 2"), "got: {err}");
    }

    #[test]
    fn batch_prefixes_column_index() {
        let batch = ExecBatch::new(vec![ExecValue::Array(truncated_utf8())], 3);
        let err = validate_batch(&batch).unwrap_err();
        assert!(err.to_string().contains("column 0:"), "got: {err}");
    }

    #[test]
    #[should_panic(expected = "exactly one slot")]
    fn assert_form_panics() {
        let array: ArrayRef = Arc::new(Int32Array::from(Vec::<i32>::new()));
        assert_output_valid(&ExecValue::Scalar(array));
    }
}
