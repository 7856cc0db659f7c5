//! Kernel argument values and batches.
//!
//! An [`ExecBatch`] is what a kernel test feeds into the kernel under test:
//! one [`ExecValue`] per argument plus the logical row count. Scalar values
//! are conceptually broadcast to every row and carry no length of their own.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Datum, RecordBatch, RecordBatchOptions, UInt32Array};
use arrow::compute::take;
use arrow::datatypes::{DataType, Field, Schema};

use crate::error::{FixtureError, Result};

/// A kernel argument or result: a full column or a single broadcast value.
#[derive(Debug, Clone)]
pub enum ExecValue {
    /// A column whose length equals the owning batch's row count.
    Array(ArrayRef),
    /// A single value stored as a length-1 array. Slot 0 carries the validity.
    Scalar(ArrayRef),
}

impl ExecValue {
    /// Logical type of the value.
    #[must_use]
    pub fn data_type(&self) -> &DataType {
        self.as_array().data_type()
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Backing storage: the column itself, or the length-1 array of a scalar.
    #[must_use]
    pub fn as_array(&self) -> &ArrayRef {
        match self {
            Self::Array(array) | Self::Scalar(array) => array,
        }
    }

    /// Validity of a scalar value, `None` for arrays.
    #[must_use]
    pub fn scalar_is_valid(&self) -> Option<bool> {
        match self {
            Self::Array(_) => None,
            Self::Scalar(array) => Some(array.len() == 1 && slot_is_valid(array.as_ref(), 0)),
        }
    }

    /// Materialize as a column of `num_rows` rows, repeating a scalar as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_rows` does not fit the take index type or the
    /// scalar cannot be repeated.
    pub fn into_array(self, num_rows: usize) -> Result<ArrayRef> {
        match self {
            Self::Array(array) => Ok(array),
            Self::Scalar(array) => {
                let rows = u32::try_from(num_rows).map_err(|_| {
                    FixtureError::schema(format!("cannot broadcast scalar to {num_rows} rows"))
                })?;
                let indices = UInt32Array::from(vec![0u32; rows as usize]);
                Ok(take(array.as_ref(), &indices as &dyn Array, None)?)
            }
        }
    }
}

/// Logical validity, so `Null`-typed and dictionary slots count as absent.
pub(crate) fn slot_is_valid(array: &dyn Array, index: usize) -> bool {
    array
        .logical_nulls()
        .map_or(true, |nulls| nulls.is_valid(index))
}

impl From<ArrayRef> for ExecValue {
    fn from(array: ArrayRef) -> Self {
        Self::Array(array)
    }
}

impl Datum for ExecValue {
    fn get(&self) -> (&dyn Array, bool) {
        match self {
            Self::Array(array) => (array.as_ref(), false),
            Self::Scalar(array) => (array.as_ref(), true),
        }
    }
}

/// Ordered kernel arguments plus the logical row count.
#[derive(Debug, Clone)]
pub struct ExecBatch {
    pub values: Vec<ExecValue>,
    pub num_rows: usize,
}

impl ExecBatch {
    #[must_use]
    pub fn new(values: Vec<ExecValue>, num_rows: usize) -> Self {
        Self { values, num_rows }
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.values.len()
    }

    /// The `index`-th argument.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn column(&self, index: usize) -> &ExecValue {
        &self.values[index]
    }

    /// Wrap every column of a record batch as an array argument.
    #[must_use]
    pub fn from_record_batch(batch: &RecordBatch) -> Self {
        let values = batch
            .columns()
            .iter()
            .map(|column| ExecValue::Array(Arc::clone(column)))
            .collect();
        Self::new(values, batch.num_rows())
    }

    /// Materialize as a record batch with columns `c0..cN`, broadcasting scalars.
    ///
    /// # Errors
    ///
    /// Returns an error if a scalar cannot be broadcast or an array column's
    /// length disagrees with `num_rows`.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let mut fields = Vec::with_capacity(self.values.len());
        let mut columns = Vec::with_capacity(self.values.len());
        for (index, value) in self.values.iter().enumerate() {
            fields.push(Field::new(format!("c{index}"), value.data_type().clone(), true));
            columns.push(value.clone().into_array(self.num_rows)?);
        }
        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows));
        Ok(RecordBatch::try_new_with_options(
            Arc::new(Schema::new(fields)),
            columns,
            &options,
        )?)
    }
}
