//! JSON payload to [`ExecBatch`] construction.
//!
//! Payload layout:
//!
//! - **Row list**: a top-level JSON array whose elements are rows, each a
//!   JSON array with one field per declared type. `[[1, "a"], [2, "b"]]`.
//! - **Bare scalar**: with exactly one declared type whose shape is
//!   [`ArgShape::Scalar`] or [`ArgShape::Any`], a top-level value that is not
//!   a JSON array is the single value itself. `true`, `"abc"`, `{"a": 1}`.
//!   `[true]` is a row list whose row is not an array and is rejected;
//!   list-typed scalars use the row-list form, `[[[1, 2]]]`.
//!
//! Shape resolution per column:
//!
//! | shape  | 0 rows      | 1 row  | > 1 rows | bare   |
//! |--------|-------------|--------|----------|--------|
//! | Any    | empty array | array  | array    | scalar |
//! | Array  | empty array | array  | array    | error  |
//! | Scalar | null scalar | scalar | error    | scalar |

use arrow::array::new_null_array;
use arrow::datatypes::DataType;
use serde_json::Value;

use crate::config::FixtureConfig;
use crate::decode::{describe, Decoder};
use crate::error::{FixtureError, Result};
use crate::shape::ArgShape;
use crate::value::{ExecBatch, ExecValue};

/// Build a batch where every column may be an array or a bare scalar.
///
/// # Errors
///
/// See [`BatchBuilder::build`].
pub fn exec_batch_from_json(types: &[DataType], json: &str) -> Result<ExecBatch> {
    BatchBuilder::default().build(types, None, json)
}

/// Build a batch with an explicit shape for every column.
///
/// # Errors
///
/// See [`BatchBuilder::build`].
pub fn exec_batch_from_json_with_shapes(
    types: &[DataType],
    shapes: &[ArgShape],
    json: &str,
) -> Result<ExecBatch> {
    BatchBuilder::default().build(types, Some(shapes), json)
}

/// Builds [`ExecBatch`] fixtures from JSON text.
#[derive(Debug, Clone, Default)]
pub struct BatchBuilder {
    config: FixtureConfig,
}

impl BatchBuilder {
    /// # Errors
    ///
    /// Returns [`FixtureError::Config`] if `config` does not validate.
    pub fn new(config: FixtureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Decode `json` into one column per entry of `types`.
    ///
    /// `shapes` defaults to [`ArgShape::Any`] for every column.
    ///
    /// # Errors
    ///
    /// - [`FixtureError::Parse`] for malformed JSON.
    /// - [`FixtureError::SchemaMismatch`] when the shape list, a row's field
    ///   count, or the payload layout disagrees with the declared types.
    /// - [`FixtureError::TypeCoercion`] when a literal does not fit its column type.
    /// - [`FixtureError::UnsupportedType`] for types without a JSON encoding.
    pub fn build(
        &self,
        types: &[DataType],
        shapes: Option<&[ArgShape]>,
        json: &str,
    ) -> Result<ExecBatch> {
        let shapes = resolve_shapes(types, shapes)?;
        let payload: Value = serde_json::from_str(json)?;
        let decoder = Decoder::new(self.config.max_nesting_depth);

        let batch = match &payload {
            Value::Array(rows) => from_rows(decoder, types, &shapes, rows)?,
            bare => self.bare_scalar(decoder, types, &shapes, bare)?,
        };

        tracing::debug!(
            columns = batch.num_columns(),
            rows = batch.num_rows,
            scalars = batch.values.iter().filter(|value| value.is_scalar()).count(),
            "Built exec batch from JSON"
        );
        Ok(batch)
    }

    fn bare_scalar(
        &self,
        decoder: Decoder,
        types: &[DataType],
        shapes: &[ArgShape],
        payload: &Value,
    ) -> Result<ExecBatch> {
        if !self.config.bare_scalars {
            return Err(FixtureError::schema(format!(
                "payload is a bare {}; bare scalars are disabled, wrap values in a list of rows",
                describe(payload)
            )));
        }
        match (types, shapes) {
            ([data_type], [ArgShape::Any | ArgShape::Scalar]) => {
                let array = decoder
                    .decode(data_type, &[payload])
                    .map_err(|e| e.for_column(0, data_type))?;
                Ok(ExecBatch::new(vec![ExecValue::Scalar(array)], 1))
            }
            ([_], [ArgShape::Array]) => Err(FixtureError::schema(format!(
                "column 0 is array-shaped but the payload is a bare {}, not a list of rows",
                describe(payload)
            ))),
            _ => Err(FixtureError::schema(format!(
                "a bare {} can only encode a single scalar column, {} types declared",
                describe(payload),
                types.len()
            ))),
        }
    }
}

fn resolve_shapes(types: &[DataType], shapes: Option<&[ArgShape]>) -> Result<Vec<ArgShape>> {
    match shapes {
        None => Ok(vec![ArgShape::Any; types.len()]),
        Some(shapes) if shapes.len() == types.len() => Ok(shapes.to_vec()),
        Some(shapes) => Err(FixtureError::schema(format!(
            "{} shapes given for {} types",
            shapes.len(),
            types.len()
        ))),
    }
}

fn from_rows(
    decoder: Decoder,
    types: &[DataType],
    shapes: &[ArgShape],
    rows: &[Value],
) -> Result<ExecBatch> {
    let width = types.len();
    let num_rows = rows.len();

    let mut columns: Vec<Vec<&Value>> = vec![Vec::with_capacity(num_rows); width];
    for (row_index, row) in rows.iter().enumerate() {
        let Value::Array(fields) = row else {
            return Err(FixtureError::schema(format!(
                "row {row_index} is a {}, expected an array of {width} fields",
                describe(row)
            )));
        };
        if fields.len() != width {
            return Err(FixtureError::schema(format!(
                "row {row_index} has {} fields, expected {width}",
                fields.len()
            )));
        }
        for (column, field) in columns.iter_mut().zip(fields) {
            column.push(field);
        }
    }

    let mut values = Vec::with_capacity(width);
    let typed_columns = types.iter().zip(shapes).zip(&columns);
    for (column, ((data_type, shape), slots)) in typed_columns.enumerate() {
        if *shape == ArgShape::Scalar && num_rows > 1 {
            return Err(FixtureError::schema(format!(
                "column {column} is scalar-shaped but the payload has {num_rows} rows"
            )));
        }
        let array = decoder
            .decode(data_type, slots)
            .map_err(|e| e.for_column(column, data_type))?;
        let value = match (shape, num_rows) {
            (ArgShape::Scalar, 0) => ExecValue::Scalar(new_null_array(data_type, 1)),
            (ArgShape::Scalar, _) => ExecValue::Scalar(array),
            (ArgShape::Any | ArgShape::Array, _) => ExecValue::Array(array),
        };
        values.push(value);
    }
    Ok(ExecBatch::new(values, num_rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, AsArray};
    use arrow::datatypes::Int32Type;

    #[test]
    fn row_list_becomes_arrays_by_default() {
        let batch = exec_batch_from_json(&[DataType::Int32], "[[1], [2]]").unwrap();
        assert_eq!(batch.num_rows, 2);
        assert!(batch.column(0).is_array());
        assert_eq!(batch.column(0).as_array().len(), 2);
    }

    #[test]
    fn single_row_any_stays_an_array() {
        let batch = exec_batch_from_json(&[DataType::Int32], "[[1]]").unwrap();
        assert!(batch.column(0).is_array());
    }

    #[test]
    fn bare_payload_with_any_is_a_scalar() {
        let batch = exec_batch_from_json(&[DataType::Utf8], r#""abc""#).unwrap();
        assert_eq!(batch.num_rows, 1);
        let value = batch.column(0);
        assert!(value.is_scalar());
        assert_eq!(value.as_array().as_string::<i32>().value(0), "abc");
    }

    #[test]
    fn zero_rows_with_scalar_shape_is_a_null_scalar() {
        let batch = exec_batch_from_json_with_shapes(
            &[DataType::Int32, DataType::Int32],
            &[ArgShape::Scalar, ArgShape::Any],
            "[]",
        )
        .unwrap();
        assert_eq!(batch.num_rows, 0);
        assert_eq!(batch.column(0).scalar_is_valid(), Some(false));
        assert!(batch.column(1).is_array());
        assert_eq!(batch.column(1).as_array().len(), 0);
    }

    #[test]
    fn shape_list_length_must_match() {
        let err = exec_batch_from_json_with_shapes(
            &[DataType::Int32, DataType::Int32],
            &[ArgShape::Any],
            "[]",
        )
        .unwrap_err();
        assert!(err.to_string().contains("1 shapes given for 2 types"), "got: {err}");
    }

    #[test]
    fn bare_payload_with_several_types_is_rejected() {
        let err = exec_batch_from_json(&[DataType::Int32, DataType::Int32], "1").unwrap_err();
        assert!(matches!(err, FixtureError::SchemaMismatch { .. }), "got: {err}");
    }

    #[test]
    fn disabled_bare_scalars_reject_bare_payloads() {
        let config = FixtureConfig {
            bare_scalars: false,
            ..FixtureConfig::default()
        };
        let builder = BatchBuilder::new(config).unwrap();
        let err = builder.build(&[DataType::Boolean], None, "true").unwrap_err();
        assert!(err.to_string().contains("disabled"), "got: {err}");
        let batch = builder.build(&[DataType::Boolean], None, "[[true]]").unwrap();
        assert_eq!(batch.num_rows, 1);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let config = FixtureConfig {
            max_nesting_depth: 0,
            ..FixtureConfig::default()
        };
        assert!(BatchBuilder::new(config).is_err());
    }

    #[test]
    fn coercion_errors_name_row_and_column() {
        let err = exec_batch_from_json(
            &[DataType::Utf8, DataType::Int32],
            r#"[["a", 1], ["b", "two"]]"#,
        )
        .unwrap_err();
        match err {
            FixtureError::TypeCoercion {
                row,
                column,
                data_type,
                ..
            } => {
                assert_eq!((row, column), (1, 1));
                assert_eq!(data_type, DataType::Int32);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scalar_value_comes_from_the_only_row() {
        let batch = exec_batch_from_json_with_shapes(
            &[DataType::Int32, DataType::Int32],
            &[ArgShape::Array, ArgShape::Scalar],
            "[[1, 10]]",
        )
        .unwrap();
        let scalar = batch.column(1).as_array().as_primitive::<Int32Type>();
        assert_eq!(scalar.len(), 1);
        assert_eq!(scalar.value(0), 10);
    }
}
