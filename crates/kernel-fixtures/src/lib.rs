//! JSON-driven Arrow fixtures for compute kernel tests.
//!
//! A kernel test declares its argument types, writes the argument rows as
//! JSON, runs the kernel and checks the result:
//!
//! ```
//! use arrow::compute::kernels::numeric::add;
//! use arrow::datatypes::DataType;
//! use kernel_fixtures::{
//!     assert_output_valid, exec_batch_from_json_with_shapes, ArgShape, ExecValue,
//! };
//!
//! let batch = exec_batch_from_json_with_shapes(
//!     &[DataType::Int32, DataType::Int32],
//!     &[ArgShape::Array, ArgShape::Scalar],
//!     "[[1, 10]]",
//! )
//! .unwrap();
//! let sum = add(batch.column(0), batch.column(1)).unwrap();
//! assert_output_valid(&ExecValue::Array(sum));
//! ```
//!
//! Literal encoding per type (`null` is always an absent slot):
//!
//! | type                              | literal                                       |
//! |-----------------------------------|-----------------------------------------------|
//! | Null                              | `null`                                        |
//! | Boolean                           | `true` / `false`, or `0` / `1`                |
//! | integers                          | JSON integer within range                     |
//! | Float32 / Float64                 | number, `"NaN"`, `"Infinity"`, `"-Infinity"`  |
//! | Utf8 / Binary (all widths, views) | string                                        |
//! | FixedSizeBinary(n)                | string of exactly n bytes                     |
//! | Decimal128(p, s)                  | string or number, exact at scale `s`          |
//! | Date32 / Date64                   | storage integer or `"YYYY-MM-DD"`             |
//! | Time32 / Time64                   | storage integer or `"HH:MM:SS[.f]"`           |
//! | Timestamp                         | storage integer or ISO-8601 / RFC 3339 string |
//! | Duration                          | storage integer                               |
//! | List / LargeList / FixedSizeList  | array of child literals                       |
//! | Struct                            | object keyed by field name, or positional array |
//! | Map                               | array of `[key, value]` pairs                 |
//! | Dictionary                        | literal of the value type                     |
//!
//! See [`builder`] for the row-list and bare-scalar payload layouts.

pub mod builder;
pub mod config;
pub mod decode;
pub mod error;
pub mod shape;
mod temporal;
pub mod validate;
pub mod value;

pub use builder::{exec_batch_from_json, exec_batch_from_json_with_shapes, BatchBuilder};
pub use config::FixtureConfig;
pub use decode::{array_from_json, scalar_from_json};
pub use error::{FixtureError, Result};
pub use shape::ArgShape;
pub use validate::{assert_output_valid, validate_batch, validate_output, validate_record_batch};
pub use value::{ExecBatch, ExecValue};
