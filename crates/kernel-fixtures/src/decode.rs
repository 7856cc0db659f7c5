//! Type-directed decoding of JSON literals into Arrow arrays.
//!
//! Every supported [`DataType`] owns one literal rule (see the crate docs
//! for the table). `null` always decodes to an absent slot. Nested types
//! recurse: lists are JSON arrays, structs are JSON objects keyed by field
//! name (or positional arrays), maps are arrays of `[key, value]` pairs.

use std::str::FromStr;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BinaryArray, BinaryViewArray, BooleanArray, FixedSizeBinaryArray,
    FixedSizeListArray, GenericListArray, LargeBinaryArray, LargeStringArray, MapArray, NullArray,
    OffsetSizeTrait, PrimitiveArray, StringArray, StringViewArray, StructArray,
};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::compute::cast;
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Date32Type, Date64Type, Decimal128Type, DurationMicrosecondType,
    DurationMillisecondType, DurationNanosecondType, DurationSecondType, Field, FieldRef, Fields,
    Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, Time32MillisecondType,
    Time32SecondType, Time64MicrosecondType, Time64NanosecondType, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::error::ArrowError;
use bigdecimal::{BigDecimal, ToPrimitive};
use serde_json::{Number, Value};

use crate::error::{FixtureError, Result};
use crate::temporal;
use crate::value::ExecValue;

static JSON_NULL: Value = Value::Null;

const DECIMAL128_MAX_PRECISION: u8 = 38;

/// Decode a JSON array of literals into one column of `data_type`.
///
/// Errors name the offending element as the row, with column 0.
///
/// # Errors
///
/// Returns [`FixtureError::Parse`] for malformed JSON,
/// [`FixtureError::SchemaMismatch`] when the payload is not a JSON array,
/// and [`FixtureError::TypeCoercion`] for literals outside the type's domain.
pub fn array_from_json(data_type: &DataType, json: &str) -> Result<ArrayRef> {
    let payload: Value = serde_json::from_str(json)?;
    let Value::Array(items) = &payload else {
        return Err(FixtureError::schema(format!(
            "expected a JSON array of {data_type} literals, got {}",
            describe(&payload)
        )));
    };
    let slots: Vec<&Value> = items.iter().collect();
    array_from_values(data_type, &slots)
}

/// Decode already-parsed JSON literals into one column of `data_type`.
///
/// # Errors
///
/// Same as [`array_from_json`], minus parse failures.
pub fn array_from_values(data_type: &DataType, values: &[&Value]) -> Result<ArrayRef> {
    Decoder::default()
        .decode(data_type, values)
        .map_err(|e| e.for_column(0, data_type))
}

/// Decode a single JSON literal into a scalar of `data_type`.
///
/// # Errors
///
/// Same as [`array_from_json`]; any JSON value is accepted at the top level.
pub fn scalar_from_json(data_type: &DataType, json: &str) -> Result<ExecValue> {
    let payload: Value = serde_json::from_str(json)?;
    array_from_values(data_type, &[&payload]).map(ExecValue::Scalar)
}

/// Decoding failure, positioned relative to the slice being decoded.
#[derive(Debug)]
pub(crate) enum DecodeError {
    /// Slot `index` cannot be coerced into the target type.
    Coercion {
        index: usize,
        detail: String,
    },
    Unsupported(DataType),
    TooDeep { limit: usize },
    /// Arrow rejected the assembled array or a dictionary cast.
    Arrow(ArrowError),
}

impl DecodeError {
    fn coercion(index: usize, detail: impl Into<String>) -> Self {
        Self::Coercion {
            index,
            detail: detail.into(),
        }
    }

    /// Re-anchor a child failure on its parent slot, prefixing the nested position.
    fn within(self, locate: impl FnOnce(usize) -> (usize, String)) -> Self {
        match self {
            Self::Coercion { index, detail } => {
                let (parent, label) = locate(index);
                Self::Coercion {
                    index: parent,
                    detail: format!("{label}: {detail}"),
                }
            }
            other => other,
        }
    }

    /// Attach column context. Slot indices are rows at the top level.
    pub(crate) fn for_column(self, column: usize, data_type: &DataType) -> FixtureError {
        match self {
            Self::Coercion { index, detail } => FixtureError::TypeCoercion {
                row: index,
                column,
                data_type: data_type.clone(),
                detail,
            },
            Self::Unsupported(inner) if &inner == data_type => FixtureError::UnsupportedType {
                column,
                data_type: inner,
            },
            Self::Unsupported(inner) => FixtureError::schema(format!(
                "column {column} ({data_type}): nested type {inner} has no JSON encoding"
            )),
            Self::TooDeep { limit } => FixtureError::schema(format!(
                "column {column} ({data_type}): nesting deeper than {limit} levels"
            )),
            Self::Arrow(e) => FixtureError::schema(format!("column {column} ({data_type}): {e}")),
        }
    }
}

type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Recursive decoder with a bound on type nesting.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Decoder {
    max_depth: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(crate::FixtureConfig::default().max_nesting_depth)
    }
}

impl Decoder {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub(crate) fn decode(&self, data_type: &DataType, values: &[&Value]) -> DecodeResult<ArrayRef> {
        self.decode_at(data_type, values, 0)
    }

    fn decode_at(
        &self,
        data_type: &DataType,
        values: &[&Value],
        depth: usize,
    ) -> DecodeResult<ArrayRef> {
        if depth > self.max_depth {
            return Err(DecodeError::TooDeep {
                limit: self.max_depth,
            });
        }
        match data_type {
            DataType::Null => nulls_only(values),
            DataType::Boolean => booleans(values),
            DataType::Int8 => primitive::<Int8Type>(data_type, values, integer),
            DataType::Int16 => primitive::<Int16Type>(data_type, values, integer),
            DataType::Int32 => primitive::<Int32Type>(data_type, values, integer),
            DataType::Int64 => primitive::<Int64Type>(data_type, values, integer),
            DataType::UInt8 => primitive::<UInt8Type>(data_type, values, integer),
            DataType::UInt16 => primitive::<UInt16Type>(data_type, values, integer),
            DataType::UInt32 => primitive::<UInt32Type>(data_type, values, integer),
            DataType::UInt64 => primitive::<UInt64Type>(data_type, values, integer),
            DataType::Float32 => primitive::<Float32Type>(data_type, values, float32),
            DataType::Float64 => primitive::<Float64Type>(data_type, values, float64),
            DataType::Decimal128(precision, scale)
                if (1..=DECIMAL128_MAX_PRECISION).contains(precision) =>
            {
                primitive::<Decimal128Type>(data_type, values, |value| {
                    decimal128(value, *precision, *scale)
                })
            }
            DataType::Date32 => primitive::<Date32Type>(data_type, values, |value| {
                temporal_literal(value, temporal::date_to_days)
            }),
            DataType::Date64 => primitive::<Date64Type>(data_type, values, |value| {
                temporal_literal(value, temporal::date_to_millis)
            }),
            DataType::Time32(unit @ (TimeUnit::Second | TimeUnit::Millisecond)) => {
                let unit = *unit;
                let parse = move |value: &Value| {
                    temporal_literal(value, |text| {
                        let ticks = temporal::time_of_day(text, unit)?;
                        i32::try_from(ticks).map_err(|_| format!("{ticks} out of range"))
                    })
                };
                match unit {
                    TimeUnit::Second => primitive::<Time32SecondType>(data_type, values, parse),
                    _ => primitive::<Time32MillisecondType>(data_type, values, parse),
                }
            }
            DataType::Time64(unit @ (TimeUnit::Microsecond | TimeUnit::Nanosecond)) => {
                let unit = *unit;
                let parse = move |value: &Value| {
                    temporal_literal(value, |text| temporal::time_of_day(text, unit))
                };
                match unit {
                    TimeUnit::Microsecond => {
                        primitive::<Time64MicrosecondType>(data_type, values, parse)
                    }
                    _ => primitive::<Time64NanosecondType>(data_type, values, parse),
                }
            }
            DataType::Timestamp(unit, _) => {
                let unit = *unit;
                let parse = move |value: &Value| {
                    temporal_literal(value, |text| temporal::timestamp(text, unit))
                };
                match unit {
                    TimeUnit::Second => primitive::<TimestampSecondType>(data_type, values, parse),
                    TimeUnit::Millisecond => {
                        primitive::<TimestampMillisecondType>(data_type, values, parse)
                    }
                    TimeUnit::Microsecond => {
                        primitive::<TimestampMicrosecondType>(data_type, values, parse)
                    }
                    TimeUnit::Nanosecond => {
                        primitive::<TimestampNanosecondType>(data_type, values, parse)
                    }
                }
            }
            DataType::Duration(unit) => match unit {
                TimeUnit::Second => primitive::<DurationSecondType>(data_type, values, integer),
                TimeUnit::Millisecond => {
                    primitive::<DurationMillisecondType>(data_type, values, integer)
                }
                TimeUnit::Microsecond => {
                    primitive::<DurationMicrosecondType>(data_type, values, integer)
                }
                TimeUnit::Nanosecond => {
                    primitive::<DurationNanosecondType>(data_type, values, integer)
                }
            },
            DataType::Utf8 => Ok(Arc::new(StringArray::from_iter(strings(values)?))),
            DataType::LargeUtf8 => Ok(Arc::new(LargeStringArray::from_iter(strings(values)?))),
            DataType::Utf8View => Ok(Arc::new(StringViewArray::from_iter(strings(values)?))),
            DataType::Binary => Ok(Arc::new(BinaryArray::from_iter(strings(values)?))),
            DataType::LargeBinary => Ok(Arc::new(LargeBinaryArray::from_iter(strings(values)?))),
            DataType::BinaryView => Ok(Arc::new(BinaryViewArray::from_iter(strings(values)?))),
            DataType::FixedSizeBinary(width) => fixed_size_binary(values, *width),
            DataType::List(field) => self.list::<i32>(field, values, depth),
            DataType::LargeList(field) => self.list::<i64>(field, values, depth),
            DataType::FixedSizeList(field, size) => {
                self.fixed_size_list(data_type, field, *size, values, depth)
            }
            DataType::Struct(fields) if !fields.is_empty() => self.structs(fields, values, depth),
            DataType::Map(field, ordered) => self.map(data_type, field, *ordered, values, depth),
            DataType::Dictionary(_, value_type) => {
                let dictionary_values = self.decode_at(value_type, values, depth + 1)?;
                cast(&dictionary_values, data_type).map_err(DecodeError::Arrow)
            }
            _ => Err(DecodeError::Unsupported(data_type.clone())),
        }
    }

    fn list<O: OffsetSizeTrait>(
        &self,
        field: &FieldRef,
        values: &[&Value],
        depth: usize,
    ) -> DecodeResult<ArrayRef> {
        let mut lengths = Vec::with_capacity(values.len());
        let mut validity = Vec::with_capacity(values.len());
        let mut items: Vec<&Value> = Vec::new();
        let mut positions: Vec<(usize, usize)> = Vec::new();
        for (index, value) in values.iter().enumerate() {
            match value {
                Value::Null => {
                    lengths.push(0);
                    validity.push(false);
                }
                Value::Array(elements) => {
                    if let Some(position) = required_item_is_null(field, elements) {
                        return Err(DecodeError::coercion(
                            index,
                            format!("list item {position}: {}", null_in(field)),
                        ));
                    }
                    lengths.push(elements.len());
                    validity.push(true);
                    items.extend(elements.iter());
                    positions.extend((0..elements.len()).map(|position| (index, position)));
                }
                other => return Err(DecodeError::coercion(index, unexpected("array", other))),
            }
        }

        let child = self
            .decode_at(field.data_type(), &items, depth + 1)
            .map_err(|e| {
                e.within(|child| {
                    let (parent, position) = positions[child];
                    (parent, format!("list item {position}"))
                })
            })?;
        let array = GenericListArray::<O>::try_new(
            Arc::clone(field),
            OffsetBuffer::<O>::from_lengths(lengths),
            child,
            null_buffer(validity),
        )
        .map_err(DecodeError::Arrow)?;
        Ok(Arc::new(array))
    }

    fn fixed_size_list(
        &self,
        data_type: &DataType,
        field: &FieldRef,
        size: i32,
        values: &[&Value],
        depth: usize,
    ) -> DecodeResult<ArrayRef> {
        let Ok(width) = usize::try_from(size) else {
            return Err(DecodeError::Unsupported(data_type.clone()));
        };
        let mut validity = Vec::with_capacity(values.len());
        let mut items: Vec<&Value> = Vec::with_capacity(values.len() * width);
        for (index, value) in values.iter().enumerate() {
            match value {
                Value::Null => {
                    validity.push(false);
                    items.extend(std::iter::repeat(&JSON_NULL).take(width));
                }
                Value::Array(elements) if elements.len() == width => {
                    if let Some(position) = required_item_is_null(field, elements) {
                        return Err(DecodeError::coercion(
                            index,
                            format!("list item {position}: {}", null_in(field)),
                        ));
                    }
                    validity.push(true);
                    items.extend(elements.iter());
                }
                Value::Array(elements) => {
                    return Err(DecodeError::coercion(
                        index,
                        format!("expected {width} list items, got {}", elements.len()),
                    ));
                }
                other => return Err(DecodeError::coercion(index, unexpected("array", other))),
            }
        }

        let locate = |child: usize| (child / width, format!("list item {}", child % width));
        let child = self
            .decode_at(field.data_type(), &items, depth + 1)
            .map_err(|e| e.within(locate))?;
        let array =
            FixedSizeListArray::try_new(Arc::clone(field), size, child, null_buffer(validity))
                .map_err(DecodeError::Arrow)?;
        Ok(Arc::new(array))
    }

    fn structs(&self, fields: &Fields, values: &[&Value], depth: usize) -> DecodeResult<ArrayRef> {
        let mut columns: Vec<Vec<&Value>> = vec![Vec::with_capacity(values.len()); fields.len()];
        let mut validity = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            match value {
                Value::Null => {
                    validity.push(false);
                    for column in &mut columns {
                        column.push(&JSON_NULL);
                    }
                }
                Value::Object(members) => {
                    if let Some(unknown) = members.keys().find(|key| fields.find(key).is_none()) {
                        return Err(DecodeError::coercion(
                            index,
                            format!("unknown struct field \"{unknown}\""),
                        ));
                    }
                    validity.push(true);
                    for (column, field) in columns.iter_mut().zip(fields.iter()) {
                        let member = members.get(field.name()).unwrap_or(&JSON_NULL);
                        if member.is_null() && !field.is_nullable() {
                            return Err(DecodeError::coercion(index, null_in(field)));
                        }
                        column.push(member);
                    }
                }
                Value::Array(members) if members.len() == fields.len() => {
                    validity.push(true);
                    let slots = columns.iter_mut().zip(fields.iter()).zip(members);
                    for ((column, field), member) in slots {
                        if member.is_null() && !field.is_nullable() {
                            return Err(DecodeError::coercion(index, null_in(field)));
                        }
                        column.push(member);
                    }
                }
                Value::Array(members) => {
                    return Err(DecodeError::coercion(
                        index,
                        format!(
                            "expected {} positional struct fields, got {}",
                            fields.len(),
                            members.len()
                        ),
                    ));
                }
                other => return Err(DecodeError::coercion(index, unexpected("object", other))),
            }
        }

        let children = fields
            .iter()
            .zip(&columns)
            .map(|(field, column)| {
                self.decode_at(field.data_type(), column, depth + 1)
                    .map_err(|e| e.within(|index| (index, format!("field \"{}\"", field.name()))))
            })
            .collect::<DecodeResult<Vec<_>>>()?;
        let array = StructArray::try_new(fields.clone(), children, null_buffer(validity))
            .map_err(DecodeError::Arrow)?;
        Ok(Arc::new(array))
    }

    fn map(
        &self,
        data_type: &DataType,
        field: &FieldRef,
        ordered: bool,
        values: &[&Value],
        depth: usize,
    ) -> DecodeResult<ArrayRef> {
        let DataType::Struct(entry_fields) = field.data_type() else {
            return Err(DecodeError::Unsupported(data_type.clone()));
        };
        if entry_fields.len() != 2 {
            return Err(DecodeError::Unsupported(data_type.clone()));
        }

        let mut lengths = Vec::with_capacity(values.len());
        let mut validity = Vec::with_capacity(values.len());
        let mut keys: Vec<&Value> = Vec::new();
        let mut items: Vec<&Value> = Vec::new();
        let mut positions: Vec<(usize, usize)> = Vec::new();
        for (index, value) in values.iter().enumerate() {
            match value {
                Value::Null => {
                    lengths.push(0);
                    validity.push(false);
                }
                Value::Array(pairs) => {
                    for (position, pair) in pairs.iter().enumerate() {
                        let Value::Array(pair) = pair else {
                            return Err(DecodeError::coercion(
                                index,
                                format!("map entry {position}: expected [key, value] pair"),
                            ));
                        };
                        let [key, item] = pair.as_slice() else {
                            return Err(DecodeError::coercion(
                                index,
                                format!(
                                    "map entry {position}: expected 2 elements, got {}",
                                    pair.len()
                                ),
                            ));
                        };
                        for (entry_field, element) in entry_fields.iter().zip([key, item]) {
                            if element.is_null() && !entry_field.is_nullable() {
                                return Err(DecodeError::coercion(
                                    index,
                                    format!("map entry {position}: {}", null_in(entry_field)),
                                ));
                            }
                        }
                        keys.push(key);
                        items.push(item);
                        positions.push((index, position));
                    }
                    lengths.push(pairs.len());
                    validity.push(true);
                }
                other => return Err(DecodeError::coercion(index, unexpected("array", other))),
            }
        }

        let positions = &positions;
        let locate = move |role: &'static str| {
            move |child: usize| {
                let (parent, position) = positions[child];
                (parent, format!("map {role} {position}"))
            }
        };
        let keys = self
            .decode_at(entry_fields[0].data_type(), &keys, depth + 1)
            .map_err(|e| e.within(locate("key")))?;
        let items = self
            .decode_at(entry_fields[1].data_type(), &items, depth + 1)
            .map_err(|e| e.within(locate("value")))?;
        let entries = StructArray::try_new(entry_fields.clone(), vec![keys, items], None)
            .map_err(DecodeError::Arrow)?;
        let array = MapArray::try_new(
            Arc::clone(field),
            OffsetBuffer::<i32>::from_lengths(lengths),
            entries,
            null_buffer(validity),
            ordered,
        )
        .map_err(DecodeError::Arrow)?;
        Ok(Arc::new(array))
    }
}

fn null_in(field: &Field) -> String {
    format!("null in non-nullable field \"{}\"", field.name())
}

/// Position of the first null element handed to a non-nullable list item field.
fn required_item_is_null(field: &Field, elements: &[Value]) -> Option<usize> {
    if field.is_nullable() {
        return None;
    }
    elements.iter().position(Value::is_null)
}

fn null_buffer(validity: Vec<bool>) -> Option<NullBuffer> {
    validity
        .iter()
        .any(|valid| !valid)
        .then(|| NullBuffer::from(validity))
}

fn primitive<T: ArrowPrimitiveType>(
    data_type: &DataType,
    values: &[&Value],
    decode: impl Fn(&Value) -> std::result::Result<T::Native, String>,
) -> DecodeResult<ArrayRef> {
    let mut slots = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        if value.is_null() {
            slots.push(None);
            continue;
        }
        let native = decode(value).map_err(|detail| DecodeError::coercion(index, detail))?;
        slots.push(Some(native));
    }
    let array: PrimitiveArray<T> = slots.into_iter().collect();
    Ok(Arc::new(array.with_data_type(data_type.clone())))
}

fn nulls_only(values: &[&Value]) -> DecodeResult<ArrayRef> {
    if let Some(index) = values.iter().position(|value| !value.is_null()) {
        return Err(DecodeError::coercion(index, unexpected("null", values[index])));
    }
    Ok(Arc::new(NullArray::new(values.len())))
}

fn booleans(values: &[&Value]) -> DecodeResult<ArrayRef> {
    let array = values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Null => Ok(None),
            Value::Bool(flag) => Ok(Some(*flag)),
            Value::Number(number) if number.as_u64() == Some(0) => Ok(Some(false)),
            Value::Number(number) if number.as_u64() == Some(1) => Ok(Some(true)),
            other => Err(DecodeError::coercion(index, unexpected("boolean", other))),
        })
        .collect::<DecodeResult<BooleanArray>>()?;
    Ok(Arc::new(array))
}

fn strings<'a>(values: &[&'a Value]) -> DecodeResult<Vec<Option<&'a str>>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(text.as_str())),
            other => Err(DecodeError::coercion(index, unexpected("string", other))),
        })
        .collect()
}

fn fixed_size_binary(values: &[&Value], width: i32) -> DecodeResult<ArrayRef> {
    let slots = strings(values)?;
    let expected = usize::try_from(width).unwrap_or_default();
    if let Some((index, text)) = slots
        .iter()
        .enumerate()
        .find_map(|(index, slot)| slot.filter(|text| text.len() != expected).map(|t| (index, t)))
    {
        return Err(DecodeError::coercion(
            index,
            format!("expected {width} bytes, got {} in \"{text}\"", text.len()),
        ));
    }
    let array = FixedSizeBinaryArray::try_from_sparse_iter_with_size(
        slots.into_iter().map(|slot| slot.map(str::as_bytes)),
        width,
    )
    .map_err(DecodeError::Arrow)?;
    Ok(Arc::new(array))
}

fn json_integer(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

fn integer<N: TryFrom<i128>>(value: &Value) -> std::result::Result<N, String> {
    let Value::Number(number) = value else {
        return Err(unexpected("integer", value));
    };
    let Some(wide) = json_integer(number) else {
        return match number.as_f64() {
            Some(float) if float.fract() == 0.0 => Err(format!("{number} out of range")),
            _ => Err(format!("expected integer, got {number}")),
        };
    };
    N::try_from(wide).map_err(|_| format!("{wide} out of range"))
}

fn float64(value: &Value) -> std::result::Result<f64, String> {
    match value {
        Value::Number(number) => match json_integer(number) {
            Some(wide) => {
                let narrowed = wide as f64;
                let exact = narrowed as i128 == wide;
                if !exact {
                    return Err(format!("{wide} is not exactly representable as Float64"));
                }
                Ok(narrowed)
            }
            None => number
                .as_f64()
                .ok_or_else(|| format!("{number} is not a finite number")),
        },
        Value::String(text) => special_float(text),
        other => Err(unexpected("number", other)),
    }
}

fn float32(value: &Value) -> std::result::Result<f32, String> {
    if let Value::Number(number) = value {
        if let Some(wide) = json_integer(number) {
            let narrowed = wide as f32;
            let exact = narrowed as i128 == wide;
            if !exact {
                return Err(format!("{wide} is not exactly representable as Float32"));
            }
            return Ok(narrowed);
        }
    }
    let wide = float64(value)?;
    let narrowed = wide as f32;
    if narrowed.is_infinite() && wide.is_finite() {
        return Err(format!("{wide} overflows Float32"));
    }
    // Integral values must survive narrowing; fractional ones may round.
    if wide.is_finite() && wide.fract() == 0.0 && f64::from(narrowed) != wide {
        return Err(format!("{wide} is not exactly representable as Float32"));
    }
    Ok(narrowed)
}

fn special_float(text: &str) -> std::result::Result<f64, String> {
    match text {
        "NaN" => Ok(f64::NAN),
        "Inf" | "Infinity" => Ok(f64::INFINITY),
        "-Inf" | "-Infinity" => Ok(f64::NEG_INFINITY),
        _ => Err(format!(
            "expected number, got string \"{text}\" (only NaN, Infinity and -Infinity are accepted)"
        )),
    }
}

fn decimal128(value: &Value, precision: u8, scale: i8) -> std::result::Result<i128, String> {
    let literal = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        other => return Err(unexpected("decimal string or number", other)),
    };
    let decimal = BigDecimal::from_str(&literal)
        .map_err(|e| format!("invalid decimal \"{literal}\": {e}"))?;
    let rescaled = decimal.with_scale(i64::from(scale));
    if rescaled != decimal {
        return Err(format!("\"{literal}\" does not fit scale {scale} without losing digits"));
    }
    let (digits, _) = rescaled.into_bigint_and_exponent();
    let unscaled = digits
        .to_i128()
        .ok_or_else(|| format!("\"{literal}\" exceeds precision {precision}"))?;
    if unscaled.unsigned_abs() >= 10u128.pow(u32::from(precision)) {
        return Err(format!("\"{literal}\" exceeds precision {precision}"));
    }
    Ok(unscaled)
}

/// Integer storage value, or a string form converted by `parse`.
fn temporal_literal<N, F>(value: &Value, parse: F) -> std::result::Result<N, String>
where
    N: TryFrom<i128>,
    F: FnOnce(&str) -> std::result::Result<N, String>,
{
    match value {
        Value::String(text) => parse(text),
        _ => integer(value),
    }
}

/// Short description of a JSON value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => format!("boolean {flag}"),
        Value::Number(number) => format!("number {number}"),
        Value::String(text) => format!("string \"{text}\""),
        Value::Array(items) => format!("array of {} elements", items.len()),
        Value::Object(_) => "object".to_string(),
    }
}

fn unexpected(expected: &str, value: &Value) -> String {
    format!("expected {expected}, got {}", describe(value))
}
