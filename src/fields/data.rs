//! Typed source containers for one field's data.

use eyre::{bail, Result};

/// Read-only typed container holding one column's data, as delivered by the
/// segment's wire format.
///
/// Sub-32-bit integer columns (`Int8`, `Int16`) arrive widened in the `Int`
/// variant; the layout dispatch narrows them at fill/write time. The crate
/// only reads from this container, never mutates or retains it beyond the
/// call.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    Bool(Vec<bool>),
    /// Wire representation for Int8, Int16 and Int32 columns.
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    String(Vec<String>),
    /// Flat row-major values, `dim` floats per row.
    FloatVector(Vec<f32>),
    /// Packed bits, `dim / 8` bytes per row.
    BinaryVector(Vec<u8>),
}

impl FieldData {
    pub fn bools(&self) -> Result<&[bool]> {
        match self {
            FieldData::Bool(values) => Ok(values),
            other => bail!("expected bool data, got {}", other.variant_name()),
        }
    }

    pub fn ints(&self) -> Result<&[i32]> {
        match self {
            FieldData::Int(values) => Ok(values),
            other => bail!("expected i32 data, got {}", other.variant_name()),
        }
    }

    pub fn longs(&self) -> Result<&[i64]> {
        match self {
            FieldData::Long(values) => Ok(values),
            other => bail!("expected i64 data, got {}", other.variant_name()),
        }
    }

    pub fn floats(&self) -> Result<&[f32]> {
        match self {
            FieldData::Float(values) => Ok(values),
            other => bail!("expected f32 data, got {}", other.variant_name()),
        }
    }

    pub fn doubles(&self) -> Result<&[f64]> {
        match self {
            FieldData::Double(values) => Ok(values),
            other => bail!("expected f64 data, got {}", other.variant_name()),
        }
    }

    pub fn strings(&self) -> Result<&[String]> {
        match self {
            FieldData::String(values) => Ok(values),
            other => bail!("expected string data, got {}", other.variant_name()),
        }
    }

    pub fn float_vector(&self) -> Result<&[f32]> {
        match self {
            FieldData::FloatVector(values) => Ok(values),
            other => bail!("expected float vector data, got {}", other.variant_name()),
        }
    }

    pub fn binary_vector(&self) -> Result<&[u8]> {
        match self {
            FieldData::BinaryVector(values) => Ok(values),
            other => bail!("expected binary vector data, got {}", other.variant_name()),
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            FieldData::Bool(_) => "bool",
            FieldData::Int(_) => "i32",
            FieldData::Long(_) => "i64",
            FieldData::Float(_) => "f32",
            FieldData::Double(_) => "f64",
            FieldData::String(_) => "string",
            FieldData::FloatVector(_) => "float vector",
            FieldData::BinaryVector(_) => "binary vector",
        }
    }
}
