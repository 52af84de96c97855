//! # Field Data Types
//!
//! This module provides the canonical `DataType` enum for segmap, the closed
//! set of field types a segment column can carry.
//!
//! ## Design Principles
//!
//! 1. **Single source of truth**: one closed enum; every layout operation
//!    (size, fill, write) dispatches over the same set, so adding or removing
//!    a type is a single localized change
//! 2. **Storage-efficient**: `#[repr(u8)]` for single-byte discriminant
//! 3. **Metadata-free**: vector dimension lives in `FieldMeta`, not the enum
//!
//! ## Type Categories
//!
//! | Category | Types | Per-Element Size |
//! |----------|-------|------------------|
//! | **Boolean** | Bool | 1 byte |
//! | **Integer** | Int8, Int16, Int32, Int64 | 1, 2, 4, 8 bytes |
//! | **Float** | Float32, Float64 | 4, 8 bytes |
//! | **Text** | Varchar | Variable |
//! | **Vector** | BinaryVector, FloatVector | Dimension-dependent |
//!
//! ## Discriminant Values
//!
//! Discriminants are grouped by category and match the wire values of the
//! segment format:
//! - 1-5: Bool and integers
//! - 10-11: Floats
//! - 21: Varchar
//! - 100-101: Vectors

use eyre::Result;

/// Closed enumeration of the field types a segment column can carry.
///
/// Uses `#[repr(u8)]` so the discriminant matches the single-byte wire
/// encoding. Vector dimension is stored in `FieldMeta`, not here.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool = 1,
    Int8 = 2,
    Int16 = 3,
    Int32 = 4,
    Int64 = 5,

    Float32 = 10,
    Float64 = 11,

    Varchar = 21,

    BinaryVector = 100,
    FloatVector = 101,
}

impl DataType {
    /// Returns the fixed per-element byte size for scalar types.
    ///
    /// Returns `None` for `Varchar` (per-row size differs) and for the vector
    /// types (per-row size depends on the dimension, carried by `FieldMeta`).
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            DataType::Bool => Some(1),
            DataType::Int8 => Some(1),
            DataType::Int16 => Some(2),
            DataType::Int32 => Some(4),
            DataType::Int64 => Some(8),
            DataType::Float32 => Some(4),
            DataType::Float64 => Some(8),
            DataType::Varchar | DataType::BinaryVector | DataType::FloatVector => None,
        }
    }

    /// Returns true if this type requires variable-width encoding.
    pub fn is_variable(&self) -> bool {
        matches!(self, DataType::Varchar)
    }

    /// Returns true if this is a vector type.
    pub fn is_vector(&self) -> bool {
        matches!(self, DataType::BinaryVector | DataType::FloatVector)
    }

    /// Returns true if this is a narrowed integer type, stored widened as
    /// i32 on the wire.
    pub fn is_narrowed_int(&self) -> bool {
        matches!(self, DataType::Int8 | DataType::Int16)
    }
}

impl TryFrom<u8> for DataType {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(DataType::Bool),
            2 => Ok(DataType::Int8),
            3 => Ok(DataType::Int16),
            4 => Ok(DataType::Int32),
            5 => Ok(DataType::Int64),
            10 => Ok(DataType::Float32),
            11 => Ok(DataType::Float64),
            21 => Ok(DataType::Varchar),
            100 => Ok(DataType::BinaryVector),
            101 => Ok(DataType::FloatVector),
            _ => eyre::bail!("invalid DataType discriminant: {}", value),
        }
    }
}
