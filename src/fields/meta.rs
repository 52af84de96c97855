//! Field descriptors: the immutable per-column layout metadata.

use eyre::{ensure, Result};

use crate::types::DataType;

/// Describes the on-the-wire layout of one segment column.
///
/// `element_size` is the per-row byte width for fixed-width types: derived
/// from the type for scalars, from the dimension for vectors. Variable-width
/// columns carry no meaningful element size; their total size is the sum of
/// the element byte lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    data_type: DataType,
    element_size: usize,
}

impl FieldMeta {
    /// Descriptor for a fixed-width scalar column.
    ///
    /// Fails for `Varchar` and the vector types, which need `varchar()` or
    /// the dimension-aware constructors instead.
    pub fn scalar(data_type: DataType) -> Result<Self> {
        let element_size = match data_type.fixed_size() {
            Some(size) => size,
            None => eyre::bail!(
                "{:?} is not a fixed-width scalar type; use the dedicated constructor",
                data_type
            ),
        };

        Ok(Self {
            data_type,
            element_size,
        })
    }

    /// Descriptor for a variable-width string column.
    pub fn varchar() -> Self {
        Self {
            data_type: DataType::Varchar,
            element_size: 0,
        }
    }

    /// Descriptor for a float-vector column of `dim` dimensions (4 bytes per
    /// dimension).
    pub fn float_vector(dim: usize) -> Result<Self> {
        ensure!(dim > 0, "vector dimension must be positive");

        Ok(Self {
            data_type: DataType::FloatVector,
            element_size: dim * 4,
        })
    }

    /// Descriptor for a binary-vector column of `dim` dimensions (one bit per
    /// dimension; `dim` must be a multiple of 8).
    pub fn binary_vector(dim: usize) -> Result<Self> {
        ensure!(dim > 0, "vector dimension must be positive");
        ensure!(
            dim % 8 == 0,
            "binary vector dimension {} is not a multiple of 8",
            dim
        );

        Ok(Self {
            data_type: DataType::BinaryVector,
            element_size: dim / 8,
        })
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Per-row byte width for fixed-width columns; 0 for variable-width.
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    pub fn is_variable(&self) -> bool {
        self.data_type.is_variable()
    }
}
