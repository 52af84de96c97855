//! # Byte-Layout Dispatch
//!
//! The three layout operations every supported field type implements:
//!
//! - [`data_size`]: bytes needed to hold `row_count` rows of a column
//! - [`fill_field`]: copy those bytes into a writable memory region
//! - [`write_field`]: write those bytes to an open file
//!
//! All three dispatch over the same closed [`DataType`] set, so the
//! supported types are enumerable and adding one is a single localized
//! change here.
//!
//! ## Layout Rules
//!
//! - Fixed-width types are the raw native-endian bytes of the source array,
//!   `element_size * row_count` in total.
//! - `Int8` / `Int16` arrive widened as i32 and are narrowed element-wise
//!   into a scratch buffer first. Out-of-range values truncate by wrapping
//!   (`as` cast semantics, keeping the low-order bytes).
//! - `Varchar` is the concatenation of every string's raw bytes with no
//!   separators and no length prefixes. Row boundaries are not recoverable
//!   from the buffer; callers needing them must keep the length table
//!   separately.

use std::fs::File;
use std::io::Write;

use eyre::{ensure, Result};
use zerocopy::IntoBytes;

use crate::types::DataType;

use super::{FieldData, FieldMeta};

/// Computes the byte size of `row_count` rows of the described column.
///
/// Fixed-width columns are `element_size * row_count`; variable-width
/// columns are the sum of the element byte lengths in `data`, scanned in
/// source order. `row_count == 0` yields 0 for every type.
pub fn data_size(meta: &FieldMeta, row_count: usize, data: &FieldData) -> Result<usize> {
    if meta.is_variable() {
        let strings = data.strings()?;
        return Ok(strings.iter().map(|s| s.len()).sum());
    }

    Ok(meta.element_size() * row_count)
}

/// Copies exactly `size` bytes of column data into `dst`.
///
/// `dst` must be exactly `size` bytes; a source container whose byte length
/// differs from `size` is a fatal size mismatch.
pub fn fill_field(data_type: DataType, size: usize, data: &FieldData, dst: &mut [u8]) -> Result<()> {
    ensure!(
        dst.len() == size,
        "destination holds {} bytes but fill expects {}",
        dst.len(),
        size
    );

    match data_type {
        DataType::Bool => copy_exact(dst, data.bools()?.as_bytes(), size),
        DataType::Int8 => {
            let narrowed: Vec<i8> = data.ints()?.iter().map(|&v| v as i8).collect();
            copy_exact(dst, narrowed.as_bytes(), size)
        }
        DataType::Int16 => {
            let narrowed: Vec<i16> = data.ints()?.iter().map(|&v| v as i16).collect();
            copy_exact(dst, narrowed.as_bytes(), size)
        }
        DataType::Int32 => copy_exact(dst, data.ints()?.as_bytes(), size),
        DataType::Int64 => copy_exact(dst, data.longs()?.as_bytes(), size),
        DataType::Float32 => copy_exact(dst, data.floats()?.as_bytes(), size),
        DataType::Float64 => copy_exact(dst, data.doubles()?.as_bytes(), size),
        DataType::Varchar => {
            let strings = data.strings()?;
            let total: usize = strings.iter().map(|s| s.len()).sum();
            ensure!(
                total == size,
                "string data holds {} bytes but fill expects {}",
                total,
                size
            );

            let mut offset = 0;
            for s in strings {
                dst[offset..offset + s.len()].copy_from_slice(s.as_bytes());
                offset += s.len();
            }
            Ok(())
        }
        DataType::FloatVector => copy_exact(dst, data.float_vector()?.as_bytes(), size),
        DataType::BinaryVector => copy_exact(dst, data.binary_vector()?, size),
    }
}

/// Writes `size` bytes of column data to `file`, returning the total the
/// underlying write calls reported.
///
/// Fixed-width types issue one write call for the full size and return
/// whatever it reports, which may be short; the caller must check. Strings
/// are written element by element: if any single write comes up short, the
/// walk stops immediately and the total written before that element is
/// returned. Short writes are never retried or resumed.
pub fn write_field(
    file: &mut File,
    data_type: DataType,
    data: &FieldData,
    size: usize,
) -> Result<usize> {
    match data_type {
        DataType::Bool => write_once(file, data.bools()?.as_bytes(), size),
        DataType::Int8 => {
            let narrowed: Vec<i8> = data.ints()?.iter().map(|&v| v as i8).collect();
            write_once(file, narrowed.as_bytes(), size)
        }
        DataType::Int16 => {
            let narrowed: Vec<i16> = data.ints()?.iter().map(|&v| v as i16).collect();
            write_once(file, narrowed.as_bytes(), size)
        }
        DataType::Int32 => write_once(file, data.ints()?.as_bytes(), size),
        DataType::Int64 => write_once(file, data.longs()?.as_bytes(), size),
        DataType::Float32 => write_once(file, data.floats()?.as_bytes(), size),
        DataType::Float64 => write_once(file, data.doubles()?.as_bytes(), size),
        DataType::Varchar => {
            let mut total = 0usize;
            for s in data.strings()? {
                let written = file.write(s.as_bytes())?;
                if written < s.len() {
                    return Ok(total);
                }
                total += written;
            }
            Ok(total)
        }
        DataType::FloatVector => write_once(file, data.float_vector()?.as_bytes(), size),
        DataType::BinaryVector => write_once(file, data.binary_vector()?, size),
    }
}

fn copy_exact(dst: &mut [u8], src: &[u8], size: usize) -> Result<()> {
    ensure!(
        src.len() == size,
        "field data holds {} bytes but layout expects {}",
        src.len(),
        size
    );

    dst.copy_from_slice(src);
    Ok(())
}

fn write_once(file: &mut File, src: &[u8], size: usize) -> Result<usize> {
    ensure!(
        src.len() == size,
        "field data holds {} bytes but layout expects {}",
        src.len(),
        size
    );

    Ok(file.write(src)?)
}
