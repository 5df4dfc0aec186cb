//! Decoder and encoder configuration.
//!
//! # Example
//!
//! ```
//! use hydromesh_io::{ByteOrder, TextMeshConfig, TinConfig};
//!
//! let tin = TinConfig::default().with_byte_order(ByteOrder::Little);
//! assert_eq!(tin.byte_order, ByteOrder::Little);
//!
//! let text = TextMeshConfig::default().with_coordinate_precision(3);
//! assert_eq!(text.coordinate_precision, 3);
//! ```

use std::io::{self, Read};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Byte order of multi-byte values in a binary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ByteOrder {
    /// Most significant byte first.
    #[default]
    Big,
    /// Least significant byte first.
    Little,
    /// Whatever the host uses, resolved at runtime.
    Native,
}

impl ByteOrder {
    /// Byte order of the running host.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// Resolve [`ByteOrder::Native`] to a concrete order.
    #[must_use]
    pub const fn resolve(self) -> Self {
        match self {
            Self::Native => Self::native(),
            other => other,
        }
    }

    /// Read a 4-byte signed integer.
    ///
    /// Returns `None` when the reader ends before a full value was read.
    pub fn read_i32<R: Read>(self, reader: &mut R) -> io::Result<Option<i32>> {
        let value = match self.resolve() {
            Self::Little => reader.read_i32::<LittleEndian>(),
            _ => reader.read_i32::<BigEndian>(),
        };
        eof_as_none(value)
    }

    /// Read a 4-byte unsigned integer.
    pub fn read_u32<R: Read>(self, reader: &mut R) -> io::Result<Option<u32>> {
        let value = match self.resolve() {
            Self::Little => reader.read_u32::<LittleEndian>(),
            _ => reader.read_u32::<BigEndian>(),
        };
        eof_as_none(value)
    }

    /// Read a 4-byte float.
    pub fn read_f32<R: Read>(self, reader: &mut R) -> io::Result<Option<f32>> {
        let value = match self.resolve() {
            Self::Little => reader.read_f32::<LittleEndian>(),
            _ => reader.read_f32::<BigEndian>(),
        };
        eof_as_none(value)
    }

    /// Read an 8-byte float.
    pub fn read_f64<R: Read>(self, reader: &mut R) -> io::Result<Option<f64>> {
        let value = match self.resolve() {
            Self::Little => reader.read_f64::<LittleEndian>(),
            _ => reader.read_f64::<BigEndian>(),
        };
        eof_as_none(value)
    }
}

fn eof_as_none<T>(value: io::Result<T>) -> io::Result<Option<T>> {
    match value {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

/// Configuration of the binary TIN decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TinConfig {
    /// Byte order of vertex, face and count values.
    ///
    /// Mask metadata is always big-endian regardless of this setting.
    pub byte_order: ByteOrder,
}

impl Default for TinConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Big,
        }
    }
}

impl TinConfig {
    /// Override the byte order of the data files.
    #[must_use]
    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }
}

/// Configuration of the line-oriented text mesh encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextMeshConfig {
    /// Digits after the decimal point for projected X/Y coordinates.
    ///
    /// Coordinates with magnitude up to 180 look geographic and get six more
    /// digits.
    pub coordinate_precision: usize,
    /// Digits after the decimal point for Z values.
    pub elevation_precision: usize,
}

impl Default for TextMeshConfig {
    fn default() -> Self {
        Self {
            coordinate_precision: 2,
            elevation_precision: 6,
        }
    }
}

impl TextMeshConfig {
    /// Set the X/Y precision.
    #[must_use]
    pub const fn with_coordinate_precision(mut self, digits: usize) -> Self {
        self.coordinate_precision = digits;
        self
    }

    /// Set the Z precision.
    #[must_use]
    pub const fn with_elevation_precision(mut self, digits: usize) -> Self {
        self.elevation_precision = digits;
        self
    }
}
