//! Buffered serializer for the classical `DataOutput` / Modified UTF-8
//! big-endian wire format.
//!
//! A [`DataWriter`] stages primitive values in a fixed-capacity buffer and
//! drains it to a [`ByteSink`] only when the buffer runs out of room, so the
//! sink sees few, large writes. Strings are emitted as a `u16` length prefix
//! followed by Modified UTF-8 bytes, in one of two dialects selected at
//! construction (see [`UtfVariant`]), and [`DataWriter::write_interned_utf`]
//! compresses repeated strings into two-byte references.
//!
//! # Examples
//!
//! ```rust
//! use datamodem::DataWriter;
//!
//! let mut out = Vec::new();
//! let mut writer = DataWriter::using_3byte_sequences(&mut out);
//! writer.write_i32(0x0102_0304)?;
//! writer.write_utf("hé")?;
//! writer.flush()?;
//! writer.release();
//! assert_eq!(out, [0x01, 0x02, 0x03, 0x04, 0x00, 0x03, 0x68, 0xC3, 0xA9]);
//! # Ok::<(), datamodem::WriteError<core::convert::Infallible>>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod intern;
mod mutf8;
mod options;
mod pool;
mod sink;
mod writer;

pub use error::WriteError;
pub use options::{DEFAULT_BUFFER_CAPACITY, UtfVariant, WriterOptions};
pub use sink::ByteSink;
#[cfg(feature = "std")]
pub use sink::IoSink;
pub use writer::DataWriter;
