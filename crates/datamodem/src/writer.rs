//! The buffered writer facade.
//!
//! [`DataWriter`] composes the staging buffer, the primitive encoders, the
//! Modified UTF-8 string writer and the intern table behind one type. Bytes
//! reach the sink in exact call order; staging changes when the sink is
//! touched, never what it sees.

use alloc::vec;
use alloc::vec::Vec;

use crate::{
    error::WriteError,
    intern::{InternTable, SENTINEL_REF},
    mutf8,
    options::{DEFAULT_BUFFER_CAPACITY, UtfVariant, WriterOptions},
    pool,
    sink::ByteSink,
};

/// Largest value of the `u16` string-length prefix, and the interning
/// sentinel.
const MAX_UNSIGNED_SHORT: usize = 65_535;

/// Buffered serializer emitting the big-endian `DataOutput` wire format.
///
/// Primitive values are staged in a fixed-capacity buffer and drained to
/// the [`ByteSink`] only when room runs out, on [`flush`](Self::flush), or
/// when an opaque range at least as large as the buffer bypasses staging
/// entirely. A writer is not safe for concurrent use; callers serialize
/// access.
///
/// # Examples
///
/// ```rust
/// use datamodem::DataWriter;
///
/// let mut out = Vec::new();
/// let mut writer = DataWriter::using_4byte_sequences(&mut out);
/// writer.write_interned_utf("unit")?;
/// writer.write_interned_utf("unit")?;
/// writer.flush()?;
/// writer.release();
/// // Sentinel + literal the first time, a two-byte reference after.
/// assert_eq!(out, [0xFF, 0xFF, 0x00, 0x04, b'u', b'n', b'i', b't', 0x00, 0x00]);
/// # Ok::<(), datamodem::WriteError<core::convert::Infallible>>(())
/// ```
#[derive(Debug)]
pub struct DataWriter<S: ByteSink> {
    sink: S,
    /// Staging buffer; `[0, pos)` is pending output.
    buf: Vec<u8>,
    pos: usize,
    variant: UtfVariant,
    refs: InternTable,
}

// ------------------------------------------------------------------------------------------------
// Lifecycle
// ------------------------------------------------------------------------------------------------

impl<S: ByteSink> DataWriter<S> {
    /// Create a writer bound to `sink`.
    ///
    /// # Panics
    ///
    /// Panics when `options.buffer_capacity` is below 8, the width of the
    /// largest primitive.
    #[must_use]
    pub fn new(sink: S, options: WriterOptions) -> Self {
        assert!(
            options.buffer_capacity >= 8,
            "staging capacity must be at least 8 bytes"
        );
        Self {
            sink,
            buf: vec![0; options.buffer_capacity],
            pos: 0,
            variant: options.utf_variant,
            refs: InternTable::new(),
        }
    }

    /// Writer with the default capacity and the 3-byte dialect — the form
    /// the `DataOutput` contract mandates.
    #[must_use]
    pub fn using_3byte_sequences(sink: S) -> Self {
        Self::new(sink, WriterOptions {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            utf_variant: UtfVariant::ThreeByte,
        })
    }

    /// Writer with the default capacity and the 4-byte dialect — *not* the
    /// `DataOutput` form; see [`UtfVariant`].
    ///
    /// Reuses the process-wide recycled core from a previous
    /// [`release`](Self::release) when one is available.
    #[must_use]
    pub fn using_4byte_sequences(sink: S) -> Self {
        match pool::take() {
            Some(scratch) => {
                let mut writer = Self {
                    sink,
                    buf: scratch.buf,
                    pos: 0,
                    variant: UtfVariant::FourByte,
                    refs: scratch.refs,
                };
                writer.refs.clear();
                writer
            }
            None => Self::new(sink, WriterOptions::default()),
        }
    }

    /// Rebind the writer to a new sink and return the old one.
    ///
    /// The cursor and the intern table reset; staged bytes never flushed to
    /// the old sink are discarded with it.
    pub fn set_output(&mut self, sink: S) -> S {
        self.pos = 0;
        self.refs.clear();
        core::mem::replace(&mut self.sink, sink)
    }

    /// Drain staged bytes, then flush the sink.
    pub fn flush(&mut self) -> Result<(), WriteError<S::Error>> {
        self.drain()?;
        self.sink.flush().map_err(WriteError::Sink)
    }

    /// Close the sink, then release the writer as in
    /// [`release`](Self::release).
    ///
    /// # Panics
    ///
    /// Panics when staged bytes were never flushed; see
    /// [`release`](Self::release).
    pub fn close(mut self) -> Result<(), WriteError<S::Error>> {
        self.sink.close().map_err(WriteError::Sink)?;
        self.release();
        Ok(())
    }

    /// Tear the writer down and hand back its sink.
    ///
    /// A writer holding the default-capacity staging buffer and the 4-byte
    /// dialect offers its allocations to the single-slot pool consumed by
    /// [`using_4byte_sequences`](Self::using_4byte_sequences); any other
    /// configuration is simply dropped.
    ///
    /// # Panics
    ///
    /// Panics when staged bytes are pending. Lingering data at release is
    /// caller misuse, not something to drain silently; call
    /// [`flush`](Self::flush) first.
    pub fn release(self) -> S {
        assert!(
            self.pos == 0,
            "lingering data, call flush() before releasing"
        );
        let Self {
            sink,
            buf,
            variant,
            mut refs,
            ..
        } = self;
        if buf.len() == DEFAULT_BUFFER_CAPACITY && variant == UtfVariant::FourByte {
            refs.clear();
            pool::put(pool::Scratch { buf, refs });
        }
        sink
    }
}

// ------------------------------------------------------------------------------------------------
// Staging buffer
// ------------------------------------------------------------------------------------------------

impl<S: ByteSink> DataWriter<S> {
    #[inline]
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Hand `[0, pos)` to the sink and rewind. Only runs when bytes are
    /// pending.
    fn drain(&mut self) -> Result<(), WriteError<S::Error>> {
        if self.pos > 0 {
            self.sink
                .write(&self.buf[..self.pos])
                .map_err(WriteError::Sink)?;
            self.pos = 0;
        }
        Ok(())
    }

    /// Guarantee `n` free bytes at the cursor. `n` must not exceed the
    /// staging capacity.
    #[inline]
    fn ensure(&mut self, n: usize) -> Result<(), WriteError<S::Error>> {
        debug_assert!(n <= self.buf.len());
        if self.remaining() < n {
            self.drain()?;
        }
        Ok(())
    }

    /// Copy into staging at the cursor. Capacity must already be ensured.
    #[inline]
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    /// Stage an opaque byte range, or forward it past staging when it is at
    /// least as large as the buffer itself.
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), WriteError<S::Error>> {
        if bytes.len() >= self.buf.len() {
            self.drain()?;
            self.sink.write(bytes).map_err(WriteError::Sink)
        } else {
            self.ensure(bytes.len())?;
            self.put(bytes);
            Ok(())
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Primitives — big-endian, most significant byte first
// ------------------------------------------------------------------------------------------------

impl<S: ByteSink> DataWriter<S> {
    /// `0x01` for `true`, `0x00` for `false`.
    pub fn write_bool(&mut self, v: bool) -> Result<(), WriteError<S::Error>> {
        self.write_u8(u8::from(v))
    }

    pub fn write_u8(&mut self, v: u8) -> Result<(), WriteError<S::Error>> {
        self.ensure(1)?;
        self.buf[self.pos] = v;
        self.pos += 1;
        Ok(())
    }

    pub fn write_i8(&mut self, v: i8) -> Result<(), WriteError<S::Error>> {
        self.write_u8(v as u8)
    }

    /// Two bytes, big-endian. Also the UTF-16 code-unit writer: a wider
    /// value narrowed with `as u16` lands on the wire exactly like the
    /// classical `writeChar`.
    pub fn write_u16(&mut self, v: u16) -> Result<(), WriteError<S::Error>> {
        self.ensure(2)?;
        self.put(&v.to_be_bytes());
        Ok(())
    }

    pub fn write_i16(&mut self, v: i16) -> Result<(), WriteError<S::Error>> {
        self.write_u16(v as u16)
    }

    pub fn write_i32(&mut self, v: i32) -> Result<(), WriteError<S::Error>> {
        self.ensure(4)?;
        self.put(&v.to_be_bytes());
        Ok(())
    }

    pub fn write_i64(&mut self, v: i64) -> Result<(), WriteError<S::Error>> {
        self.ensure(8)?;
        self.put(&v.to_be_bytes());
        Ok(())
    }

    /// IEEE-754 raw bits, as [`write_i32`](Self::write_i32) of the pattern.
    pub fn write_f32(&mut self, v: f32) -> Result<(), WriteError<S::Error>> {
        self.write_i32(v.to_bits() as i32)
    }

    /// IEEE-754 raw bits, as [`write_i64`](Self::write_i64) of the pattern.
    pub fn write_f64(&mut self, v: f64) -> Result<(), WriteError<S::Error>> {
        self.write_i64(v.to_bits() as i64)
    }

    /// Legacy low-byte string serialization. Always fails with
    /// [`WriteError::Unsupported`]; use [`write_utf`](Self::write_utf).
    pub fn write_bytes(&mut self, _s: &str) -> Result<(), WriteError<S::Error>> {
        Err(WriteError::Unsupported)
    }

    /// Legacy UTF-16 string serialization. Always fails with
    /// [`WriteError::Unsupported`]; use [`write_utf`](Self::write_utf).
    pub fn write_chars(&mut self, _s: &str) -> Result<(), WriteError<S::Error>> {
        Err(WriteError::Unsupported)
    }
}

// ------------------------------------------------------------------------------------------------
// Strings
// ------------------------------------------------------------------------------------------------

impl<S: ByteSink> DataWriter<S> {
    /// Write `s` as a `u16` big-endian *byte*-length prefix followed by its
    /// Modified UTF-8 form in the writer's dialect.
    ///
    /// Fails with [`WriteError::StringTooLong`] when the encoded form
    /// exceeds 65 535 bytes.
    pub fn write_utf(&mut self, s: &str) -> Result<(), WriteError<S::Error>> {
        match self.variant {
            UtfVariant::ThreeByte => self.write_utf_3byte(s),
            UtfVariant::FourByte => self.write_utf_4byte(s),
        }
    }

    /// Prefix known up front: count, then encode straight into staging when
    /// the whole form can ever fit, spilling otherwise.
    fn write_utf_3byte(&mut self, s: &str) -> Result<(), WriteError<S::Error>> {
        let len = mutf8::encoded_len(s, UtfVariant::ThreeByte);
        if len > MAX_UNSIGNED_SHORT {
            return Err(WriteError::StringTooLong(len));
        }

        if 2 + len <= self.buf.len() {
            self.ensure(2 + len)?;
            self.put(&(len as u16).to_be_bytes());
            let written = mutf8::encode(s, UtfVariant::ThreeByte, &mut self.buf[self.pos..]);
            debug_assert_eq!(written, Ok(len));
            self.pos += len;
            Ok(())
        } else {
            let tmp = mutf8::encode_to_vec(s, UtfVariant::ThreeByte);
            self.write_u16(len as u16)?;
            self.write_all(&tmp)
        }
    }

    /// Prefix only known after encoding: reserve a two-byte gap, attempt an
    /// in-place encode, and back-patch the gap on success. On
    /// `Err(required)` the staging region was too small and the string
    /// takes the spill path.
    fn write_utf_4byte(&mut self, s: &str) -> Result<(), WriteError<S::Error>> {
        // One byte per UTF-16 unit plus the prefix is the common-case
        // footprint; drain up front so short strings rarely fail the
        // attempt. Capacity is at least 8, so the gap always fits.
        if self.remaining() < 2 + s.len() {
            self.drain()?;
        }

        match mutf8::encode(s, UtfVariant::FourByte, &mut self.buf[self.pos + 2..]) {
            Ok(len) => {
                if len > MAX_UNSIGNED_SHORT {
                    return Err(WriteError::StringTooLong(len));
                }
                self.buf[self.pos..self.pos + 2].copy_from_slice(&(len as u16).to_be_bytes());
                self.pos += 2 + len;
                Ok(())
            }
            Err(required) => {
                if required > MAX_UNSIGNED_SHORT {
                    return Err(WriteError::StringTooLong(required));
                }
                let tmp = mutf8::encode_to_vec(s, UtfVariant::FourByte);
                self.write_u16(required as u16)?;
                self.write_all(&tmp)
            }
        }
    }

    /// Write `s` as an interning candidate.
    ///
    /// The first occurrence goes out as the sentinel reference `0xFFFF`
    /// followed by the literal via [`write_utf`](Self::write_utf);
    /// repeats collapse to the two-byte reference assigned on first sight.
    /// Once 65 535 strings are held, novel values still go out literally
    /// but are no longer remembered, keeping a symmetric reader's table in
    /// step.
    pub fn write_interned_utf(&mut self, s: &str) -> Result<(), WriteError<S::Error>> {
        match self.refs.get(s) {
            Some(reference) => self.write_u16(reference),
            None => {
                self.write_u16(SENTINEL_REF)?;
                self.write_utf(s)?;
                self.refs.insert(s);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::DataWriter;
    use crate::options::{UtfVariant, WriterOptions};

    fn writer(capacity: usize, variant: UtfVariant) -> DataWriter<Vec<u8>> {
        DataWriter::new(Vec::new(), WriterOptions {
            buffer_capacity: capacity,
            utf_variant: variant,
        })
    }

    #[test]
    fn staging_holds_bytes_until_drained() {
        let mut w = writer(16, UtfVariant::ThreeByte);
        w.write_i32(1).unwrap();
        assert_eq!(w.pos, 4);
        assert!(w.sink.is_empty(), "nothing drained yet");
        w.flush().unwrap();
        assert_eq!(w.pos, 0);
        assert_eq!(w.sink, [0, 0, 0, 1]);
    }

    #[test]
    fn exactly_full_buffer_drains_on_next_write() {
        let mut w = writer(8, UtfVariant::ThreeByte);
        w.write_i64(-1).unwrap();
        assert_eq!(w.pos, 8);
        assert!(w.sink.is_empty());
        w.write_u8(0x7E).unwrap();
        assert_eq!(w.sink, [0xFF; 8]);
        assert_eq!(w.pos, 1);
    }

    #[test]
    fn large_ranges_bypass_staging() {
        let mut w = writer(8, UtfVariant::ThreeByte);
        w.write_u8(0x01).unwrap();
        let big = vec![0xAB; 8];
        w.write_all(&big).unwrap();
        // The pending byte drained first, then the range went out directly.
        assert_eq!(w.sink[0], 0x01);
        assert_eq!(&w.sink[1..], &big[..]);
        assert_eq!(w.pos, 0);
    }

    #[test]
    fn small_ranges_are_staged() {
        let mut w = writer(8, UtfVariant::ThreeByte);
        w.write_all(&[1, 2, 3]).unwrap();
        assert!(w.sink.is_empty());
        assert_eq!(w.pos, 3);
    }

    #[test]
    fn spilled_string_still_prefixes_first() {
        // "aaaaaaaaaa" (10 bytes) cannot fit an 8-byte buffer in place.
        let mut w = writer(8, UtfVariant::ThreeByte);
        w.write_utf("aaaaaaaaaa").unwrap();
        w.flush().unwrap();
        assert_eq!(&w.sink[..2], [0, 10]);
        assert_eq!(&w.sink[2..], b"aaaaaaaaaa");
    }

    #[test]
    fn four_byte_dialect_backpatches_in_place() {
        let mut w = writer(64, UtfVariant::FourByte);
        w.write_utf("é\u{1F600}").unwrap();
        assert_eq!(w.pos, 2 + 2 + 4);
        w.flush().unwrap();
        assert_eq!(w.sink, [0x00, 0x06, 0xC3, 0xA9, 0xF0, 0x9F, 0x98, 0x80]);
    }

    #[test]
    fn four_byte_dialect_spills_when_staging_is_short() {
        let mut w = writer(8, UtfVariant::FourByte);
        w.write_utf("\u{1F600}\u{1F600}").unwrap();
        w.flush().unwrap();
        assert_eq!(w.sink[..2], [0x00, 0x08]);
        assert_eq!(w.sink[2..], [0xF0, 0x9F, 0x98, 0x80, 0xF0, 0x9F, 0x98, 0x80]);
    }

    #[test]
    fn set_output_swaps_sinks_and_forgets_state() {
        let mut w = writer(16, UtfVariant::ThreeByte);
        w.write_interned_utf("k").unwrap();
        let old = w.set_output(Vec::new());
        assert!(old.is_empty(), "unflushed staging is discarded, not drained");
        assert_eq!(w.pos, 0);
        // The intern table was reset along with the cursor.
        w.write_interned_utf("k").unwrap();
        w.flush().unwrap();
        assert_eq!(w.sink, [0xFF, 0xFF, 0x00, 0x01, b'k']);
    }

    #[test]
    fn release_hands_back_the_sink() {
        let mut w = writer(16, UtfVariant::ThreeByte);
        w.write_u8(9).unwrap();
        w.flush().unwrap();
        let sink = w.release();
        assert_eq!(sink, [9]);
    }

    #[test]
    #[should_panic(expected = "lingering data")]
    fn release_with_pending_bytes_is_misuse() {
        let mut w = writer(16, UtfVariant::ThreeByte);
        w.write_u8(9).unwrap();
        let _ = w.release();
    }

    #[test]
    #[should_panic(expected = "staging capacity must be at least 8")]
    fn capacity_below_the_largest_primitive_is_rejected() {
        let _ = writer(7, UtfVariant::ThreeByte);
    }

    #[test]
    fn recycled_writers_start_clean() {
        let mut w: DataWriter<Vec<u8>> = DataWriter::using_4byte_sequences(Vec::new());
        w.write_interned_utf("stale").unwrap();
        w.flush().unwrap();
        w.release();

        // Whether or not this obtain won the pooled core, the intern table
        // and cursor must look freshly constructed.
        let mut w: DataWriter<Vec<u8>> = DataWriter::using_4byte_sequences(Vec::new());
        assert_eq!(w.pos, 0);
        w.write_interned_utf("stale").unwrap();
        w.flush().unwrap();
        assert_eq!(w.sink[..2], [0xFF, 0xFF], "must re-emit the literal");
        w.release();
    }
}
