/// Selects the Modified UTF-8 dialect a writer emits.
///
/// The dialects agree on everything below U+10000; they differ only in how
/// supplementary code points are laid out:
///
/// | variant     | supplementary code point | bytes |
/// | ----------- | ------------------------ | ----- |
/// | `ThreeByte` | surrogate pair, each half a 3-byte sequence | 6 |
/// | `FourByte`  | one standard UTF-8 sequence | 4 |
///
/// `ThreeByte` is the form the `DataOutput` contract specifies. `FourByte`
/// reproduces, bit for bit, the output of a long-lived runtime divergence
/// from that contract; pick it when the intended reader decodes 4-byte
/// sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtfVariant {
    /// Encode supplementary code points as two 3-byte surrogate sequences.
    ThreeByte,
    /// Encode supplementary code points as a single 4-byte sequence.
    FourByte,
}

/// Staging capacity used by the convenience constructors.
pub const DEFAULT_BUFFER_CAPACITY: usize = 32 * 1024;

/// Configuration accepted by [`DataWriter::new`](crate::DataWriter::new).
///
/// # Examples
///
/// ```rust
/// use datamodem::{DataWriter, UtfVariant, WriterOptions};
///
/// let writer = DataWriter::new(
///     Vec::new(),
///     WriterOptions {
///         buffer_capacity: 64,
///         utf_variant: UtfVariant::ThreeByte,
///     },
/// );
/// ```
///
/// # Default
///
/// The default staging capacity ([`DEFAULT_BUFFER_CAPACITY`]) and the
/// 4-byte dialect.
#[derive(Debug, Clone, Copy)]
pub struct WriterOptions {
    /// Size of the staging buffer in bytes. Governs when strings take the
    /// spill path, never the bytes produced. Must be at least 8, the width
    /// of the largest primitive.
    pub buffer_capacity: usize,

    /// The Modified UTF-8 dialect, fixed for the writer's lifetime.
    pub utf_variant: UtfVariant,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            utf_variant: UtfVariant::FourByte,
        }
    }
}
