use thiserror::Error;

/// Failures surfaced while serializing.
///
/// `E` is the [`ByteSink`](crate::ByteSink) implementation's error type. The
/// writer never retries: every failure propagates to the caller, and bytes
/// that reached the sink before the failure are not rolled back, so the
/// stream must be treated as indeterminate afterwards.
#[derive(Error, Debug, PartialEq)]
pub enum WriteError<E> {
    /// The sink failed while draining staged bytes or forwarding a large
    /// write.
    #[error("sink failure: {0}")]
    Sink(E),
    /// A string's Modified UTF-8 form does not fit the `u16` length prefix.
    #[error("modified utf-8 length too large: {0}")]
    StringTooLong(usize),
    /// Legacy low-byte / UTF-16 string serialization was requested; use
    /// [`write_utf`](crate::DataWriter::write_utf) instead.
    #[error("legacy string serialization is unsupported, use write_utf")]
    Unsupported,
}
