//! The destination a [`DataWriter`](crate::DataWriter) drains into.

use alloc::vec::Vec;
use core::convert::Infallible;

/// A sequential byte destination.
///
/// The writer assumes `write` either accepts the whole slice or fails, and
/// that the sink preserves byte order. All blocking the writer ever does
/// happens inside these three calls.
pub trait ByteSink {
    /// Error reported by the sink.
    type Error;

    /// Accept the whole of `buf`.
    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Push sink-internal buffering down to the final destination.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Release the underlying resource.
    fn close(&mut self) -> Result<(), Self::Error>;
}

impl ByteSink for Vec<u8> {
    type Error = Infallible;

    fn write(&mut self, buf: &[u8]) -> Result<(), Infallible> {
        self.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    type Error = S::Error;

    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        (**self).close()
    }
}

#[cfg(feature = "std")]
mod io {
    use std::io;

    use super::ByteSink;

    /// Adapter binding any [`io::Write`] as a [`ByteSink`].
    ///
    /// `io::Write` has no close operation, so [`ByteSink::close`] flushes
    /// and leaves releasing the resource to drop.
    #[derive(Debug)]
    pub struct IoSink<W: io::Write>(pub W);

    impl<W: io::Write> ByteSink for IoSink<W> {
        type Error = io::Error;

        fn write(&mut self, buf: &[u8]) -> Result<(), io::Error> {
            self.0.write_all(buf)
        }

        fn flush(&mut self) -> Result<(), io::Error> {
            self.0.flush()
        }

        fn close(&mut self) -> Result<(), io::Error> {
            self.0.flush()
        }
    }
}

#[cfg(feature = "std")]
pub use io::IoSink;
