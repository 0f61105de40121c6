use std::io::{self, Read};

use bytes::Bytes;

use crate::error::FlvError;

/// A forward-only reader that knows its absolute offset.
///
/// Every read either fills its whole buffer or fails with
/// [`FlvError::Truncated`] carrying the offset at which it started.
pub(crate) struct TrackedReader<R> {
    inner: R,
    position: u64,
}

impl<R: io::Read> TrackedReader<R> {
    pub(crate) const fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    pub(crate) const fn position(&self) -> u64 {
        self.position
    }

    /// Reads until `buf` is full or the stream ends, returning the byte count.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, FlvError> {
        let mut filled = 0;

        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        self.position += filled as u64;
        Ok(filled)
    }

    pub(crate) fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], FlvError> {
        let offset = self.position;
        self.try_read_array(context)?
            .ok_or(FlvError::Truncated { context, offset })
    }

    /// Like [`Self::read_array`], but end of stream before the first byte
    /// yields `None`.
    pub(crate) fn try_read_array<const N: usize>(&mut self, context: &'static str) -> Result<Option<[u8; N]>, FlvError> {
        let offset = self.position;
        let mut buf = [0; N];

        match self.fill(&mut buf)? {
            0 if N > 0 => Ok(None),
            n if n == N => Ok(Some(buf)),
            _ => Err(FlvError::Truncated { context, offset }),
        }
    }

    pub(crate) fn read_bytes(&mut self, len: usize, context: &'static str) -> Result<Bytes, FlvError> {
        let offset = self.position;
        let mut buf = Vec::new();
        // Grows with the data actually present instead of trusting `len`.
        let read = (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;
        self.position += read as u64;

        if read < len {
            return Err(FlvError::Truncated { context, offset });
        }

        Ok(Bytes::from(buf))
    }

    pub(crate) fn discard(&mut self, len: u64, context: &'static str) -> Result<(), FlvError> {
        let offset = self.position;
        let skipped = io::copy(&mut (&mut self.inner).take(len), &mut io::sink())?;
        self.position += skipped;

        if skipped < len {
            return Err(FlvError::Truncated { context, offset });
        }

        Ok(())
    }
}
