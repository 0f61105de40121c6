/// A wrapper around a [`std::io::Read`] that removes emulation prevention
/// bytes while reading.
///
/// Every `0x03` that follows two consecutive `0x00` bytes is dropped and the
/// zero run starts over. Feed it the payload after the NAL unit header.
pub struct EmulationPreventionIo<I> {
    inner: I,
    zero_count: u8,
}

impl<I> EmulationPreventionIo<I> {
    /// Creates a new `EmulationPreventionIo` wrapper around the given [`std::io::Read`].
    /// This should be a buffered or in-memory reader because we will only read one byte at a time.
    pub const fn new(inner: I) -> Self {
        Self { inner, zero_count: 0 }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: std::io::Read> std::io::Read for EmulationPreventionIo<I> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut read_size = 0;
        let mut one_byte = [0; 1];
        while buf.len() > read_size {
            let size = self.inner.read(&mut one_byte)?;
            if size == 0 {
                break;
            }

            let byte = one_byte[0];
            match byte {
                0x03 if self.zero_count >= 2 => {
                    self.zero_count = 0;
                    continue;
                }
                0x00 => {
                    self.zero_count = self.zero_count.saturating_add(1);
                }
                _ => {
                    self.zero_count = 0;
                }
            }

            buf[read_size] = byte;
            read_size += 1;
        }

        Ok(read_size)
    }
}
