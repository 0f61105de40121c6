use std::io;

/// A reader that reads individual bits from a stream, most significant bit
/// first.
#[derive(Debug)]
pub struct BitReader<T> {
    data: T,
    bit_pos: u8,
    current_byte: u8,
}

impl<T> BitReader<T> {
    /// Create a new BitReader from a reader.
    pub const fn new(data: T) -> Self {
        Self {
            data,
            bit_pos: 0,
            current_byte: 0,
        }
    }

    /// Returns the inner reader, dropping any partially consumed byte.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Returns a reference to the inner reader.
    pub const fn get_ref(&self) -> &T {
        &self.data
    }

    /// Returns the number of bits already consumed from the current byte.
    pub const fn bit_pos(&self) -> u8 {
        self.bit_pos
    }

    /// Returns true if the next read starts on a byte boundary.
    pub const fn is_aligned(&self) -> bool {
        self.bit_pos == 0
    }
}

impl<T: AsRef<[u8]>> BitReader<io::Cursor<T>> {
    /// Create a new BitReader over an in-memory buffer.
    pub const fn new_from_slice(data: T) -> Self {
        Self::new(io::Cursor::new(data))
    }
}

impl<T: io::Read> BitReader<T> {
    /// Reads a single bit.
    pub fn read_bit(&mut self) -> io::Result<bool> {
        if self.is_aligned() {
            let mut buf = [0];
            self.data.read_exact(&mut buf)?;
            self.current_byte = buf[0];
        }

        let bit = (self.current_byte >> (7 - self.bit_pos)) & 1;
        self.bit_pos = (self.bit_pos + 1) % 8;

        Ok(bit == 1)
    }

    /// Reads `count` bits (at most 64) into the low bits of the result.
    pub fn read_bits(&mut self, count: u8) -> io::Result<u64> {
        if count > 64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot read {count} bits into a u64"),
            ));
        }

        let mut bits = 0;
        for _ in 0..count {
            bits = (bits << 1) | self.read_bit()? as u64;
        }

        Ok(bits)
    }

    /// Discards `count` bits.
    pub fn skip_bits(&mut self, count: u64) -> io::Result<()> {
        let mut remaining = count;

        while remaining > 0 && !self.is_aligned() {
            self.read_bit()?;
            remaining -= 1;
        }

        let bytes = remaining / 8;
        if bytes > 0 {
            let skipped = io::copy(&mut io::Read::take(&mut self.data, bytes), &mut io::sink())?;
            if skipped != bytes {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "skip past end of data"));
            }
        }

        for _ in 0..remaining % 8 {
            self.read_bit()?;
        }

        Ok(())
    }

    /// Discards the rest of the current byte.
    pub fn align(&mut self) -> io::Result<()> {
        let remaining = (8 - self.bit_pos) % 8;
        self.skip_bits(remaining as u64)
    }
}

impl<T: io::Read> io::Read for BitReader<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.is_aligned() {
            return self.data.read(buf);
        }

        let mut read = 0;
        for byte in buf.iter_mut() {
            match self.read_bits(8) {
                Ok(bits) => *byte = bits as u8,
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(err) => return Err(err),
            }
            read += 1;
        }

        Ok(read)
    }
}
