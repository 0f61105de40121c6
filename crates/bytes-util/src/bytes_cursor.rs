use std::io;

use bytes::Bytes;

/// Zero-copy extraction helpers for a [`io::Cursor`] over [`Bytes`].
pub trait BytesCursorExt {
    /// Returns the next `size` bytes and advances the cursor past them.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] without moving the cursor
    /// if fewer than `size` bytes remain.
    fn extract_bytes(&mut self, size: usize) -> io::Result<Bytes>;

    /// Returns everything after the cursor and moves it to the end.
    fn extract_remaining(&mut self) -> Bytes;
}

impl BytesCursorExt for io::Cursor<Bytes> {
    fn extract_bytes(&mut self, size: usize) -> io::Result<Bytes> {
        let position = self.position() as usize;
        let available = self.get_ref().len().saturating_sub(position);

        if size > available {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("need {size} bytes but only {available} remain"),
            ));
        }

        let slice = self.get_ref().slice(position..position + size);
        self.set_position((position + size) as u64);

        Ok(slice)
    }

    fn extract_remaining(&mut self) -> Bytes {
        let position = (self.position() as usize).min(self.get_ref().len());
        let slice = self.get_ref().slice(position..);
        self.set_position(self.get_ref().len() as u64);

        slice
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bytes() {
        let mut cursor = io::Cursor::new(Bytes::from_static(&[1, 2, 3, 4, 5]));

        assert_eq!(cursor.extract_bytes(2).unwrap(), Bytes::from_static(&[1, 2]));
        assert_eq!(cursor.position(), 2);

        let err = cursor.extract_bytes(4).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(cursor.position(), 2);

        assert_eq!(cursor.extract_remaining(), Bytes::from_static(&[3, 4, 5]));
        assert_eq!(cursor.extract_remaining(), Bytes::new());
    }
}
