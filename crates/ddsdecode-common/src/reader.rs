//! Binary readers for fixed-layout little-endian data.
//!
//! [`BinaryReader`] is a cursor over a byte slice that extracts each field
//! with an explicit width and byte order. [`ReadExt`] covers the streaming
//! side: pulling exact-sized chunks out of any [`Read`] and discarding bytes.

use std::io::{self, Read};

use byteorder::{ByteOrder, LittleEndian};

use crate::{Error, Result};

/// A cursor that reads little-endian values from a byte slice.
///
/// # Example
///
/// ```
/// use ddsdecode_common::BinaryReader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// assert_eq!(reader.read_u32().unwrap(), 0x08070605);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_bytes(2).map(LittleEndian::read_u16)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_bytes(4).map(LittleEndian::read_u32)
    }

    /// Read `N` consecutive little-endian u32 values.
    pub fn read_u32_array<const N: usize>(&mut self) -> Result<[u32; N]> {
        let mut out = [0u32; N];
        LittleEndian::read_u32_into(self.read_bytes(N * 4)?, &mut out);
        Ok(out)
    }
}

/// Exact-size reads over a byte stream.
///
/// Every method either delivers the full amount requested or fails; a stream
/// that ends early yields [`Error::UnexpectedEof`] with the number of bytes
/// that did arrive.
pub trait ReadExt: Read {
    /// Fill `buf` completely from the stream.
    fn read_full(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(Error::UnexpectedEof {
                        needed: buf.len(),
                        available: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(())
    }

    /// Read a fixed-size chunk.
    fn read_chunk<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut chunk = [0u8; N];
        self.read_full(&mut chunk)?;
        Ok(chunk)
    }

    /// Read `len` bytes into a freshly allocated buffer.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_full(&mut buf)?;
        Ok(buf)
    }

    /// Consume and discard exactly `len` bytes.
    fn skip_exact(&mut self, len: u64) -> Result<()> {
        let copied = io::copy(&mut Read::take(&mut *self, len), &mut io::sink())?;
        if copied < len {
            return Err(Error::UnexpectedEof {
                needed: usize::try_from(len).unwrap_or(usize::MAX),
                available: copied as usize,
            });
        }
        Ok(())
    }
}

impl<R: Read + ?Sized> ReadExt for R {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFE, // u16: 0xFEFF
            0x7F, // u8
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_u16().unwrap(), 0xFEFF);
        assert_eq!(reader.read_u8().unwrap(), 0x7F);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_u32_array() {
        let data = [1u8, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32_array::<3>().unwrap(), [1, 2, 3]);
        assert_eq!(reader.position(), 12);
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        match reader.read_u32() {
            Err(Error::UnexpectedEof { needed, available }) => {
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
    }

    #[test]
    fn test_read_chunk_short_stream() {
        let mut stream = Cursor::new(vec![1u8, 2, 3]);

        match stream.read_chunk::<8>() {
            Err(Error::UnexpectedEof { needed, available }) => {
                assert_eq!(needed, 8);
                assert_eq!(available, 3);
            }
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_exact() {
        let mut stream = Cursor::new(vec![0u8; 10]);

        stream.skip_exact(6).unwrap();
        assert_eq!(stream.position(), 6);
        assert!(stream.skip_exact(5).is_err());
    }

    #[test]
    fn test_read_vec() {
        let mut stream = Cursor::new(vec![9u8, 8, 7, 6]);

        assert_eq!(stream.read_vec(3).unwrap(), vec![9, 8, 7]);
        assert_eq!(stream.read_chunk::<1>().unwrap(), [6]);
    }
}
