//! Forward-only big-endian reader over an owned class file buffer.

use crate::error::{ClassFormatError, DecodeResult};

#[derive(Debug, Clone)]
pub struct ByteCursor {
    data: Vec<u8>,
    pos: usize,
}

impl ByteCursor {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> DecodeResult<&[u8]> {
        if self.remaining() < n {
            return Err(ClassFormatError::OutOfData {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }

    fn take_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        self.take_array().map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        self.take_array().map(u32::from_be_bytes)
    }

    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        self.take_array().map(u64::from_be_bytes)
    }

    pub fn read_bytes(&mut self, n: usize) -> DecodeResult<Vec<u8>> {
        self.take(n).map(<[u8]>::to_vec)
    }

    /// A u16 count followed by that many u16 values.
    pub fn read_u16s(&mut self) -> DecodeResult<Vec<u16>> {
        let count = self.read_u16()?;
        (0..count).map(|_| self.read_u16()).collect()
    }

    /// Splits off the next `n` bytes as an independent cursor.
    pub fn sub_cursor(&mut self, n: usize) -> DecodeResult<ByteCursor> {
        self.read_bytes(n).map(ByteCursor::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_in_sequence() {
        let mut cursor = ByteCursor::new(vec![
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x2a,
        ]);
        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_u16().unwrap(), 0x0203);
        assert_eq!(cursor.read_u32().unwrap(), 0x0405_0607);
        assert_eq!(cursor.read_u64().unwrap(), 0x2a);
        assert!(cursor.is_empty());
        assert_eq!(cursor.position(), 15);
    }

    #[test]
    fn short_read_reports_out_of_data_without_consuming() {
        let mut cursor = ByteCursor::new(vec![0xca, 0xfe, 0xba]);
        let err = cursor.read_u32().unwrap_err();
        assert_eq!(
            err,
            ClassFormatError::OutOfData {
                offset: 0,
                needed: 4,
                remaining: 3
            }
        );
        assert_eq!(cursor.remaining(), 3);
    }

    #[test]
    fn read_u16s_uses_count_prefix() {
        let mut cursor = ByteCursor::new(vec![0x00, 0x02, 0x00, 0x07, 0x00, 0x09, 0xff]);
        assert_eq!(cursor.read_u16s().unwrap(), vec![7, 9]);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn sub_cursor_is_bounded() {
        let mut cursor = ByteCursor::new(vec![1, 2, 3, 4]);
        let mut sub = cursor.sub_cursor(2).unwrap();
        assert_eq!(sub.read_u16().unwrap(), 0x0102);
        assert!(sub.read_u8().is_err());
        assert_eq!(cursor.read_u16().unwrap(), 0x0304);
    }
}
