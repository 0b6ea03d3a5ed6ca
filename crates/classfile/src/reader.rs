use crate::error::ClassFileError;

/// A forward-only cursor over the raw bytes of a `.class` file.
///
/// Every `read_*` method advances the cursor past the value it returns,
/// the same shape this codebase's own bytecode readers use for the
/// (little-endian) instruction stream; here the class-file format is
/// big-endian throughout, per the JVM specification.
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ClassFileError> {
        let end = self.offset + len;
        let slice = self.bytes.get(self.offset..end).ok_or(ClassFileError::UnexpectedEof)?;
        self.offset = end;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, ClassFileError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ClassFileError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_u32(&mut self) -> Result<u32, ClassFileError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_i32(&mut self) -> Result<i32, ClassFileError> {
        Ok(self.read_u32()? as i32)
    }

    /// Reads a `u2`-length-prefixed byte array, as used by `CONSTANT_Utf8`
    /// and the `Code` attribute's instruction stream.
    pub fn read_u16_length_bytes(&mut self) -> Result<&'a [u8], ClassFileError> {
        let len = self.read_u16()? as usize;
        self.take(len)
    }

    /// Reads a `u4`-length-prefixed byte array, as used by attribute bodies.
    pub fn read_u32_length_bytes(&mut self) -> Result<&'a [u8], ClassFileError> {
        let len = self.read_u32()? as usize;
        self.take(len)
    }

    /// Reads exactly `len` bytes whose length was already read separately,
    /// as with an attribute body following its own `attribute_length` field.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ClassFileError> {
        self.take(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reads_big_endian_scalars() {
        let mut reader = Reader::new(&[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x34]);
        assert_eq!(reader.read_u32().unwrap(), 0xCAFE_BABE);
        assert_eq!(reader.read_u16().unwrap(), 0x34);
    }

    #[test]
    fn test_unexpected_eof() {
        let mut reader = Reader::new(&[0x00]);
        assert!(matches!(reader.read_u16(), Err(ClassFileError::UnexpectedEof)));
    }
}
