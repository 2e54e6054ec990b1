//! Fixed-width integer access at arbitrary buffer offsets.

use crate::FormatError;

fn window<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N], FormatError> {
    buf.get(offset..offset + N)
        .and_then(|s| s.try_into().ok())
        .ok_or(FormatError::UnexpectedEof { offset })
}

fn window_mut<const N: usize>(buf: &mut [u8], offset: usize) -> Result<&mut [u8], FormatError> {
    buf.get_mut(offset..offset + N)
        .ok_or(FormatError::UnexpectedEof { offset })
}

pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8, FormatError> {
    buf.get(offset).copied().ok_or(FormatError::UnexpectedEof { offset })
}

pub fn read_u16_be(buf: &[u8], offset: usize) -> Result<u16, FormatError> {
    Ok(u16::from_be_bytes(window(buf, offset)?))
}

pub fn read_u16_le(buf: &[u8], offset: usize) -> Result<u16, FormatError> {
    Ok(u16::from_le_bytes(window(buf, offset)?))
}

pub fn read_u32_be(buf: &[u8], offset: usize) -> Result<u32, FormatError> {
    Ok(u32::from_be_bytes(window(buf, offset)?))
}

pub fn read_u32_le(buf: &[u8], offset: usize) -> Result<u32, FormatError> {
    Ok(u32::from_le_bytes(window(buf, offset)?))
}

pub fn write_u8(buf: &mut [u8], offset: usize, value: u8) -> Result<(), FormatError> {
    let slot = buf.get_mut(offset).ok_or(FormatError::UnexpectedEof { offset })?;
    *slot = value;
    Ok(())
}

pub fn write_u16_be(buf: &mut [u8], offset: usize, value: u16) -> Result<(), FormatError> {
    window_mut::<2>(buf, offset)?.copy_from_slice(&value.to_be_bytes());
    Ok(())
}

pub fn write_u16_le(buf: &mut [u8], offset: usize, value: u16) -> Result<(), FormatError> {
    window_mut::<2>(buf, offset)?.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

pub fn write_u32_be(buf: &mut [u8], offset: usize, value: u32) -> Result<(), FormatError> {
    window_mut::<4>(buf, offset)?.copy_from_slice(&value.to_be_bytes());
    Ok(())
}

pub fn write_u32_le(buf: &mut [u8], offset: usize, value: u32) -> Result<(), FormatError> {
    window_mut::<4>(buf, offset)?.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_and_little_endian() {
        let mut buf = [0u8; 8];
        write_u16_be(&mut buf, 1, 0x1234).unwrap();
        assert_eq!(&buf[1..3], &[0x12, 0x34]);
        assert_eq!(read_u16_le(&buf, 1).unwrap(), 0x3412);

        write_u32_le(&mut buf, 4, 0xAABBCCDD).unwrap();
        assert_eq!(&buf[4..8], &[0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(read_u32_be(&buf, 4).unwrap(), 0xDDCCBBAA);
    }

    #[test]
    fn out_of_bounds_is_eof() {
        let mut buf = [0u8; 4];
        assert_eq!(read_u16_be(&buf, 3), Err(FormatError::UnexpectedEof { offset: 3 }));
        assert_eq!(read_u8(&buf, 4), Err(FormatError::UnexpectedEof { offset: 4 }));
        assert!(write_u32_be(&mut buf, 1, 0).is_err());
        assert_eq!(buf, [0; 4]);
    }
}
