//! Binary codec contract.
//!
//! Every payload shape knows its packed size and converts itself to and from
//! a little-endian byte sequence. Fixed shapes are built from [`WireField`]s
//! via [`wire_struct!`]; variable-length shapes implement [`Serializable`]
//! by hand and consume whatever remains in the buffer.

use crate::error::ProtocolError;
use bytes::{Buf, BufMut, BytesMut};

/// Contract implemented by every payload shape.
pub trait Serializable {
    /// Exact number of bytes `pack` will write.
    fn size(&self) -> usize;

    /// Appends the packed representation to `buf`.
    fn pack<B: BufMut>(&self, buf: &mut B);

    /// Overwrites `self` from `buf`.
    ///
    /// Fails with [`ProtocolError::SizeMismatch`] when fewer bytes remain
    /// than the shape needs. Leaves `self` untouched on error.
    fn unpack<B: Buf>(&mut self, buf: &mut B) -> Result<(), ProtocolError>;

    fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());
        self.pack(&mut buf);
        buf
    }

    fn from_bytes(mut data: &[u8]) -> Result<Self, ProtocolError>
    where
        Self: Default + Sized,
    {
        let mut value = Self::default();
        value.unpack(&mut data)?;
        Ok(value)
    }
}

/// A fixed-width field that can appear inside a payload shape.
pub trait WireField: Sized {
    const SIZE: usize;

    fn put<B: BufMut>(&self, buf: &mut B);

    fn get<B: Buf>(buf: &mut B) -> Result<Self, ProtocolError>;
}

/// Fails unless `buf` still holds at least `expected` bytes.
pub fn ensure_remaining<B: Buf>(buf: &B, expected: usize) -> Result<(), ProtocolError> {
    if buf.remaining() < expected {
        return Err(ProtocolError::SizeMismatch {
            expected,
            actual: buf.remaining(),
        });
    }
    Ok(())
}

/// Reads every remaining byte as UTF-8 text.
pub fn get_text<B: Buf>(buf: &mut B) -> Result<String, ProtocolError> {
    let raw = buf.copy_to_bytes(buf.remaining());
    std::str::from_utf8(&raw)
        .map(str::to_owned)
        .map_err(|_| ProtocolError::InvalidUtf8)
}

macro_rules! impl_primitive_field {
    ($($ty:ty => $size:expr, $put:ident, $get:ident;)*) => {
        $(
            impl WireField for $ty {
                const SIZE: usize = $size;

                #[inline]
                fn put<B: BufMut>(&self, buf: &mut B) {
                    buf.$put(*self);
                }

                #[inline]
                fn get<B: Buf>(buf: &mut B) -> Result<Self, ProtocolError> {
                    ensure_remaining(buf, $size)?;
                    Ok(buf.$get())
                }
            }
        )*
    };
}

impl_primitive_field! {
    u8 => 1, put_u8, get_u8;
    i8 => 1, put_i8, get_i8;
    u16 => 2, put_u16_le, get_u16_le;
    i16 => 2, put_i16_le, get_i16_le;
    u32 => 4, put_u32_le, get_u32_le;
    i32 => 4, put_i32_le, get_i32_le;
    u64 => 8, put_u64_le, get_u64_le;
    f32 => 4, put_f32_le, get_f32_le;
}

impl WireField for bool {
    const SIZE: usize = 1;

    fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(*self));
    }

    fn get<B: Buf>(buf: &mut B) -> Result<Self, ProtocolError> {
        Ok(u8::get(buf)? != 0)
    }
}

impl<T, const N: usize> WireField for [T; N]
where
    T: WireField + Copy + Default,
{
    const SIZE: usize = T::SIZE * N;

    fn put<B: BufMut>(&self, buf: &mut B) {
        for item in self {
            item.put(buf);
        }
    }

    fn get<B: Buf>(buf: &mut B) -> Result<Self, ProtocolError> {
        ensure_remaining(buf, Self::SIZE)?;
        let mut out = [T::default(); N];
        for slot in out.iter_mut() {
            *slot = T::get(buf)?;
        }
        Ok(out)
    }
}

/// Declares a fixed-size payload shape.
///
/// Generates the struct plus its `SIZE` constant and the [`WireField`] and
/// [`Serializable`] impls. Fields are packed in declaration order.
#[macro_export]
macro_rules! wire_struct {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                pub $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, ::serde::Serialize)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl $name {
            pub const SIZE: usize = 0 $(+ <$ty as $crate::codec::WireField>::SIZE)*;
        }

        impl $crate::codec::WireField for $name {
            const SIZE: usize = $name::SIZE;

            #[allow(unused_variables)]
            fn put<B: ::bytes::BufMut>(&self, buf: &mut B) {
                $( $crate::codec::WireField::put(&self.$field, buf); )*
            }

            #[allow(unused_variables)]
            fn get<B: ::bytes::Buf>(buf: &mut B) -> Result<Self, $crate::error::ProtocolError> {
                $crate::codec::ensure_remaining(buf, $name::SIZE)?;
                Ok(Self {
                    $( $field: <$ty as $crate::codec::WireField>::get(buf)?, )*
                })
            }
        }

        impl $crate::codec::Serializable for $name {
            fn size(&self) -> usize {
                $name::SIZE
            }

            fn pack<B: ::bytes::BufMut>(&self, buf: &mut B) {
                $crate::codec::WireField::put(self, buf);
            }

            fn unpack<B: ::bytes::Buf>(&mut self, buf: &mut B) -> Result<(), $crate::error::ProtocolError> {
                *self = <$name as $crate::codec::WireField>::get(buf)?;
                Ok(())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::wire_struct! {
        pub struct Sample {
            pub flag: bool,
            pub count: u16,
            pub offset: i32,
            pub scale: f32,
            pub grid: [[i8; 2]; 2],
        }
    }

    #[test]
    fn test_primitive_little_endian() {
        let mut buf = BytesMut::new();
        0x1234u16.put(&mut buf);
        (-2i16).put(&mut buf);
        0xAABBCCDDu32.put(&mut buf);
        assert_eq!(&buf[..], &[0x34, 0x12, 0xFE, 0xFF, 0xDD, 0xCC, 0xBB, 0xAA]);

        let mut data = &buf[..];
        assert_eq!(u16::get(&mut data).unwrap(), 0x1234);
        assert_eq!(i16::get(&mut data).unwrap(), -2);
        assert_eq!(u32::get(&mut data).unwrap(), 0xAABBCCDD);
        assert!(data.is_empty());
    }

    #[test]
    fn test_primitive_short_buffer() {
        let mut data: &[u8] = &[0x01];
        let err = u32::get(&mut data).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::SizeMismatch {
                expected: 4,
                actual: 1
            }
        );
    }

    #[test]
    fn test_bool_nonzero_is_true() {
        let mut data: &[u8] = &[0x00, 0x01, 0x7F];
        assert!(!bool::get(&mut data).unwrap());
        assert!(bool::get(&mut data).unwrap());
        assert!(bool::get(&mut data).unwrap());
    }

    #[test]
    fn test_wire_struct_size_and_layout() {
        assert_eq!(Sample::SIZE, 1 + 2 + 4 + 4 + 4);

        let sample = Sample {
            flag: true,
            count: 0x0102,
            offset: -1,
            scale: 1.5,
            grid: [[1, -1], [2, -2]],
        };
        assert_eq!(sample.size(), Sample::SIZE);

        let bytes = sample.to_bytes();
        assert_eq!(bytes.len(), Sample::SIZE);
        assert_eq!(bytes[0], 0x01);
        assert_eq!(&bytes[1..3], &[0x02, 0x01]);
        assert_eq!(&bytes[3..7], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&bytes[7..11], &1.5f32.to_le_bytes());
        assert_eq!(&bytes[11..15], &[0x01, 0xFF, 0x02, 0xFE]);

        let decoded = Sample::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_unpack_short_leaves_value() {
        let original = Sample {
            count: 7,
            ..Default::default()
        };
        let mut target = original;
        let mut data: &[u8] = &[0x01, 0x02, 0x03];
        let err = target.unpack(&mut data).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::SizeMismatch {
                expected: Sample::SIZE,
                actual: 3
            }
        );
        assert_eq!(target, original);
    }

    #[test]
    fn test_get_text() {
        let mut data: &[u8] = "caf\u{e9} ok".as_bytes();
        assert_eq!(get_text(&mut data).unwrap(), "caf\u{e9} ok");
        assert!(data.is_empty());

        let mut empty: &[u8] = &[];
        assert_eq!(get_text(&mut empty).unwrap(), "");

        let mut bad: &[u8] = &[0x68, 0xC3, 0x28];
        assert_eq!(get_text(&mut bad).unwrap_err(), ProtocolError::InvalidUtf8);
    }

    #[test]
    fn test_unpack_ignores_trailing_bytes() {
        let sample = Sample {
            count: 9,
            ..Default::default()
        };
        let mut bytes = sample.to_bytes();
        bytes.extend_from_slice(&[0xEE, 0xEE]);

        let mut data = &bytes[..];
        let mut target = Sample::default();
        target.unpack(&mut data).unwrap();
        assert_eq!(target, sample);
        assert_eq!(data, &[0xEE, 0xEE]);
    }
}
