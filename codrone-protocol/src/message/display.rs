//! Controller display drawing commands.
//!
//! Coordinates are in pixels on the controller's 128x64 monochrome screen.

use crate::codec::{get_text, Serializable, WireField};
use crate::error::ProtocolError;
use bytes::{Buf, BufMut};
use serde::Serialize;

crate::wire_enum! {
    pub enum DisplayPixel: u8 {
        #[default]
        Black = 0x00,
        White = 0x01,
        Inverse = 0x02,
        Outline = 0x03,
    }
}

crate::wire_enum! {
    pub enum DisplayLine: u8 {
        #[default]
        Solid = 0x00,
        Dotted = 0x01,
        Dashed = 0x02,
    }
}

crate::wire_enum! {
    pub enum DisplayFont: u8 {
        #[default]
        LiberationMono5x8 = 0x00,
        LiberationMono10x16 = 0x01,
    }
}

crate::wire_enum! {
    pub enum DisplayAlign: u8 {
        #[default]
        Left = 0x00,
        Center = 0x01,
        Right = 0x02,
    }
}

crate::wire_struct! {
    pub struct DisplayClearAll {
        pub pixel: DisplayPixel,
    }
}

crate::wire_struct! {
    pub struct DisplayClear {
        pub x: i16,
        pub y: i16,
        pub width: i16,
        pub height: i16,
        pub pixel: DisplayPixel,
    }
}

crate::wire_struct! {
    pub struct DisplayInvert {
        pub x: i16,
        pub y: i16,
        pub width: i16,
        pub height: i16,
    }
}

crate::wire_struct! {
    pub struct DisplayDrawPoint {
        pub x: i16,
        pub y: i16,
        pub pixel: DisplayPixel,
    }
}

crate::wire_struct! {
    pub struct DisplayDrawLine {
        pub x1: i16,
        pub y1: i16,
        pub x2: i16,
        pub y2: i16,
        pub pixel: DisplayPixel,
        pub line: DisplayLine,
    }
}

crate::wire_struct! {
    pub struct DisplayDrawRect {
        pub x: i16,
        pub y: i16,
        pub width: i16,
        pub height: i16,
        pub pixel: DisplayPixel,
        pub flag_fill: bool,
        pub line: DisplayLine,
    }
}

crate::wire_struct! {
    pub struct DisplayDrawCircle {
        pub x: i16,
        pub y: i16,
        pub radius: i16,
        pub pixel: DisplayPixel,
        pub flag_fill: bool,
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DisplayDrawString {
    pub x: i16,
    pub y: i16,
    pub font: DisplayFont,
    pub pixel: DisplayPixel,
    pub text: String,
}

impl DisplayDrawString {
    const PREFIX: usize = 6;
}

impl Serializable for DisplayDrawString {
    fn size(&self) -> usize {
        Self::PREFIX + self.text.len()
    }

    fn pack<B: BufMut>(&self, buf: &mut B) {
        self.x.put(buf);
        self.y.put(buf);
        self.font.put(buf);
        self.pixel.put(buf);
        buf.put_slice(self.text.as_bytes());
    }

    fn unpack<B: Buf>(&mut self, buf: &mut B) -> Result<(), ProtocolError> {
        crate::codec::ensure_remaining(buf, Self::PREFIX)?;
        let x = i16::get(buf)?;
        let y = i16::get(buf)?;
        let font = DisplayFont::get(buf)?;
        let pixel = DisplayPixel::get(buf)?;
        let text = get_text(buf)?;
        *self = Self {
            x,
            y,
            font,
            pixel,
            text,
        };
        Ok(())
    }
}

/// Draws text aligned between `x_start` and `x_end`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DisplayDrawStringAlign {
    pub x_start: i16,
    pub x_end: i16,
    pub y: i16,
    pub align: DisplayAlign,
    pub font: DisplayFont,
    pub pixel: DisplayPixel,
    pub text: String,
}

impl DisplayDrawStringAlign {
    const PREFIX: usize = 9;
}

impl Serializable for DisplayDrawStringAlign {
    fn size(&self) -> usize {
        Self::PREFIX + self.text.len()
    }

    fn pack<B: BufMut>(&self, buf: &mut B) {
        self.x_start.put(buf);
        self.x_end.put(buf);
        self.y.put(buf);
        self.align.put(buf);
        self.font.put(buf);
        self.pixel.put(buf);
        buf.put_slice(self.text.as_bytes());
    }

    fn unpack<B: Buf>(&mut self, buf: &mut B) -> Result<(), ProtocolError> {
        crate::codec::ensure_remaining(buf, Self::PREFIX)?;
        let x_start = i16::get(buf)?;
        let x_end = i16::get(buf)?;
        let y = i16::get(buf)?;
        let align = DisplayAlign::get(buf)?;
        let font = DisplayFont::get(buf)?;
        let pixel = DisplayPixel::get(buf)?;
        let text = get_text(buf)?;
        *self = Self {
            x_start,
            x_end,
            y,
            align,
            font,
            pixel,
            text,
        };
        Ok(())
    }
}

/// Raw 1-bit image, rows packed MSB first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DisplayDrawImage {
    pub x: i16,
    pub y: i16,
    pub width: i16,
    pub height: i16,
    pub image: Vec<u8>,
}

impl DisplayDrawImage {
    const PREFIX: usize = 8;
}

impl Serializable for DisplayDrawImage {
    fn size(&self) -> usize {
        Self::PREFIX + self.image.len()
    }

    fn pack<B: BufMut>(&self, buf: &mut B) {
        self.x.put(buf);
        self.y.put(buf);
        self.width.put(buf);
        self.height.put(buf);
        buf.put_slice(&self.image);
    }

    fn unpack<B: Buf>(&mut self, buf: &mut B) -> Result<(), ProtocolError> {
        crate::codec::ensure_remaining(buf, Self::PREFIX)?;
        self.x = i16::get(buf)?;
        self.y = i16::get(buf)?;
        self.width = i16::get(buf)?;
        self.height = i16::get(buf)?;
        self.image = buf.copy_to_bytes(buf.remaining()).to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_sizes() {
        assert_eq!(DisplayClearAll::SIZE, 1);
        assert_eq!(DisplayClear::SIZE, 9);
        assert_eq!(DisplayInvert::SIZE, 8);
        assert_eq!(DisplayDrawPoint::SIZE, 5);
        assert_eq!(DisplayDrawLine::SIZE, 10);
        assert_eq!(DisplayDrawRect::SIZE, 11);
        assert_eq!(DisplayDrawCircle::SIZE, 8);
    }

    #[test]
    fn test_draw_string() {
        let draw = DisplayDrawString {
            x: 10,
            y: 20,
            font: DisplayFont::LiberationMono10x16,
            pixel: DisplayPixel::White,
            text: "Hi".to_string(),
        };
        assert_eq!(draw.size(), 8);
        let bytes = draw.to_bytes();
        assert_eq!(&bytes[..], &[0x0A, 0x00, 0x14, 0x00, 0x01, 0x01, b'H', b'i']);
        assert_eq!(DisplayDrawString::from_bytes(&bytes).unwrap(), draw);
    }

    #[test]
    fn test_draw_string_align() {
        let draw = DisplayDrawStringAlign {
            x_start: 0,
            x_end: 127,
            y: 30,
            align: DisplayAlign::Center,
            text: "CoDrone".to_string(),
            ..Default::default()
        };
        let bytes = draw.to_bytes();
        assert_eq!(bytes.len(), 9 + 7);
        assert_eq!(bytes[6], 0x01);
        assert_eq!(DisplayDrawStringAlign::from_bytes(&bytes).unwrap(), draw);
    }

    #[test]
    fn test_draw_string_short_prefix() {
        let err = DisplayDrawString::from_bytes(&[0x00, 0x00, 0x00]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::SizeMismatch {
                expected: 6,
                actual: 3
            }
        );
    }

    #[test]
    fn test_draw_image() {
        let image = DisplayDrawImage {
            x: 0,
            y: 0,
            width: 8,
            height: 2,
            image: vec![0xFF, 0x81],
        };
        let bytes = image.to_bytes();
        assert_eq!(bytes.len(), 10);
        assert_eq!(&bytes[8..], &[0xFF, 0x81]);
        assert_eq!(DisplayDrawImage::from_bytes(&bytes).unwrap(), image);
    }

    #[test]
    fn test_draw_rect_fill() {
        let rect = DisplayDrawRect {
            x: 1,
            y: 2,
            width: 30,
            height: 40,
            pixel: DisplayPixel::Inverse,
            flag_fill: true,
            line: DisplayLine::Dashed,
        };
        let bytes = rect.to_bytes();
        assert_eq!(&bytes[8..], &[0x02, 0x01, 0x02]);
        assert_eq!(DisplayDrawRect::from_bytes(&bytes).unwrap(), rect);
    }
}
