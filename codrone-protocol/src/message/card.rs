//! Color card reader on the underside of the drone.
//!
//! Two color sensors (front and rear) are sampled; arrays indexed `[2]`
//! carry one entry per sensor.

crate::wire_struct! {
    /// Classification thresholds: six colors by three channels by min/max.
    pub struct CardClassify {
        pub index: u8,
        pub cc: [[[i8; 2]; 3]; 6],
        pub l: [i8; 2],
    }
}

crate::wire_struct! {
    /// Calibrated RGB range per sensor: `[sensor][channel][min, max]`.
    pub struct CardRange {
        pub range: [[[i16; 2]; 3]; 2],
    }
}

crate::wire_struct! {
    pub struct CardRaw {
        pub rgb_raw: [[i16; 3]; 2],
        pub rgb: [[u8; 3]; 2],
        pub hsvl: [[i16; 4]; 2],
        pub color: [u8; 2],
        pub card: u8,
    }
}

crate::wire_struct! {
    /// Hue, saturation, value and lightness per sensor plus classified colors.
    pub struct CardColor {
        pub hsvl: [[i16; 4]; 2],
        pub color: [u8; 2],
        pub card: u8,
    }
}

crate::wire_struct! {
    pub struct CardList {
        pub index: u8,
        pub size: u8,
        pub card_index: u8,
        pub card: [u8; 12],
    }
}

impl CardList {
    /// Cards recorded so far, capped at the list capacity.
    pub fn cards(&self) -> &[u8] {
        let len = usize::from(self.size).min(self.card.len());
        &self.card[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Serializable;

    #[test]
    fn test_sizes() {
        assert_eq!(CardClassify::SIZE, 39);
        assert_eq!(CardRange::SIZE, 24);
        assert_eq!(CardRaw::SIZE, 37);
        assert_eq!(CardColor::SIZE, 19);
        assert_eq!(CardList::SIZE, 15);
    }

    #[test]
    fn test_card_color_layout() {
        let mut color = CardColor::default();
        color.hsvl[0] = [359, 100, 80, 50];
        color.hsvl[1] = [-1, 0, 0, 0];
        color.color = [3, 4];
        color.card = 0x21;

        let bytes = color.to_bytes();
        assert_eq!(&bytes[0..2], &[0x67, 0x01]);
        assert_eq!(&bytes[8..10], &[0xFF, 0xFF]);
        assert_eq!(&bytes[16..], &[3, 4, 0x21]);
        assert_eq!(CardColor::from_bytes(&bytes).unwrap(), color);
    }

    #[test]
    fn test_card_classify_order() {
        let mut bytes = [0u8; 39];
        bytes[0] = 2;
        bytes[1] = 0xF6; // cc[0][0][0]
        bytes[2] = 0x0A; // cc[0][0][1]
        bytes[36] = 0x05; // cc[5][2][1]
        bytes[37] = 0x01;
        bytes[38] = 0x7F;
        let classify = CardClassify::from_bytes(&bytes).unwrap();
        assert_eq!(classify.index, 2);
        assert_eq!(classify.cc[0][0], [-10, 10]);
        assert_eq!(classify.cc[5][2][1], 5);
        assert_eq!(classify.l, [1, 127]);
    }

    #[test]
    fn test_card_list_cards() {
        let mut list = CardList {
            size: 3,
            ..Default::default()
        };
        list.card[..3].copy_from_slice(&[7, 8, 9]);
        assert_eq!(list.cards(), &[7, 8, 9]);

        list.size = 200;
        assert_eq!(list.cards().len(), 12);
    }
}
