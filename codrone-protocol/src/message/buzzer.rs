//! Buzzer tones.

crate::wire_enum! {
    /// `*Reserve` variants queue the tone instead of interrupting the current one.
    pub enum BuzzerMode: u8 {
        #[default]
        Stop = 0,
        Mute = 1,
        MuteReserve = 2,
        Scale = 3,
        ScaleReserve = 4,
        Hz = 5,
        HzReserve = 6,
    }
}

crate::wire_struct! {
    /// `value` is a scale index or a frequency depending on `mode`; `time` is in ms.
    pub struct Buzzer {
        pub mode: BuzzerMode,
        pub value: u16,
        pub time: u16,
    }
}

impl Buzzer {
    pub fn hz(frequency: u16, millis: u16) -> Self {
        Self {
            mode: BuzzerMode::Hz,
            value: frequency,
            time: millis,
        }
    }

    pub fn mute(millis: u16) -> Self {
        Self {
            mode: BuzzerMode::Mute,
            value: 0xEE,
            time: millis,
        }
    }
}
