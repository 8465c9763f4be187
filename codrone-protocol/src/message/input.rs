//! Controller buttons and joysticks.

crate::wire_enum! {
    pub enum ButtonEvent: u8 {
        #[default]
        None = 0x00,
        Down = 0x01,
        Press = 0x02,
        Up = 0x03,
        EndContinuePress = 0x04,
    }
}

crate::wire_enum! {
    /// Stick position as a 3x3 grid: top/middle/bottom rows, left/middle/right columns.
    pub enum JoystickDirection: u8 {
        #[default]
        None = 0x00,

        VT = 0x10,
        VM = 0x20,
        VB = 0x40,

        HL = 0x01,
        HM = 0x02,
        HR = 0x04,

        TL = 0x11,
        TM = 0x12,
        TR = 0x14,
        ML = 0x21,
        CN = 0x22,
        MR = 0x24,
        BL = 0x41,
        BM = 0x42,
        BR = 0x44,
    }
}

crate::wire_enum! {
    pub enum JoystickEvent: u8 {
        #[default]
        None = 0x00,
        In = 0x01,
        Stay = 0x02,
        Out = 0x03,
    }
}

crate::wire_struct! {
    /// Bitmask of pressed buttons plus the triggering event.
    pub struct Button {
        pub button: u16,
        pub event: ButtonEvent,
    }
}

impl Button {
    pub fn is_pressed(&self, mask: u16) -> bool {
        self.button & mask != 0
    }
}

crate::wire_struct! {
    pub struct JoystickBlock {
        pub x: i8,
        pub y: i8,
        pub direction: JoystickDirection,
        pub event: JoystickEvent,
    }
}

crate::wire_struct! {
    pub struct Joystick {
        pub left: JoystickBlock,
        pub right: JoystickBlock,
    }
}
