//! LED control.

crate::wire_enum! {
    /// LED modes. Controllers only accept the `None` and `Body*` entries.
    pub enum LightModes: u8 {
        #[default]
        None = 0x00,

        RearNone = 0x10,
        RearManual = 0x11,
        RearHold = 0x12,
        RearFlicker = 0x13,
        RearFlickerDouble = 0x14,
        RearDimming = 0x15,
        RearSunrise = 0x16,
        RearSunset = 0x17,

        BodyNone = 0x20,
        BodyManual = 0x21,
        BodyHold = 0x22,
        BodyFlicker = 0x23,
        BodyFlickerDouble = 0x24,
        BodyDimming = 0x25,
        BodySunrise = 0x26,
        BodySunset = 0x27,
        BodyRainbow = 0x28,
        BodyRainbow2 = 0x29,

        ANone = 0x30,
        AManual = 0x31,
        AHold = 0x32,
        AFlicker = 0x33,
        AFlickerDouble = 0x34,
        ADimming = 0x35,
        ASunrise = 0x36,
        ASunset = 0x37,

        BNone = 0x40,
        BManual = 0x41,
        BHold = 0x42,
        BFlicker = 0x43,
        BFlickerDouble = 0x44,
        BDimming = 0x45,
        BSunrise = 0x46,
        BSunset = 0x47,
    }
}

impl LightModes {
    pub fn is_controller_mode(self) -> bool {
        self == LightModes::None || (0x20..=0x29).contains(&self.value())
    }
}

/// Bit flags for [`LightManual::flags`].
pub mod flags {
    pub const DRONE_REAR: u16 = 0x0001;
    pub const DRONE_BODY_RED: u16 = 0x0002;
    pub const DRONE_BODY_GREEN: u16 = 0x0004;
    pub const DRONE_BODY_BLUE: u16 = 0x0008;
    pub const DRONE_A: u16 = 0x0010;
    pub const DRONE_B: u16 = 0x0020;

    pub const CONTROLLER_BODY_RED: u16 = 0x0001;
    pub const CONTROLLER_BODY_GREEN: u16 = 0x0002;
    pub const CONTROLLER_BODY_BLUE: u16 = 0x0004;
}

crate::wire_struct! {
    pub struct Color {
        pub r: u8,
        pub g: u8,
        pub b: u8,
    }
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

crate::wire_struct! {
    pub struct LightManual {
        pub flags: u16,
        pub brightness: u8,
    }
}

crate::wire_struct! {
    pub struct LightMode {
        pub mode: LightModes,
        pub interval: u16,
    }
}

crate::wire_struct! {
    pub struct LightEvent {
        pub event: u8,
        pub interval: u16,
        pub repeat: u8,
    }
}

crate::wire_struct! {
    /// Power-on LED mode with its color.
    pub struct LightDefault {
        pub mode: LightModes,
        pub interval: u16,
        pub color: Color,
    }
}
