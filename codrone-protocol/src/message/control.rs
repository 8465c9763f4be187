//! Flight control and command messages.

use super::light::{Color, LightEvent};
use crate::system::{CommandType, FlightEvent};
use crate::types::DataType;

crate::wire_struct! {
    /// Stick input, each axis in `-100..=100`.
    pub struct Quad8 {
        pub roll: i8,
        pub pitch: i8,
        pub yaw: i8,
        pub throttle: i8,
    }
}

crate::wire_struct! {
    /// Stick input that also requests one frame of `data_type` back.
    pub struct Quad8AndRequestData {
        pub roll: i8,
        pub pitch: i8,
        pub yaw: i8,
        pub throttle: i8,
        pub data_type: DataType,
    }
}

crate::wire_struct! {
    pub struct ControlPosition16 {
        pub position_x: i16,
        pub position_y: i16,
        pub position_z: i16,
        pub velocity: i16,
        pub heading: i16,
        pub rotational_velocity: i16,
    }
}

crate::wire_struct! {
    /// Move to a relative position in metres at `velocity` m/s.
    pub struct ControlPosition {
        pub position_x: f32,
        pub position_y: f32,
        pub position_z: f32,
        pub velocity: f32,
        pub heading: i16,
        pub rotational_velocity: i16,
    }
}

crate::wire_struct! {
    pub struct Command {
        pub command_type: CommandType,
        pub option: u8,
    }
}

impl Command {
    pub fn new(command_type: CommandType, option: u8) -> Self {
        Self {
            command_type,
            option,
        }
    }

    pub fn flight_event(event: FlightEvent) -> Self {
        Self::new(CommandType::FlightEvent, event.value())
    }

    pub fn stop() -> Self {
        Self::new(CommandType::Stop, 0)
    }
}

crate::wire_struct! {
    pub struct CommandLightEvent {
        pub command: Command,
        pub event: LightEvent,
    }
}

crate::wire_struct! {
    pub struct CommandLightEventColor {
        pub command: Command,
        pub event: LightEvent,
        pub color: Color,
    }
}
