//! Drone status and sensor telemetry.

use crate::system::{
    Headless, ModeControlFlight, ModeFlight, ModeMovement, ModeSystem, SensorOrientation,
};

crate::wire_struct! {
    /// Overall drone state, including battery percentage.
    pub struct State {
        pub mode_system: ModeSystem,
        pub mode_flight: ModeFlight,
        pub mode_control_flight: ModeControlFlight,
        pub mode_movement: ModeMovement,
        pub headless: Headless,
        pub control_speed: u8,
        pub sensor_orientation: SensorOrientation,
        pub battery: u8,
    }
}

crate::wire_struct! {
    /// Unfiltered IMU samples.
    pub struct RawMotion {
        pub accel_x: i16,
        pub accel_y: i16,
        pub accel_z: i16,
        pub gyro_roll: i16,
        pub gyro_pitch: i16,
        pub gyro_yaw: i16,
    }
}

crate::wire_struct! {
    pub struct RawFlow {
        pub x: f32,
        pub y: f32,
    }
}

crate::wire_struct! {
    /// Orientation in degrees.
    pub struct Attitude {
        pub roll: i16,
        pub pitch: i16,
        pub yaw: i16,
    }
}

crate::wire_struct! {
    /// Position estimate in metres.
    pub struct Position {
        pub x: f32,
        pub y: f32,
        pub z: f32,
    }
}

crate::wire_struct! {
    pub struct Altitude {
        pub temperature: f32,
        pub pressure: f32,
        pub altitude: f32,
        pub range_height: f32,
    }
}

crate::wire_struct! {
    /// Filtered IMU: acceleration, angular rate and angle.
    pub struct Motion {
        pub accel_x: i16,
        pub accel_y: i16,
        pub accel_z: i16,
        pub gyro_roll: i16,
        pub gyro_pitch: i16,
        pub gyro_yaw: i16,
        pub angle_roll: i16,
        pub angle_pitch: i16,
        pub angle_yaw: i16,
    }
}

crate::wire_struct! {
    /// Distance sensors in millimetres.
    pub struct Range {
        pub left: i16,
        pub front: i16,
        pub right: i16,
        pub rear: i16,
        pub top: i16,
        pub bottom: i16,
    }
}

crate::wire_struct! {
    pub struct Flow {
        pub x: f32,
        pub y: f32,
        pub z: f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Serializable;
    use proptest::prelude::*;

    #[test]
    fn test_sizes() {
        assert_eq!(State::SIZE, 8);
        assert_eq!(RawMotion::SIZE, 12);
        assert_eq!(RawFlow::SIZE, 8);
        assert_eq!(Attitude::SIZE, 6);
        assert_eq!(Position::SIZE, 12);
        assert_eq!(Altitude::SIZE, 16);
        assert_eq!(Motion::SIZE, 18);
        assert_eq!(Range::SIZE, 12);
        assert_eq!(Flow::SIZE, 12);
    }

    #[test]
    fn test_state_decode() {
        let state =
            State::from_bytes(&[0x12, 0x13, 0x10, 0x01, 0x02, 0x03, 0x01, 0x55]).unwrap();
        assert_eq!(state.mode_system, ModeSystem::Running);
        assert_eq!(state.mode_flight, ModeFlight::Flight);
        assert_eq!(state.mode_control_flight, ModeControlFlight::Attitude);
        assert_eq!(state.mode_movement, ModeMovement::Ready);
        assert_eq!(state.headless, Headless::Normal);
        assert_eq!(state.control_speed, 3);
        assert_eq!(state.sensor_orientation, SensorOrientation::Normal);
        assert_eq!(state.battery, 85);
    }

    #[test]
    fn test_state_unknown_mode() {
        let err = State::from_bytes(&[0x12, 0x99, 0x10, 0x01, 0x02, 0x03, 0x01, 0x55])
            .unwrap_err();
        assert!(err.to_string().contains("ModeFlight"));
    }

    #[test]
    fn test_attitude_negative_angles() {
        let attitude = Attitude {
            roll: -45,
            pitch: 10,
            yaw: i16::MIN,
        };
        let bytes = attitude.to_bytes();
        assert_eq!(&bytes[..], &[0xD3, 0xFF, 0x0A, 0x00, 0x00, 0x80]);
        assert_eq!(Attitude::from_bytes(&bytes).unwrap(), attitude);
    }

    #[test]
    fn test_position_float_layout() {
        let position = Position {
            x: 1.0,
            y: -0.5,
            z: 0.0,
        };
        let bytes = position.to_bytes();
        assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x80, 0x3F]);
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0xBF]);
        assert_eq!(Position::from_bytes(&bytes).unwrap(), position);
    }

    proptest! {
        #[test]
        fn prop_motion_roundtrip(values in proptest::array::uniform9(any::<i16>())) {
            let motion = Motion {
                accel_x: values[0],
                accel_y: values[1],
                accel_z: values[2],
                gyro_roll: values[3],
                gyro_pitch: values[4],
                gyro_yaw: values[5],
                angle_roll: values[6],
                angle_pitch: values[7],
                angle_yaw: values[8],
            };
            let bytes = motion.to_bytes();
            prop_assert_eq!(bytes.len(), Motion::SIZE);
            prop_assert_eq!(Motion::from_bytes(&bytes).unwrap(), motion);
        }

        #[test]
        fn prop_altitude_roundtrip(
            temperature in -40.0f32..85.0,
            pressure in 30000.0f32..110000.0,
            altitude in -100.0f32..9000.0,
            range_height in 0.0f32..2.0,
        ) {
            let value = Altitude { temperature, pressure, altitude, range_height };
            prop_assert_eq!(Altitude::from_bytes(&value.to_bytes()).unwrap(), value);
        }
    }
}
