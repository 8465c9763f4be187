//! Drone system enumerations: flight modes, firmware update state, model
//! numbers and command kinds.

crate::wire_enum! {
    pub enum ModeSystem: u8 {
        #[default]
        None = 0x00,
        Boot = 0x10,
        Start = 0x11,
        Running = 0x12,
        ReadyToReset = 0x13,
        Error = 0xA0,
    }
}

crate::wire_enum! {
    pub enum ModeFlight: u8 {
        #[default]
        None = 0x00,
        Ready = 0x10,
        Start = 0x11,
        TakeOff = 0x12,
        Flight = 0x13,
        Landing = 0x14,
        Flip = 0x15,
        Reverse = 0x16,
        Stop = 0x20,
        Accident = 0x30,
        Error = 0x31,
        Test = 0x40,
    }
}

impl ModeFlight {
    /// Whether the drone is off the ground or transitioning to/from it.
    pub fn is_airborne(self) -> bool {
        matches!(
            self,
            ModeFlight::TakeOff
                | ModeFlight::Flight
                | ModeFlight::Landing
                | ModeFlight::Flip
                | ModeFlight::Reverse
        )
    }
}

crate::wire_enum! {
    pub enum ModeControlFlight: u8 {
        #[default]
        None = 0x00,
        Attitude = 0x10,
        Position = 0x11,
        Manual = 0x12,
        Rate = 0x13,
        Function = 0x14,
    }
}

crate::wire_enum! {
    pub enum ModeMovement: u8 {
        #[default]
        None = 0x00,
        Ready = 0x01,
        Hovering = 0x02,
        Moving = 0x03,
        ReturnHome = 0x04,
    }
}

crate::wire_enum! {
    pub enum Headless: u8 {
        #[default]
        None = 0x00,
        Headless = 0x01,
        Normal = 0x02,
    }
}

crate::wire_enum! {
    pub enum SensorOrientation: u8 {
        #[default]
        None = 0x00,
        Normal = 0x01,
        ReverseStart = 0x02,
        Reversed = 0x03,
    }
}

crate::wire_enum! {
    /// Firmware update state reported in `Information`.
    pub enum ModeUpdate: u8 {
        #[default]
        None = 0x00,
        Ready = 0x01,
        Updating = 0x02,
        Complete = 0x03,
        Failed = 0x04,
        NotAvailable = 0x05,
        RunApplication = 0x06,
        NotRegistered = 0x07,
    }
}

crate::wire_enum! {
    /// Hardware model, encoded as `0x00GGDRRR` (generation, device role, revision).
    pub enum ModelNumber: u32 {
        #[default]
        None = 0x0000_0000,

        Drone3DroneP1 = 0x0003_1001,
        Drone3DroneP2 = 0x0003_1002,
        Drone3DroneP3 = 0x0003_1003,
        Drone3DroneP4 = 0x0003_1004,
        Drone3DroneP5 = 0x0003_1005,
        Drone3DroneP6 = 0x0003_1006,
        Drone3DroneP7 = 0x0003_1007,
        Drone3DroneP8 = 0x0003_1008,
        Drone3DroneP9 = 0x0003_1009,
        Drone3DroneP10 = 0x0003_100A,
        Drone3ControllerP1 = 0x0003_2001,
        Drone3ControllerP2 = 0x0003_2002,
        Drone3ControllerP3 = 0x0003_2003,
        Drone3ControllerP4 = 0x0003_2004,
        Drone3ControllerP5 = 0x0003_2005,
        Drone3LinkP0 = 0x0003_3000,
        Drone3TesterP4 = 0x0003_A004,
        Drone3TesterP5 = 0x0003_A005,
        Drone3TesterP6 = 0x0003_A006,
        Drone3MonitorP4 = 0x0003_A104,
        Drone3MonitorP5 = 0x0003_A105,

        Drone4DroneP4 = 0x0004_1004,
        Drone4DroneP5 = 0x0004_1005,
        Drone4DroneP6 = 0x0004_1006,
        Drone4DroneP7 = 0x0004_1007,
        Drone4ControllerP1 = 0x0004_2001,
        Drone4ControllerP2 = 0x0004_2002,
        Drone4ControllerP3 = 0x0004_2003,
        Drone4ControllerP4 = 0x0004_2004,
        Drone4LinkP0 = 0x0004_3000,
        Drone4TesterP4 = 0x0004_A004,
        Drone4TesterP6 = 0x0004_A006,
        Drone4TesterP7 = 0x0004_A007,
        Drone4MonitorP4 = 0x0004_A104,

        Drone7DroneP1 = 0x0007_1001,
        Drone7DroneP2 = 0x0007_1002,
        Drone7BleClientP0 = 0x0007_3200,
        Drone7BleClientP5 = 0x0007_3205,
        Drone7BleServerP2 = 0x0007_3302,

        Drone8DroneP0 = 0x0008_1000,
        Drone8DroneP1 = 0x0008_1001,
        Drone8TesterP4 = 0x0008_A004,
        Drone8TesterP6 = 0x0008_A006,
        Drone8MonitorP6 = 0x0008_A106,

        Drone9DroneP0 = 0x0009_1000,
        Drone9DroneP1 = 0x0009_1001,
        Drone9DroneP2 = 0x0009_1002,
        Drone9TesterP6 = 0x0009_A006,

        Drone12DroneP1 = 0x000C_1002,
        Drone12ControllerP1 = 0x000C_2001,
    }
}

impl ModelNumber {
    /// Product generation (the `GG` byte).
    pub fn generation(self) -> u8 {
        ((self.value() >> 16) & 0xFF) as u8
    }

    /// Device role nibble: 1 drone, 2 controller, 3 link, 0xA tester/monitor.
    pub fn role(self) -> u8 {
        ((self.value() >> 12) & 0x0F) as u8
    }
}

crate::wire_enum! {
    pub enum CommandType: u8 {
        #[default]
        None = 0x00,

        Stop = 0x01,
        ModeControlFlight = 0x02,
        Headless = 0x03,
        ControlSpeed = 0x04,
        ClearBias = 0x05,
        ClearTrim = 0x06,
        FlightEvent = 0x07,
        SetDefault = 0x08,
        Backlight = 0x09,
        ModeController = 0x0A,
        Link = 0x0B,

        ClearCounter = 0xA0,

        NavigationTargetClear = 0xE0,
        NavigationStart = 0xE1,
        NavigationPause = 0xE2,
        NavigationRestart = 0xE3,
        NavigationStop = 0xE4,
        NavigationNext = 0xE5,
        NavigationReturnToHome = 0xE6,

        GpsRtkBase = 0xEA,
        GpsRtkRover = 0xEB,
    }
}

crate::wire_enum! {
    /// Option byte for [`CommandType::FlightEvent`].
    pub enum FlightEvent: u8 {
        #[default]
        None = 0x00,
        Stop = 0x10,
        TakeOff = 0x11,
        Landing = 0x12,
        Reverse = 0x13,
        FlipFront = 0x14,
        FlipRear = 0x15,
        FlipLeft = 0x16,
        FlipRight = 0x17,
        Return = 0x18,
        Shot = 0x90,
        UnderAttack = 0x91,
        ResetHeading = 0xA0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_values() {
        assert_eq!(ModeSystem::try_from(0x12).unwrap(), ModeSystem::Running);
        assert_eq!(ModeFlight::try_from(0x10).unwrap(), ModeFlight::Ready);
        assert_eq!(ModeFlight::try_from(0x30).unwrap(), ModeFlight::Accident);
        assert_eq!(
            ModeControlFlight::try_from(0x10).unwrap(),
            ModeControlFlight::Attitude
        );
        assert_eq!(ModeMovement::try_from(0x02).unwrap(), ModeMovement::Hovering);
        assert_eq!(Headless::try_from(0x02).unwrap(), Headless::Normal);
        assert_eq!(
            SensorOrientation::try_from(0x01).unwrap(),
            SensorOrientation::Normal
        );
        assert!(ModeFlight::try_from(0x17).is_err());
        assert!(ModeMovement::try_from(0x05).is_err());
    }

    #[test]
    fn test_error_modes_from_wire() {
        assert_eq!(ModeSystem::try_from(0xA0).unwrap(), ModeSystem::Error);
        assert_eq!(ModeFlight::try_from(0x31).unwrap(), ModeFlight::Error);
        assert!(ModeSystem::try_from(0xA1).unwrap_err().is_unknown_value());
        assert!(ModeFlight::try_from(0x41).unwrap_err().is_unknown_value());
    }

    #[test]
    fn test_airborne() {
        assert!(ModeFlight::Flight.is_airborne());
        assert!(ModeFlight::TakeOff.is_airborne());
        assert!(!ModeFlight::Ready.is_airborne());
        assert!(!ModeFlight::Accident.is_airborne());
    }

    #[test]
    fn test_model_number() {
        let model = ModelNumber::try_from(0x0004_1005).unwrap();
        assert_eq!(model, ModelNumber::Drone4DroneP5);
        assert_eq!(model.generation(), 4);
        assert_eq!(model.role(), 1);

        let controller = ModelNumber::Drone12ControllerP1;
        assert_eq!(controller.generation(), 12);
        assert_eq!(controller.role(), 2);

        let err = ModelNumber::try_from(0x0004_9999).unwrap_err();
        assert!(err.to_string().contains("ModelNumber"));
    }

    #[test]
    fn test_command_type_values() {
        assert_eq!(CommandType::try_from(0x07).unwrap(), CommandType::FlightEvent);
        assert_eq!(
            CommandType::try_from(0xE6).unwrap(),
            CommandType::NavigationReturnToHome
        );
        assert_eq!(u8::from(FlightEvent::TakeOff), 0x11);
        assert_eq!(u8::from(FlightEvent::Landing), 0x12);
    }
}
