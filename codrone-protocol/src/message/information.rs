//! Pre-assembled telemetry bundles.

crate::wire_struct! {
    /// Telemetry bundle sent to the controller's display.
    pub struct InformationAssembledForController {
        pub angle_roll: i16,
        pub angle_pitch: i16,
        pub angle_yaw: i16,
        pub rpm: i16,
        pub position_x: i16,
        pub position_y: i16,
        pub position_z: i16,
        pub speed_x: i8,
        pub speed_y: i8,
        pub range_height: u8,
        pub rssi: i8,
    }
}

crate::wire_struct! {
    /// Telemetry bundle for entry-level clients.
    pub struct InformationAssembledForEntry {
        pub angle_roll: i16,
        pub angle_pitch: i16,
        pub angle_yaw: i16,
        pub position_x: i16,
        pub position_y: i16,
        pub position_z: i16,
        pub range_height: u8,
        pub altitude: f32,
    }
}
