//! Persistent drone settings and counters.

crate::wire_struct! {
    /// Lifetime flight counters.
    pub struct Count {
        pub time_system: u32,
        pub time_flight: u32,
        pub count_take_off: u16,
        pub count_landing: u16,
        pub count_accident: u16,
    }
}

crate::wire_struct! {
    /// IMU bias calibration.
    pub struct Bias {
        pub accel_x: i16,
        pub accel_y: i16,
        pub accel_z: i16,
        pub gyro_roll: i16,
        pub gyro_pitch: i16,
        pub gyro_yaw: i16,
    }
}

crate::wire_struct! {
    pub struct Trim {
        pub roll: i16,
        pub pitch: i16,
        pub yaw: i16,
        pub throttle: i16,
    }
}

crate::wire_struct! {
    pub struct Weight {
        pub weight: f32,
    }
}
