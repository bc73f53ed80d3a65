use core::f64::consts::PI;

pub const TWO_PI: f64 = 2.0 * PI;

/// Gravitational acceleration (m/s^2)
pub const GRAVITY: f64 = 9.81;

/// Density difference from the reference value marking the mixed layer base (kg/m^3)
pub const DENSITY_CRITERION: f64 = 0.03;

/// Temperature difference from the reference value marking the mixed layer base (degC)
pub const TEMPERATURE_CRITERION: f64 = 0.2;

/// Simulator profile files list samples from the bottom upwards
pub const UPDOWN_BOTTOM_UP: usize = 1;
/// Simulator profile files list samples from the surface downwards
pub const UPDOWN_TOP_DOWN: usize = 2;

/// Timestamp layout shared by every simulator ASCII file
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date layout used in case names and setup labels
pub const DATE_FORMAT: &str = "%Y%m%d";
