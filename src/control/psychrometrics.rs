//! Moist-air helpers.

/// Magnus coefficient `b` (dimensionless), valid roughly -45..60 °C.
const MAGNUS_B: f32 = 17.62;
/// Magnus coefficient `c` (°C).
const MAGNUS_C: f32 = 243.12;

/// Dew point in °C from dry-bulb temperature and relative humidity using the
/// Magnus approximation.  Humidity is clamped to 1..=100 % so a dry or
/// saturated reading cannot produce `-inf` or `NaN`.
pub fn dew_point_c(temperature_c: f32, humidity_pct: f32) -> f32 {
    let rh = humidity_pct.clamp(1.0, 100.0);
    let gamma = (rh / 100.0).ln() + (MAGNUS_B * temperature_c) / (MAGNUS_C + temperature_c);
    MAGNUS_C * gamma / (MAGNUS_B - gamma)
}

/// Headroom between the air temperature and its dew point.
pub fn dew_point_margin_c(temperature_c: f32, humidity_pct: f32) -> f32 {
    temperature_c - dew_point_c(temperature_c, humidity_pct)
}
