//! Device status sources: clock, date and battery.

pub mod battery;
pub mod clock;

pub use battery::BatteryMonitor;
pub use clock::{delay_to_next_day, delay_to_next_minute, Cadence, ClockTicker};

/// Battery charge in percent plus whether it is charging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryStatus {
    pub percentage: u8,
    pub is_charging: bool,
}

/// Everything the status line shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceStatus {
    pub time: String,
    pub date: String,
    pub battery_percentage: u8,
    pub is_charging: bool,
}

impl DeviceStatus {
    pub fn combine(time: &str, date: &str, battery: BatteryStatus) -> Self {
        Self {
            time: time.to_string(),
            date: date.to_string(),
            battery_percentage: battery.percentage,
            is_charging: battery.is_charging,
        }
    }
}
