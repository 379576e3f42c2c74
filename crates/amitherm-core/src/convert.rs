// ── Vocabulary conversions ──
//
// Maps between the presented vocabulary (HVAC modes, fan percentages)
// and the PLC vocabulary (heating modes, seasons, ventilation modes).
//
// Percentage convention: `Off` maps to 0 in both directions. The two
// percentage functions are exact inverses over {Off, Low, Medium,
// High}; `Auto` has no percentage and is only reachable through the
// preset channel.

use amitherm_api::{FanSpeed, HeatingMode, Season};
use strum::{Display, EnumString};

use crate::error::CoreError;

/// Presented climate mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum HvacMode {
    Off,
    Heat,
    /// Follow the PLC's weekly schedule.
    Auto,
}

/// The ordered fan speeds addressable by percentage. `Off` sits below
/// the scale at 0%; `Auto` is not on it at all.
pub const ORDERED_FAN_SPEEDS: [FanSpeed; 3] = [FanSpeed::Low, FanSpeed::Medium, FanSpeed::High];

/// Map a fan speed onto the 0-100 scale: Off=0, Low=33, Medium=66,
/// High=100.
pub fn speed_to_percentage(speed: FanSpeed) -> u8 {
    match ORDERED_FAN_SPEEDS.iter().position(|s| *s == speed) {
        // Truncating division keeps the values on the same grid the
        // inverse expects.
        #[allow(clippy::cast_possible_truncation)]
        Some(index) => ((index + 1) * 100 / ORDERED_FAN_SPEEDS.len()) as u8,
        None => 0, // Off
    }
}

/// Map a 0-100 percentage onto the nearest named speed (0 means Off).
/// Values above 100 are rejected before any network call.
pub fn percentage_to_speed(percentage: u8) -> Result<FanSpeed, CoreError> {
    if percentage > 100 {
        return Err(CoreError::UnsupportedValue {
            field: "percentage",
            reason: format!("{percentage} is not within 0..=100"),
        });
    }
    if percentage == 0 {
        return Ok(FanSpeed::Off);
    }
    let index = (usize::from(percentage) * ORDERED_FAN_SPEEDS.len()).div_ceil(100) - 1;
    Ok(ORDERED_FAN_SPEEDS[index])
}

// ── Heating circuit ──────────────────────────────────────────────────

pub fn hvac_to_heating_mode(mode: HvacMode) -> HeatingMode {
    match mode {
        HvacMode::Off => HeatingMode::Minimal,
        HvacMode::Heat => HeatingMode::Comfort,
        HvacMode::Auto => HeatingMode::Scheduled,
    }
}

pub fn heating_to_hvac_mode(mode: HeatingMode) -> HvacMode {
    match mode {
        HeatingMode::Minimal => HvacMode::Off,
        HeatingMode::Comfort => HvacMode::Heat,
        HeatingMode::Scheduled => HvacMode::Auto,
    }
}

// ── Ventilation unit (season-driven) ─────────────────────────────────

/// The ventilation unit heats intake air only during the winter season.
pub fn season_to_hvac_mode(season: Season) -> HvacMode {
    match season {
        Season::Winter => HvacMode::Heat,
        Season::Summer => HvacMode::Off,
    }
}

pub fn hvac_mode_to_season(mode: HvacMode) -> Season {
    match mode {
        HvacMode::Heat => Season::Winter,
        HvacMode::Off | HvacMode::Auto => Season::Summer,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn percentage_round_trips_every_named_speed() {
        for speed in [FanSpeed::Off, FanSpeed::Low, FanSpeed::Medium, FanSpeed::High] {
            let pct = speed_to_percentage(speed);
            assert_eq!(
                percentage_to_speed(pct).unwrap(),
                speed,
                "speed {speed} did not survive the round trip via {pct}%"
            );
        }
    }

    #[test]
    fn zero_percent_is_off_in_both_directions() {
        assert_eq!(speed_to_percentage(FanSpeed::Off), 0);
        assert_eq!(percentage_to_speed(0).unwrap(), FanSpeed::Off);
    }

    #[test]
    fn fifty_percent_is_the_midpoint_speed() {
        assert_eq!(percentage_to_speed(50).unwrap(), FanSpeed::Medium);
    }

    #[test]
    fn boundaries_map_to_expected_speeds() {
        assert_eq!(percentage_to_speed(1).unwrap(), FanSpeed::Low);
        assert_eq!(percentage_to_speed(33).unwrap(), FanSpeed::Low);
        assert_eq!(percentage_to_speed(34).unwrap(), FanSpeed::Medium);
        assert_eq!(percentage_to_speed(100).unwrap(), FanSpeed::High);
    }

    #[test]
    fn percentage_above_hundred_is_rejected() {
        assert!(matches!(
            percentage_to_speed(101),
            Err(CoreError::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn heating_mode_maps_are_inverses() {
        for mode in [HvacMode::Off, HvacMode::Heat, HvacMode::Auto] {
            assert_eq!(heating_to_hvac_mode(hvac_to_heating_mode(mode)), mode);
        }
    }

    #[test]
    fn winter_means_heating() {
        assert_eq!(season_to_hvac_mode(Season::Winter), HvacMode::Heat);
        assert_eq!(season_to_hvac_mode(Season::Summer), HvacMode::Off);
        assert_eq!(hvac_mode_to_season(HvacMode::Heat), Season::Winter);
    }
}
