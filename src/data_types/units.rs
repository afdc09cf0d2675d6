use std::ops::Add;

use serde_derive::{Deserialize, Serialize};

const METERS_PER_MILE: f64 = 1609.34;
const METERS_PER_SECOND_PER_MPH: f64 = 0.44704;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Miles(pub f64);

impl Miles {
    pub fn to_meters(self) -> f64 {
        self.0 * METERS_PER_MILE
    }
}

impl Add for Miles {
    type Output = Miles;

    fn add(self, other: Miles) -> Miles {
        Miles(self.0 + other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilesPerHour(pub f64);

impl MilesPerHour {
    pub fn to_meters_per_second(self) -> f64 {
        self.0 * METERS_PER_SECOND_PER_MPH
    }

    /// Miles covered when holding this speed for `seconds`.
    pub fn distance_over(self, seconds: f64) -> Miles {
        Miles(self.0 * seconds / 3600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn conversions_use_fixed_factors() {
        assert_relative_eq!(Miles(2.0).to_meters(), 3218.68);
        assert_relative_eq!(MilesPerHour(20.0).to_meters_per_second(), 8.9408);
    }

    #[test]
    fn distance_over_one_hour_is_the_speed() {
        assert_relative_eq!(MilesPerHour(18.0).distance_over(3600.0).0, 18.0);
        assert_relative_eq!(MilesPerHour(18.0).distance_over(1.0).0, 0.005);
    }
}
