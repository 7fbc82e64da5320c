//! Travel time request/response model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Categorical input encoded as a fixed integer code on the wire.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($variant = $code),+
        }

        impl $name {
            /// Every valid code, in ascending order
            pub const CODES: &'static [u8] = &[$($code),+];

            pub fn code(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = String;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    other => Err(format!(
                        "{} must be one of {:?}, got {}",
                        $field,
                        Self::CODES,
                        other
                    )),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.code()
            }
        }
    };
}

coded_enum! {
    /// Weather on the route
    Weather, "weather" {
        Clear = 0,
        Cloudy = 1,
        Rainy = 2,
        Foggy = 3,
    }
}

coded_enum! {
    /// Travel direction relative to Lagos
    Direction, "direction" {
        ToLagos = 0,
        FromLagos = 1,
    }
}

coded_enum! {
    /// Traffic congestion on the route
    CongestionLevel, "congestion_level" {
        Low = 1,
        Medium = 2,
        High = 3,
    }
}

/// Body of `POST /predict-time`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TravelInput {
    /// Length of the road segment in kilometers
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub road_length_km: f64,

    pub weather: Weather,

    pub direction: Direction,

    pub congestion_level: CongestionLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelPrediction {
    pub predicted_travel_time_min: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_valid_input() {
        let input: TravelInput = serde_json::from_value(json!({
            "road_length_km": 12.5,
            "weather": 2,
            "direction": 1,
            "congestion_level": 3
        }))
        .unwrap();

        assert_eq!(input.road_length_km, 12.5);
        assert_eq!(input.weather, Weather::Rainy);
        assert_eq!(input.direction, Direction::FromLagos);
        assert_eq!(input.congestion_level, CongestionLevel::High);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_integer_road_length_accepted() {
        let input: TravelInput = serde_json::from_value(json!({
            "road_length_km": 7,
            "weather": 0,
            "direction": 0,
            "congestion_level": 1
        }))
        .unwrap();
        assert_eq!(input.road_length_km, 7.0);
    }

    #[test]
    fn test_out_of_domain_codes_rejected() {
        let err = serde_json::from_value::<TravelInput>(json!({
            "road_length_km": 3.0,
            "weather": 4,
            "direction": 0,
            "congestion_level": 1
        }))
        .unwrap_err();
        assert!(err.to_string().contains("weather must be one of [0, 1, 2, 3]"));

        assert!(CongestionLevel::try_from(0).is_err());
        assert!(Direction::try_from(2).is_err());
    }

    #[test]
    fn test_float_code_rejected() {
        let result = serde_json::from_value::<TravelInput>(json!({
            "road_length_km": 3.0,
            "weather": 1.0,
            "direction": 0,
            "congestion_level": 1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_length_fails_validation() {
        for length in [0.0, -4.2] {
            let input = TravelInput {
                road_length_km: length,
                weather: Weather::Clear,
                direction: Direction::ToLagos,
                congestion_level: CongestionLevel::Low,
            };
            assert!(input.validate().is_err(), "{} should be rejected", length);
        }
    }

    #[test]
    fn test_prediction_wire_shape() {
        let body = serde_json::to_value(TravelPrediction { predicted_travel_time_min: 41.27 }).unwrap();
        assert_eq!(body, json!({ "predicted_travel_time_min": 41.27 }));
    }
}
