use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },
}

/// Gameplay tuning. Every field has a default, so a partial override in a
/// scene file only replaces what it names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Radians of yaw per pixel of horizontal mouse motion.
    pub mouse_speed: f32,
    /// Walking speed in world units per second.
    pub player_speed: f32,
    /// Stamina drained per second of sprinting and regained per idle second.
    pub stamina_rate: f32,
    /// Collision circle radius on the XZ plane.
    pub player_radius: f32,
    /// Sphere radius used to ray-test pickups.
    pub pickup_radius: f32,
    /// Maximum ray distance at which a pickup can be targeted.
    pub reach: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mouse_speed: 0.01,
            player_speed: 1.0,
            stamina_rate: 0.2,
            player_radius: 0.1,
            pickup_radius: 0.1,
            reach: 1.0,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("mouse_speed", self.mouse_speed),
            ("player_speed", self.player_speed),
            ("stamina_rate", self.stamina_rate),
            ("player_radius", self.player_radius),
            ("pickup_radius", self.pickup_radius),
            ("reach", self.reach),
        ];
        for (field, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = GameConfig::default();
        assert_eq!(config.reach, 1.0);
        assert_eq!(config.stamina_rate, 0.2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_fields() {
        let config = GameConfig {
            reach: 0.0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "reach",
                value: 0.0
            })
        );

        let config = GameConfig {
            player_speed: f32::INFINITY,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
