use super::error::{ConfigError, Result};
use super::generator::{DEFAULT_ADJACENT_BOOST_PROBABILITY, DEFAULT_OBSTACLE_PROBABILITY};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Grid columns
    pub width: usize,
    /// Grid rows
    pub height: usize,
    /// Chance that any cell becomes an obstacle in the first pass
    pub obstacle_probability: f64,
    /// Chance that a blank cell next to an obstacle becomes one in the second pass
    pub adjacent_boost_probability: f64,
    // caller-only: the core never reads cell_size or tick_delay_ms
    pub cell_size: u32,
    pub tick_delay_ms: u64,
    /// Optional cap on the number of ticks a caller should issue
    pub max_ticks: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            obstacle_probability: DEFAULT_OBSTACLE_PROBABILITY,
            adjacent_boost_probability: DEFAULT_ADJACENT_BOOST_PROBABILITY,
            cell_size: 30,
            tick_delay_ms: 40,
            max_ticks: None,
        }
    }
}

impl SearchConfig {
    pub fn with_dimensions(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_probabilities(mut self, obstacle: f64, adjacent_boost: f64) -> Self {
        self.obstacle_probability = obstacle;
        self.adjacent_boost_probability = adjacent_boost;
        self
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SearchConfig =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        check_probability("obstacle_probability", self.obstacle_probability)?;
        check_probability("adjacent_boost_probability", self.adjacent_boost_probability)?;
        Ok(())
    }
}

pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}
