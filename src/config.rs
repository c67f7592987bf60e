use serde::{Deserialize, Serialize};

use crate::error::{IdomError, IdomResult};

pub const DEFAULT_MAX_DEPTH: usize = 256;
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Per-session rendering limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Maximum number of simultaneously open elements
    pub max_depth: usize,
    /// Bytes reserved for the output buffer when a session starts
    pub initial_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load a configuration from YAML. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> IdomResult<Self> {
        let config: RenderConfig =
            serde_yaml::from_str(yaml).map_err(|e| IdomError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check limits that serde cannot express
    pub fn validate(&self) -> IdomResult<()> {
        if self.max_depth == 0 {
            return Err(IdomError::Config(
                "maxDepth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.max_depth, 256);
        assert_eq!(config.initial_capacity, 256);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = RenderConfig::from_yaml("maxDepth: 12").unwrap();
        assert_eq!(config.max_depth, 12);
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
    }

    #[test]
    fn test_from_yaml_rejects_zero_depth() {
        assert!(matches!(
            RenderConfig::from_yaml("maxDepth: 0"),
            Err(IdomError::Config(_))
        ));
    }

    #[test]
    fn test_from_yaml_rejects_bad_type() {
        assert!(matches!(
            RenderConfig::from_yaml("maxDepth: deep"),
            Err(IdomError::Config(_))
        ));
    }
}
