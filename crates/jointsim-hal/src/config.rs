//! Robot configuration – the ordered list of joints an adapter drives.
//!
//! ```toml
//! [[joints]]
//! name = "joint1"
//!
//! [[joints]]
//! name = "joint2"
//! initial_position = 0.0
//! initial_effort = 0.0
//! ```
//!
//! Omitted initial values default to position `1.0` rad and effort `1.0`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use jointsim_types::SimError;
use serde::{Deserialize, Serialize};

/// One controllable joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointConfig {
    /// Joint name; must match the simulation model's joint name.
    pub name: String,

    /// Starting value of the accumulated position, in radians.
    #[serde(default = "default_initial_position")]
    pub initial_position: f64,

    /// Starting value of the sensed effort.
    #[serde(default = "default_initial_effort")]
    pub initial_effort: f64,
}

impl JointConfig {
    /// Joint `name` with the default initial position and effort.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial_position: default_initial_position(),
            initial_effort: default_initial_effort(),
        }
    }
}

fn default_initial_position() -> f64 {
    1.0
}
fn default_initial_effort() -> f64 {
    1.0
}

/// Ordered joint list for one simulated robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    pub joints: Vec<JointConfig>,
}

impl Default for RobotConfig {
    /// The two-link planar manipulator: `joint1`, `joint2`.
    fn default() -> Self {
        Self::from_names(["joint1", "joint2"])
    }
}

impl RobotConfig {
    /// Config with default initial values for each name, in order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            joints: names.into_iter().map(JointConfig::new).collect(),
        }
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, SimError> {
        let cfg: RobotConfig = toml::from_str(raw)
            .map_err(|e| SimError::Config(format!("Failed to parse robot config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse, apply `JOINTSIM_*` overrides and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, SimError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            SimError::Config(format!(
                "Failed to read robot config at {}: {e}",
                path.display()
            ))
        })?;
        let mut cfg: RobotConfig = toml::from_str(&raw)
            .map_err(|e| SimError::Config(format!("Failed to parse robot config: {e}")))?;
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, SimError> {
        toml::to_string_pretty(self)
            .map_err(|e| SimError::Config(format!("Failed to serialize robot config: {e}")))
    }

    /// Apply environment overrides.
    ///
    /// | Variable | Effect |
    /// |---|---|
    /// | `JOINTSIM_JOINTS` | Comma-separated joint names replacing the joint list (default initial values). |
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("JOINTSIM_JOINTS") {
            self.apply_joint_list(&v);
        }
    }

    fn apply_joint_list(&mut self, list: &str) {
        self.joints = list
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(JointConfig::new)
            .collect();
    }

    /// Check the joint list is non-empty, names are unique and non-empty, and
    /// initial values are finite.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.joints.is_empty() {
            return Err(SimError::Config("robot declares no joints".to_string()));
        }
        let mut seen = HashSet::new();
        for joint in &self.joints {
            if joint.name.trim().is_empty() {
                return Err(SimError::Config("joint name must not be empty".to_string()));
            }
            if !seen.insert(joint.name.as_str()) {
                return Err(SimError::Config(format!(
                    "joint \"{}\" is declared more than once",
                    joint.name
                )));
            }
            if !joint.initial_position.is_finite() || !joint.initial_effort.is_finite() {
                return Err(SimError::Config(format!(
                    "joint \"{}\" has a non-finite initial value",
                    joint.name
                )));
            }
        }
        Ok(())
    }

    /// Joint names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.joints.iter().map(|j| j.name.as_str()).collect()
    }
}
