//! Object classes and per-class spawn parameters for a scatter run.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scatter::ObjectClassId;

/// A decorative object class with its spawn probability and scale range.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectClass {
    /// Handle passed through to the spawner.
    pub id: ObjectClassId,
    /// Chance in [0, 1] that a candidate node receives this object.
    pub probability: f32,
    /// Base uniform scale.
    pub scale: f32,
    /// Upper bound of the random scale added on top of `scale`.
    pub scale_deviation: f32,
}

impl ObjectClass {
    pub fn new(id: impl Into<ObjectClassId>, probability: f32) -> Self {
        Self {
            id: id.into(),
            probability,
            scale: 1.0,
            scale_deviation: 0.0,
        }
    }

    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = probability;
        self
    }

    /// Sets the base scale and its random deviation.
    pub fn with_scale(mut self, scale: f32, scale_deviation: f32) -> Self {
        self.scale = scale;
        self.scale_deviation = scale_deviation;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(Error::InvalidConfig(format!(
                "'{}' probability must be in [0, 1], got {}",
                self.id, self.probability
            )));
        }
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "'{}' scale must be finite and >= 0, got {}",
                self.id, self.scale
            )));
        }
        if !self.scale_deviation.is_finite() || self.scale_deviation < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "'{}' scale_deviation must be finite and >= 0, got {}",
                self.id, self.scale_deviation
            )));
        }
        Ok(())
    }
}

/// Settings for one environment scatter run.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnvironmentSettings {
    /// Placed on Grass nodes.
    pub deciduous_tree: ObjectClass,
    /// Placed on TallGrass nodes that pass the adjacency gate.
    pub coniferous_tree: ObjectClass,
    /// Placed on any remaining Grass, TallGrass or Rocky node.
    pub rock: ObjectClass,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            deciduous_tree: ObjectClass::new("deciduous_tree", 0.3).with_scale(1.0, 0.4),
            coniferous_tree: ObjectClass::new("coniferous_tree", 0.5).with_scale(1.0, 0.4),
            rock: ObjectClass::new("rock", 0.05).with_scale(0.6, 0.3),
        }
    }
}

impl EnvironmentSettings {
    pub fn new(
        deciduous_tree: ObjectClass,
        coniferous_tree: ObjectClass,
        rock: ObjectClass,
    ) -> Self {
        Self {
            deciduous_tree,
            coniferous_tree,
            rock,
        }
    }

    pub fn with_deciduous_tree(mut self, class: ObjectClass) -> Self {
        self.deciduous_tree = class;
        self
    }

    pub fn with_coniferous_tree(mut self, class: ObjectClass) -> Self {
        self.coniferous_tree = class;
        self
    }

    pub fn with_rock(mut self, class: ObjectClass) -> Self {
        self.rock = class;
        self
    }

    /// Validates every object class, returning the first error.
    pub fn validate(&self) -> Result<()> {
        self.deciduous_tree.validate()?;
        self.coniferous_tree.validate()?;
        self.rock.validate()?;
        Ok(())
    }
}
