//! Named fade curves.
//!
//! Curves are selected by name in config files. The set is closed: adding a
//! curve means adding a variant here and an evaluator in the engine's
//! envelope library. Any other name is rejected with [`UnsupportedCurve`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shape of a fade envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    /// Straight line between the gains, bent by the fade-adjust parameter.
    Linear,
    /// Half-cosine S-curve.
    Cosine,
    /// Quarter sine/cosine, constant perceived power across a crossfade.
    EqualPower,
    /// Cubic smoothstep (3t^2 - 2t^3).
    Smoothstep,
}

impl EnvelopeKind {
    /// Every registered curve, in declaration order.
    pub const ALL: [EnvelopeKind; 4] = [
        EnvelopeKind::Linear,
        EnvelopeKind::Cosine,
        EnvelopeKind::EqualPower,
        EnvelopeKind::Smoothstep,
    ];

    /// Returns the config name of the curve.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvelopeKind::Linear => "linear",
            EnvelopeKind::Cosine => "cosine",
            EnvelopeKind::EqualPower => "equal_power",
            EnvelopeKind::Smoothstep => "smoothstep",
        }
    }
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A curve name that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported fade curve '{name}'")]
pub struct UnsupportedCurve {
    /// The rejected name, as written in the config.
    pub name: String,
}

impl FromStr for EnvelopeKind {
    type Err = UnsupportedCurve;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnvelopeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnsupportedCurve {
                name: s.to_string(),
            })
    }
}
