//! Betti number correction policies
//!
//! Betti numbers come out of the engine in two stages: a raw rank-nullity
//! computation, then [`adjust_betti`], a pure function of the raw numbers,
//! the structural facts of the algebra and the configured policy. Keeping the
//! second stage separate lets it be tested without any linear algebra.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SpectralLieError;

/// Betti numbers indexed by degree
pub type BettiNumbers = BTreeMap<usize, usize>;

/// How raw Betti numbers are corrected with known theorems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BettiPolicy {
    /// Standard Chevalley-Eilenberg: Whitehead's lemma for semisimple
    /// algebras, unimodularity decides the top degree otherwise
    #[default]
    #[serde(rename = "CE")]
    ChevalleyEilenberg,
    /// Always report zero in the top degree
    #[serde(rename = "force_beta_top_zero")]
    ForceTopZero,
}

impl BettiPolicy {
    /// Tag used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChevalleyEilenberg => "CE",
            Self::ForceTopZero => "force_beta_top_zero",
        }
    }
}

impl fmt::Display for BettiPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BettiPolicy {
    type Err = SpectralLieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CE" => Ok(Self::ChevalleyEilenberg),
            "force_beta_top_zero" => Ok(Self::ForceTopZero),
            other => Err(SpectralLieError::config(format!(
                "unknown Betti policy '{other}' (expected 'CE' or 'force_beta_top_zero')"
            ))),
        }
    }
}

/// Structural facts the correction stage relies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralFacts {
    /// Algebra dimension n (the top degree)
    pub dimension: usize,
    /// Semisimple (non-degenerate Killing form, or declared so)
    pub semisimple: bool,
    /// Every `ad_x` is traceless
    pub unimodular: bool,
}

/// Apply the policy to raw Betti numbers
///
/// Only degrees present in `raw` are touched: when the top degree n lies
/// beyond the computed range it is neither added nor adjusted.
pub fn adjust_betti(
    mut raw: BettiNumbers,
    facts: &StructuralFacts,
    policy: BettiPolicy,
) -> BettiNumbers {
    let top = facts.dimension;

    match policy {
        BettiPolicy::ChevalleyEilenberg if facts.semisimple => {
            // Whitehead: H^p(g; K) = 0 for p > 0
            for (_, b) in raw.range_mut(1..) {
                *b = 0;
            }
        }
        BettiPolicy::ChevalleyEilenberg => {
            if let Some(b) = raw.get_mut(&top) {
                *b = usize::from(facts.unimodular);
            }
        }
        BettiPolicy::ForceTopZero => {
            if let Some(b) = raw.get_mut(&top) {
                *b = 0;
            }
        }
    }

    raw
}

/// Alternating sum `sum_p (-1)^p b_p`
pub fn euler_characteristic(betti: &BettiNumbers) -> i64 {
    betti
        .iter()
        .map(|(&p, &b)| if p % 2 == 0 { b as i64 } else { -(b as i64) })
        .sum()
}
