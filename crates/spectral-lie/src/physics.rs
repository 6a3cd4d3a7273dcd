//! Structural summary
//!
//! Exposes cohomological invariants under the `structural_invariants` key of
//! the result document.

use serde::{Deserialize, Serialize};

use crate::betti::{euler_characteristic, BettiNumbers};
use crate::engine::CohomologyEngine;

/// Cohomological invariants of the algebra
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralInvariants {
    /// Corrected Betti numbers
    pub betti_numbers: BettiNumbers,
    /// Alternating sum of the reported Betti numbers
    pub euler_characteristic: i64,
}

/// Physics section of the result document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsSummary {
    /// Structural invariants
    pub structural_invariants: StructuralInvariants,
}

/// Aggregates engine results into a [`PhysicsSummary`]
#[derive(Debug, Clone, Copy)]
pub struct PhysicsAnalyzer<'a> {
    engine: &'a CohomologyEngine,
}

impl<'a> PhysicsAnalyzer<'a> {
    /// Analyzer over an engine
    pub fn new(engine: &'a CohomologyEngine) -> Self {
        Self { engine }
    }

    /// Summary built from freshly computed Betti numbers
    pub fn summary(&self) -> PhysicsSummary {
        Self::from_betti(self.engine.betti_numbers())
    }

    /// Summary from already computed Betti numbers
    pub fn from_betti(betti_numbers: BettiNumbers) -> PhysicsSummary {
        let euler_characteristic = euler_characteristic(&betti_numbers);
        PhysicsSummary {
            structural_invariants: StructuralInvariants {
                betti_numbers,
                euler_characteristic,
            },
        }
    }
}
