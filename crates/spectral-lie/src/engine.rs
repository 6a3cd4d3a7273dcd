//! Chevalley-Eilenberg cohomology engine
//!
//! Cochains of degree p with trivial coefficients are alternating p-forms on
//! the algebra, represented in the basis of strictly increasing index tuples.
//! The differential d_p: C^p -> C^{p+1} is
//!
//! ```text
//! (d phi)(x_0, ..., x_p) = sum_{a<b} (-1)^{a+b} phi([x_a, x_b], x_0, ..., ^x_a, ..., ^x_b, ..., x_p)
//! ```
//!
//! and d_{p+1} d_p = 0 is equivalent to the Jacobi identity, which makes
//! [`CohomologyEngine::d_squared_zero`] the consistency check for structure
//! constants.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use nalgebra::DMatrix;
use tracing::debug;

use crate::betti::{adjust_betti, BettiNumbers, BettiPolicy, StructuralFacts};
use crate::combinatorics::{binomial, has_repeats, sign_to_sort, wedge_basis};
use crate::error::Result;
use crate::linalg::{max_abs, numerical_rank, RANK_RTOL};
use crate::structure::StructureConstants;

/// Coefficients at or below this magnitude are skipped during assembly
pub const COEFFICIENT_EPSILON: f64 = 1e-15;

/// Default tolerance for the d^2 = 0 check
pub const DEFAULT_D2_TOLERANCE: f64 = 1e-12;

/// Canonical basis of one exterior power
///
/// Positions are computed from the tuple itself (lexicographic rank in the
/// combinatorial number system), so no reverse map is stored.
#[derive(Debug, Clone, Default)]
pub struct WedgeBasis {
    n: usize,
    p: usize,
    tuples: Vec<Vec<usize>>,
}

impl WedgeBasis {
    /// Basis of the degree-`p` exterior power of an `n`-dimensional space
    pub fn new(n: usize, p: usize) -> Self {
        Self {
            n,
            p,
            tuples: wedge_basis(n, p),
        }
    }

    /// Number of basis elements
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    /// Whether the space is zero
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Basis tuples in order
    pub fn tuples(&self) -> &[Vec<usize>] {
        &self.tuples
    }

    /// Position of a strictly increasing tuple, `None` for anything else
    pub fn position(&self, tuple: &[usize]) -> Option<usize> {
        if tuple.len() != self.p || self.tuples.is_empty() {
            return None;
        }

        let mut rank = 0;
        let mut next = 0;
        for (i, &c) in tuple.iter().enumerate() {
            if c < next || c >= self.n {
                return None;
            }
            // tuples that agree so far but hold a smaller value in slot i
            let remaining = self.p - 1 - i;
            for v in next..c {
                rank += binomial(self.n - 1 - v, remaining);
            }
            next = c + 1;
        }
        Some(rank)
    }
}

/// Engine construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Highest degree for Betti numbers and the d^2 check (clamped to n)
    pub max_degree: usize,
    /// Betti correction policy
    pub policy: BettiPolicy,
    /// Whether the algebra is semisimple
    pub semisimple: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_degree: 5,
            policy: BettiPolicy::ChevalleyEilenberg,
            semisimple: false,
        }
    }
}

/// Chevalley-Eilenberg complex of a Lie algebra with trivial coefficients
#[derive(Debug, Clone)]
pub struct CohomologyEngine {
    constants: StructureConstants,
    max_degree: usize,
    policy: BettiPolicy,
    semisimple: bool,
    /// Bases for degrees 0..=n+1, each built on first use
    bases: Vec<OnceLock<WedgeBasis>>,
}

impl CohomologyEngine {
    /// Create an engine; `max_degree` is clamped to the algebra dimension
    pub fn new(
        constants: StructureConstants,
        max_degree: usize,
        policy: BettiPolicy,
        semisimple: bool,
    ) -> Self {
        let n = constants.dimension();
        let bases = (0..=n + 1).map(|_| OnceLock::new()).collect();

        debug!(
            dimension = n,
            max_degree = max_degree.min(n),
            policy = %policy,
            semisimple,
            "created cohomology engine"
        );

        Self {
            constants,
            max_degree: max_degree.min(n),
            policy,
            semisimple,
            bases,
        }
    }

    /// Create an engine from [`EngineOptions`]
    pub fn with_options(constants: StructureConstants, options: EngineOptions) -> Self {
        Self::new(
            constants,
            options.max_degree,
            options.policy,
            options.semisimple,
        )
    }

    /// Create an engine from a nested `[i][j][k]` tensor, rejecting ragged shapes
    pub fn from_nested(nested: &[Vec<Vec<f64>>], options: EngineOptions) -> Result<Self> {
        Ok(Self::with_options(
            StructureConstants::from_nested(nested)?,
            options,
        ))
    }

    /// Algebra dimension n
    pub fn dimension(&self) -> usize {
        self.constants.dimension()
    }

    /// Clamped maximum degree
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Betti correction policy
    pub fn policy(&self) -> BettiPolicy {
        self.policy
    }

    /// Semisimplicity flag supplied at construction
    pub fn is_semisimple(&self) -> bool {
        self.semisimple
    }

    /// Structure constants owned by the engine
    pub fn constants(&self) -> &StructureConstants {
        &self.constants
    }

    /// Wedge basis of degree `p`, built and cached on first request
    ///
    /// `None` beyond degree n + 1.
    pub fn basis(&self, p: usize) -> Option<&WedgeBasis> {
        let n = self.dimension();
        self.bases
            .get(p)
            .map(|cell| cell.get_or_init(|| WedgeBasis::new(n, p)))
    }

    /// Dimension of the degree-p cochain space: C(n, p), zero for p > n
    pub fn wedge_dim(&self, p: usize) -> usize {
        let n = self.dimension();
        if p > n {
            0
        } else if p == 0 || p == n {
            1
        } else {
            binomial(n, p)
        }
    }

    /// Wedge dimensions for degrees `0..=max_degree`
    pub fn wedge_dimensions(&self) -> Vec<usize> {
        (0..=self.max_degree).map(|p| self.wedge_dim(p)).collect()
    }

    /// Differential d_p: C^p -> C^{p+1} as a `wedge_dim(p+1) x wedge_dim(p)` matrix
    pub fn assemble_d(&self, p: usize) -> DMatrix<f64> {
        let n = self.dimension();
        let rows = self.wedge_dim(p + 1);
        let cols = self.wedge_dim(p);
        let mut d = DMatrix::zeros(rows, cols);

        if p >= n || rows == 0 || cols == 0 {
            return d;
        }

        let (Some(domain), Some(codomain)) = (self.basis(p), self.basis(p + 1)) else {
            return d;
        };
        let mut candidate = Vec::with_capacity(p);
        let mut sorted = Vec::with_capacity(p);

        for (row, tuple) in codomain.tuples().iter().enumerate() {
            let q = tuple.len();
            for a in 0..q {
                for b in a + 1..q {
                    let (i, j) = (tuple[a], tuple[b]);
                    let base_sign = if (a + b) % 2 == 0 { 1.0 } else { -1.0 };

                    for (k, &coeff) in self.constants.bracket(i, j).iter().enumerate() {
                        if coeff.abs() <= COEFFICIENT_EPSILON {
                            continue;
                        }

                        candidate.clear();
                        candidate.extend(
                            tuple
                                .iter()
                                .enumerate()
                                .filter(|&(t, _)| t != a && t != b)
                                .map(|(_, &v)| v),
                        );
                        candidate.push(k);

                        // alternating forms vanish on repeated arguments
                        if has_repeats(&candidate) {
                            continue;
                        }

                        sorted.clear();
                        sorted.extend_from_slice(&candidate);
                        sorted.sort_unstable();

                        let Some(col) = domain.position(&sorted) else {
                            continue;
                        };
                        let perm_sign = f64::from(sign_to_sort(&candidate, &sorted));
                        d[(row, col)] += base_sign * perm_sign * coeff;
                    }
                }
            }
        }

        debug!(degree = p, rows, cols, "assembled differential");
        d
    }

    /// Largest entry of |d_{p+1} d_p|, or `None` when either map is empty
    pub fn d_squared_defect(&self, p: usize) -> Option<f64> {
        let d_p = self.assemble_d(p);
        let d_next = self.assemble_d(p + 1);
        if d_p.is_empty() || d_next.is_empty() {
            return None;
        }
        Some(max_abs(&(d_next * d_p)))
    }

    /// First degree p < max_degree where d_{p+1} d_p exceeds `tolerance`, with its defect
    pub fn first_d_squared_violation(&self, tolerance: f64) -> Option<(usize, f64)> {
        (0..self.max_degree).find_map(|p| match self.d_squared_defect(p) {
            Some(defect) if defect > tolerance => Some((p, defect)),
            _ => None,
        })
    }

    /// Whether d_{p+1} d_p vanishes within `tolerance` for every p below max_degree
    pub fn d_squared_zero(&self, tolerance: f64) -> bool {
        self.first_d_squared_violation(tolerance).is_none()
    }

    /// Rank-nullity Betti numbers before any policy correction
    pub fn raw_betti_numbers(&self) -> BettiNumbers {
        let mut betti = BTreeMap::new();

        for p in 0..=self.max_degree {
            let dim = self.wedge_dim(p);
            if dim == 0 {
                betti.insert(p, 0);
                continue;
            }

            let rank_d = numerical_rank(&self.assemble_d(p), RANK_RTOL);
            let image = match p.checked_sub(1) {
                Some(prev) => numerical_rank(&self.assemble_d(prev), RANK_RTOL),
                None => 0,
            };
            let kernel = dim - rank_d;
            betti.insert(p, kernel.saturating_sub(image));
        }

        betti
    }

    /// Facts consumed by the Betti correction stage
    pub fn structural_facts(&self) -> StructuralFacts {
        StructuralFacts {
            dimension: self.dimension(),
            semisimple: self.semisimple,
            unimodular: self.constants.is_unimodular(),
        }
    }

    /// Betti numbers for degrees `0..=max_degree` after the policy correction
    pub fn betti_numbers(&self) -> BettiNumbers {
        adjust_betti(
            self.raw_betti_numbers(),
            &self.structural_facts(),
            self.policy,
        )
    }
}
