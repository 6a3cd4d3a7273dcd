//! Cartan types and classification backends
//!
//! A [`ClassificationBackend`] turns a Cartan type into structure constants.
//! [`ClassicalBackend`] covers the four classical series through their
//! standard matrix realizations:
//!
//! | type | algebra    | matrix size |
//! |------|------------|-------------|
//! | A_n  | sl(n+1)    | n+1         |
//! | B_n  | so(2n+1)   | 2n+1        |
//! | C_n  | sp(2n)     | 2n          |
//! | D_n  | so(2n)     | 2n          |
//!
//! Bracket coordinates are recovered by least squares against the flattened
//! basis and snapped to the nearest integer when within round-off.

use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::error::{Result, SpectralLieError};
use crate::linalg::pseudo_inverse;
use crate::source::LoadedAlgebra;
use crate::structure::StructureConstants;

/// Coordinates this close to an integer are rounded
const SNAP_TOLERANCE: f64 = 1e-9;

/// Maximum residual of a bracket outside the span of the basis
const CLOSURE_TOLERANCE: f64 = 1e-8;

/// Dynkin family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartanFamily {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl CartanFamily {
    fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            'F' => Some(Self::F),
            'G' => Some(Self::G),
            _ => None,
        }
    }

    fn letter(&self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
        }
    }

    /// Whether `rank` names an actual simple algebra in this family
    fn admits_rank(&self, rank: usize) -> bool {
        match self {
            Self::A | Self::B | Self::C => rank >= 1,
            Self::D => rank >= 2,
            Self::E => (6..=8).contains(&rank),
            Self::F => rank == 4,
            Self::G => rank == 2,
        }
    }

    /// Exceptional families have no classical matrix realization
    pub fn is_exceptional(&self) -> bool {
        matches!(self, Self::E | Self::F | Self::G)
    }
}

/// Cartan type such as `A2` or `D4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CartanType {
    pub family: CartanFamily,
    pub rank: usize,
}

impl CartanType {
    /// Dimension of the corresponding simple Lie algebra
    pub fn dimension(&self) -> usize {
        let n = self.rank;
        match self.family {
            CartanFamily::A => n * (n + 2),
            CartanFamily::B | CartanFamily::C => n * (2 * n + 1),
            CartanFamily::D => n * (2 * n - 1),
            CartanFamily::E => match n {
                6 => 78,
                7 => 133,
                _ => 248,
            },
            CartanFamily::F => 52,
            CartanFamily::G => 14,
        }
    }
}

impl fmt::Display for CartanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family.letter(), self.rank)
    }
}

impl FromStr for CartanType {
    type Err = SpectralLieError;

    /// Accepts `A2`, `a2`, `A_2` and `A 2`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SpectralLieError::config(format!("invalid Cartan type '{s}'"));

        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let family = chars
            .next()
            .and_then(CartanFamily::from_letter)
            .ok_or_else(invalid)?;
        let digits = chars.as_str().trim_start_matches(['_', ' ']);
        let rank: usize = digits.parse().map_err(|_| invalid())?;

        if !family.admits_rank(rank) {
            return Err(invalid());
        }
        Ok(Self { family, rank })
    }
}

/// Produces structure constants for a Cartan type
pub trait ClassificationBackend: Send + Sync {
    /// Backend name used in logs and errors
    fn name(&self) -> &str;

    /// Whether the backend can be used in this process
    fn available(&self) -> bool;

    /// Structure constants in the backend's basis
    fn structure_constants(&self, cartan_type: &CartanType) -> Result<LoadedAlgebra>;
}

/// Matrix realizations of the classical series A, B, C, D
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicalBackend;

impl ClassicalBackend {
    /// Backend with no configuration
    pub fn new() -> Self {
        Self
    }
}

impl ClassificationBackend for ClassicalBackend {
    fn name(&self) -> &str {
        "classical"
    }

    fn available(&self) -> bool {
        true
    }

    fn structure_constants(&self, cartan_type: &CartanType) -> Result<LoadedAlgebra> {
        let (names, matrices) = match cartan_type.family {
            CartanFamily::A => special_linear(cartan_type.rank + 1),
            CartanFamily::B => orthogonal(2 * cartan_type.rank + 1),
            CartanFamily::C => symplectic(cartan_type.rank),
            CartanFamily::D => orthogonal(2 * cartan_type.rank),
            CartanFamily::E | CartanFamily::F | CartanFamily::G => {
                return Err(SpectralLieError::backend_failure(
                    cartan_type.to_string(),
                    "exceptional types have no classical matrix realization",
                ));
            }
        };

        let constants = bracket_coordinates(&matrices)
            .map_err(|reason| SpectralLieError::backend_failure(cartan_type.to_string(), reason))?;

        debug!(
            cartan_type = %cartan_type,
            dimension = constants.dimension(),
            "built classical structure constants"
        );

        Ok(LoadedAlgebra {
            constants,
            basis: names,
            semisimple_hint: Some(true),
        })
    }
}

fn unit(m: usize, i: usize, j: usize) -> DMatrix<f64> {
    let mut e = DMatrix::zeros(m, m);
    e[(i, j)] = 1.0;
    e
}

/// sl(m): off-diagonal units then `H_k = E_kk - E_{k+1,k+1}`
fn special_linear(m: usize) -> (Vec<String>, Vec<DMatrix<f64>>) {
    let mut names = Vec::new();
    let mut matrices = Vec::new();
    for i in 0..m {
        for j in 0..m {
            if i != j {
                names.push(format!("E_{i}_{j}"));
                matrices.push(unit(m, i, j));
            }
        }
    }
    for k in 0..m.saturating_sub(1) {
        names.push(format!("H_{k}"));
        matrices.push(unit(m, k, k) - unit(m, k + 1, k + 1));
    }
    (names, matrices)
}

/// so(m): `M_ij = E_ij - E_ji` for i < j
fn orthogonal(m: usize) -> (Vec<String>, Vec<DMatrix<f64>>) {
    let mut names = Vec::new();
    let mut matrices = Vec::new();
    for i in 0..m {
        for j in (i + 1)..m {
            names.push(format!("M_{i}_{j}"));
            matrices.push(unit(m, i, j) - unit(m, j, i));
        }
    }
    (names, matrices)
}

/// sp(2n) preserving `J = [[0, I], [-I, 0]]`: blocks `[[A, B], [C, -A^T]]`
/// with B and C symmetric
fn symplectic(n: usize) -> (Vec<String>, Vec<DMatrix<f64>>) {
    let m = 2 * n;
    let mut names = Vec::new();
    let mut matrices = Vec::new();

    for i in 0..n {
        for j in 0..n {
            names.push(format!("A_{i}_{j}"));
            matrices.push(unit(m, i, j) - unit(m, n + j, n + i));
        }
    }
    for i in 0..n {
        for j in i..n {
            names.push(format!("B_{i}_{j}"));
            let mut b = unit(m, i, n + j);
            if i != j {
                b += unit(m, j, n + i);
            }
            matrices.push(b);
        }
    }
    for i in 0..n {
        for j in i..n {
            names.push(format!("C_{i}_{j}"));
            let mut c = unit(m, n + i, j);
            if i != j {
                c += unit(m, n + j, i);
            }
            matrices.push(c);
        }
    }
    (names, matrices)
}

fn snap(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < SNAP_TOLERANCE {
        rounded
    } else {
        value
    }
}

/// Structure constants of a bracket-closed set of matrices
fn bracket_coordinates(matrices: &[DMatrix<f64>]) -> std::result::Result<StructureConstants, String> {
    let dim = matrices.len();
    let Some(first) = matrices.first() else {
        return Ok(StructureConstants::zeros(0));
    };
    let flat_len = first.len();

    let basis = DMatrix::from_fn(flat_len, dim, |r, c| matrices[c].as_slice()[r]);
    let projector = pseudo_inverse(&basis);

    let mut constants = StructureConstants::zeros(dim);
    for i in 0..dim {
        for j in (i + 1)..dim {
            let commutator = &matrices[i] * &matrices[j] - &matrices[j] * &matrices[i];
            let target = DVector::from_column_slice(commutator.as_slice());
            let coords = &projector * &target;

            let residual = (&basis * &coords - &target).amax();
            if residual > CLOSURE_TOLERANCE {
                return Err(format!(
                    "bracket of basis elements {i} and {j} leaves the span (residual {residual:.3e})"
                ));
            }

            for (k, &c) in coords.iter().enumerate() {
                let c = snap(c);
                if c != 0.0 {
                    constants
                        .add_bracket(i, j, k, c)
                        .map_err(|e| e.to_string())?;
                }
            }
        }
    }
    Ok(constants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betti::BettiPolicy;
    use crate::engine::CohomologyEngine;

    #[test]
    fn test_parse_cartan_types() {
        let a2: CartanType = "A2".parse().unwrap();
        assert_eq!(a2.family, CartanFamily::A);
        assert_eq!(a2.rank, 2);
        assert_eq!("d_4".parse::<CartanType>().unwrap().to_string(), "D4");
        assert_eq!("G2".parse::<CartanType>().unwrap().dimension(), 14);

        for bad in ["", "X3", "A", "A0", "D1", "E5", "F3", "Gx"] {
            assert!(bad.parse::<CartanType>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_classical_dimensions() {
        let backend = ClassicalBackend::new();
        for name in ["A1", "A2", "B2", "C2", "C3", "D3"] {
            let ct: CartanType = name.parse().unwrap();
            let algebra = backend.structure_constants(&ct).unwrap();
            assert_eq!(algebra.constants.dimension(), ct.dimension(), "{name}");
            assert_eq!(algebra.basis.len(), ct.dimension(), "{name}");
            assert!(algebra.constants.is_antisymmetric(0.0), "{name}");
        }
    }

    #[test]
    fn test_a1_brackets() {
        let algebra = ClassicalBackend::new()
            .structure_constants(&"A1".parse().unwrap())
            .unwrap();
        // basis E_0_1, E_1_0, H_0
        assert_eq!(algebra.basis, vec!["E_0_1", "E_1_0", "H_0"]);
        let c = &algebra.constants;
        assert_eq!(c.bracket(0, 1), &[0.0, 0.0, 1.0]);
        assert_eq!(c.bracket(2, 0), &[2.0, 0.0, 0.0]);
        assert_eq!(c.bracket(2, 1), &[0.0, -2.0, 0.0]);
    }

    #[test]
    fn test_classical_algebras_are_semisimple() {
        let backend = ClassicalBackend::new();
        // D3 is 15-dimensional, checked through degree 3
        for (name, max_degree) in [("A2", 4), ("B2", 4), ("C2", 4), ("D3", 3)] {
            let algebra = backend.structure_constants(&name.parse().unwrap()).unwrap();
            assert!(algebra.constants.is_semisimple(), "{name}");
            assert!(algebra.constants.is_unimodular(), "{name}");

            let engine = CohomologyEngine::new(
                algebra.constants,
                max_degree,
                BettiPolicy::ChevalleyEilenberg,
                true,
            );
            assert!(engine.d_squared_zero(1e-12), "{name}");
        }
    }

    #[test]
    fn test_exceptional_types_fail() {
        let err = ClassicalBackend::new()
            .structure_constants(&"G2".parse().unwrap())
            .unwrap_err();
        assert!(err.is_backend_error());
        assert!(err.to_string().contains("G2"));
    }
}
