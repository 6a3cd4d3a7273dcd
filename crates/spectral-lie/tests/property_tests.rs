//! Property tests over families of Lie algebras
//!
//! - every antisymmetric bracket in dimension 2 is a Lie bracket, so d^2 = 0
//! - d^2 = 0 in every degree for random solvable and 2-step nilpotent
//!   algebras of dimension 4 to 6
//! - Heisenberg-type algebras `[e0, e1] = c e2` have the same Betti numbers
//!   for every c != 0
//! - with the identity metric, harmonic dimensions equal the raw Betti numbers
//! - induced metrics are symmetric for any symmetric base metric

use nalgebra::DMatrix;
use proptest::prelude::*;
use spectral_lie::combinatorics::{binomial, permutation_parity, sign_to_sort, wedge_basis};
use spectral_lie::engine::DEFAULT_D2_TOLERANCE;
use spectral_lie::linalg::is_symmetric;
use spectral_lie::{
    euler_characteristic, induced_metric, BettiPolicy, CohomologyEngine, SpectralAnalyzer,
    StructureConstants,
};

fn plane_algebra(a: f64, b: f64) -> StructureConstants {
    StructureConstants::from_brackets(2, &[(0, 1, 0, a), (0, 1, 1, b)]).unwrap()
}

/// `e0` acting on the abelian ideal `e1..e_m` by the m x m block of `entries`
fn semidirect_algebra(m: usize, entries: &[f64]) -> StructureConstants {
    let mut brackets = Vec::new();
    for col in 0..m {
        for row in 0..m {
            brackets.push((0, col + 1, row + 1, entries[row * 5 + col]));
        }
    }
    StructureConstants::from_brackets(m + 1, &brackets).unwrap()
}

/// Generators `x_0..x_g` whose brackets land in the center `z_0..z_c`
fn two_step_nilpotent(generators: usize, center: usize, coeffs: &[f64]) -> StructureConstants {
    let mut brackets = Vec::new();
    let mut next = coeffs.iter().copied();
    for i in 0..generators {
        for j in i + 1..generators {
            for z in 0..center {
                brackets.push((i, j, generators + z, next.next().unwrap_or(1.0)));
            }
        }
    }
    StructureConstants::from_brackets(generators + center, &brackets).unwrap()
}

proptest! {
    #[test]
    fn prop_solvable_semidirect_products_satisfy_d_squared_zero(
        m in 3usize..=5,
        entries in prop::collection::vec(-3.0f64..3.0, 25),
    ) {
        let constants = semidirect_algebra(m, &entries);
        let n = constants.dimension();
        let engine = CohomologyEngine::new(constants, n, BettiPolicy::ChevalleyEilenberg, false);
        prop_assert_eq!(engine.max_degree(), n);
        prop_assert!(engine.d_squared_zero(1e-10));
    }

    #[test]
    fn prop_two_step_nilpotent_algebras_satisfy_d_squared_zero(
        generators in 3usize..=4,
        center in 1usize..=2,
        coeffs in prop::collection::vec(-3.0f64..3.0, 12),
    ) {
        let constants = two_step_nilpotent(generators, center, &coeffs);
        let n = constants.dimension();
        prop_assert!(constants.is_unimodular());
        let engine = CohomologyEngine::new(constants, n, BettiPolicy::ChevalleyEilenberg, false);
        prop_assert!(engine.d_squared_zero(1e-10));
        // the top differential into degree n + 1 is an empty map
        prop_assert_eq!(engine.d_squared_defect(n), None);
    }

    #[test]
    fn prop_plane_algebras_satisfy_d_squared_zero(a in -5.0f64..5.0, b in -5.0f64..5.0) {
        let engine = CohomologyEngine::new(plane_algebra(a, b), 2, BettiPolicy::ChevalleyEilenberg, false);
        prop_assert!(engine.d_squared_zero(DEFAULT_D2_TOLERANCE));
    }

    #[test]
    fn prop_nonabelian_plane_betti(a in -5.0f64..5.0, b in -5.0f64..5.0) {
        prop_assume!(a.abs() > 0.1 || b.abs() > 0.1);
        let engine = CohomologyEngine::new(plane_algebra(a, b), 2, BettiPolicy::ChevalleyEilenberg, false);
        let betti = engine.betti_numbers();
        prop_assert_eq!(betti[&0], 1);
        prop_assert_eq!(betti[&1], 1);
        prop_assert_eq!(betti[&2], 0);
        prop_assert_eq!(euler_characteristic(&betti), 0);
    }

    #[test]
    fn prop_heisenberg_betti_scale_invariant(c in 0.01f64..100.0, negate in any::<bool>()) {
        let c = if negate { -c } else { c };
        let heis = StructureConstants::from_brackets(3, &[(0, 1, 2, c)]).unwrap();
        let engine = CohomologyEngine::new(heis, 3, BettiPolicy::ChevalleyEilenberg, false);
        let betti: Vec<usize> = engine.betti_numbers().into_values().collect();
        prop_assert_eq!(betti, vec![1, 2, 2, 1]);
    }

    #[test]
    fn prop_harmonic_dimension_matches_raw_betti(a in -3.0f64..3.0, b in -3.0f64..3.0) {
        prop_assume!(a.abs() > 0.1 || b.abs() > 0.1);
        let engine = CohomologyEngine::new(plane_algebra(a, b), 2, BettiPolicy::ChevalleyEilenberg, false);
        let analyzer = SpectralAnalyzer::new(&engine, DMatrix::identity(2, 2));
        let raw = engine.raw_betti_numbers();
        for (p, spectrum) in analyzer.spectra(2) {
            prop_assert_eq!(spectrum.harmonic_dimension, raw[&p]);
            prop_assert!(spectrum.is_positive_semidefinite(1e-10));
        }
    }

    #[test]
    fn prop_induced_metric_symmetric(entries in proptest::collection::vec(-2.0f64..2.0, 16), p in 0usize..=4) {
        let m = DMatrix::from_row_slice(4, 4, &entries);
        let g = &m * m.transpose() + DMatrix::identity(4, 4);
        let gram = induced_metric(&g, p);
        prop_assert_eq!(gram.nrows(), binomial(4, p));
        prop_assert!(is_symmetric(&gram, 0.0));
    }

    #[test]
    fn prop_wedge_basis_is_sorted_and_complete(n in 0usize..8, p in 0usize..8) {
        let basis = wedge_basis(n, p);
        let expected = if p > n { 0 } else { binomial(n, p) };
        prop_assert_eq!(basis.len(), expected);
        prop_assert!(basis.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(basis.iter().all(|t| t.windows(2).all(|w| w[0] < w[1])));
    }

    #[test]
    fn prop_sign_to_sort_matches_parity(perm in Just((0..5).collect::<Vec<usize>>()).prop_shuffle()) {
        let mut sorted = perm.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sign_to_sort(&perm, &sorted), permutation_parity(&perm));
    }
}
