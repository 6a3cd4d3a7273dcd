//! Multi-index helpers for exterior powers
//!
//! A degree-p wedge basis element is a strictly increasing tuple of p indices
//! drawn from `0..n`. Bases are listed in lexicographic order, which is the
//! column/row order used by every matrix in this crate.

/// Binomial coefficient C(n, k), zero when k > n
///
/// Saturates at `usize::MAX` when the value does not fit.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // exact at every step: acc * (n - i) is divisible by (i + 1)
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        // partial products C(n, i + 1) only grow while i + 1 <= n / 2
        if acc > usize::MAX as u128 {
            return usize::MAX;
        }
    }
    acc as usize
}

/// All strictly increasing index tuples of length `p` over `0..n`, in lexicographic order
///
/// `p == 0` yields the single empty tuple, `p > n` yields nothing.
pub fn wedge_basis(n: usize, p: usize) -> Vec<Vec<usize>> {
    if p > n {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(binomial(n, p));
    let mut current: Vec<usize> = (0..p).collect();

    loop {
        out.push(current.clone());

        // Rightmost position that can still be advanced
        let mut i = p;
        while i > 0 {
            i -= 1;
            if current[i] < n - p + i {
                current[i] += 1;
                for j in i + 1..p {
                    current[j] = current[j - 1] + 1;
                }
                break;
            }
            if i == 0 {
                return out;
            }
        }
        if p == 0 {
            return out;
        }
    }
}

/// Sign of a sequence of distinct values: +1 for an even number of inversions, -1 for odd
pub fn permutation_parity(seq: &[usize]) -> i32 {
    let mut odd = false;
    for i in 0..seq.len() {
        for j in i + 1..seq.len() {
            if seq[i] > seq[j] {
                odd = !odd;
            }
        }
    }
    if odd {
        -1
    } else {
        1
    }
}

/// Sign of the permutation that reorders `unsorted` into `sorted`
///
/// Each value of `sorted` is matched to the first unused position holding an
/// equal value in `unsorted`, scanning left to right; the parity of the
/// resulting position sequence is the sign.
pub fn sign_to_sort(unsorted: &[usize], sorted: &[usize]) -> i32 {
    let mut used = vec![false; unsorted.len()];
    let mut positions = Vec::with_capacity(sorted.len());

    for target in sorted {
        if let Some(pos) = unsorted
            .iter()
            .enumerate()
            .position(|(p, v)| !used[p] && v == target)
        {
            used[pos] = true;
            positions.push(pos);
        }
    }

    permutation_parity(&positions)
}

/// Whether a tuple repeats any index (such wedge products vanish)
pub fn has_repeats(tuple: &[usize]) -> bool {
    (1..tuple.len()).any(|i| tuple[..i].contains(&tuple[i]))
}
