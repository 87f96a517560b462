//! Small fixed-size linear algebra used by source-term synthesis.

use condif_core::{Tensor3, Vector3};

/// Dot product of two 3-vectors.
pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Contract a symmetric coefficient tensor with a symmetric Hessian.
///
/// ```text
/// Σ_i K_ii·H_ii + 2·Σ_{i<j} K_ij·H_ij
/// ```
///
/// Only the upper triangle of each argument is read.
pub fn contract_symmetric(k: &Tensor3, h: &Tensor3) -> f64 {
    let diagonal = k[0][0] * h[0][0] + k[1][1] * h[1][1] + k[2][2] * h[2][2];
    let off_diagonal = k[0][1] * h[0][1] + k[0][2] * h[0][2] + k[1][2] * h[1][2];
    diagonal + 2.0 * off_diagonal
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn symmetric(u: [f64; 6]) -> Tensor3 {
        [[u[0], u[1], u[2]], [u[1], u[3], u[4]], [u[2], u[4], u[5]]]
    }

    proptest! {
        #[test]
        fn matches_full_double_contraction(
            a in prop::array::uniform6(-10.0f64..10.0),
            b in prop::array::uniform6(-10.0f64..10.0),
        ) {
            let k = symmetric(a);
            let h = symmetric(b);
            let mut full = 0.0;
            for i in 0..3 {
                for j in 0..3 {
                    full += k[i][j] * h[i][j];
                }
            }
            prop_assert!((contract_symmetric(&k, &h) - full).abs() < 1e-9);
        }
    }

    #[test]
    fn identity_contraction_is_trace() {
        let id = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let h = [[2.0, 7.0, 7.0], [7.0, 3.0, 7.0], [7.0, 7.0, 4.0]];
        assert_eq!(contract_symmetric(&id, &h), 9.0);
    }

    #[test]
    fn dot_is_componentwise() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, -5.0, 6.0]), 12.0);
    }
}
