// fusion_core/src/estimation/unscented.rs

//! Sigma-point generation and the weighted recombination that together make
//! up the unscented transform.

use nalgebra::{Cholesky, SMatrix, SVector};
use serde::{Deserialize, Serialize};

use crate::error::NumericalError;

/// Tuning scalars for sigma-point generation.
///
/// For an `n`-dimensional distribution the spread parameter is
/// `lambda = spread_offset - n`, so the points sit `sqrt(spread_offset)`
/// standard deviations from the mean along each Cholesky column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UkfParams {
    /// `n + lambda`. The classic choice of 3 gives `lambda = 3 - n`.
    pub spread_offset: f64,
    /// Distribution-shape correction on the zeroth covariance weight (2.0 is optimal for Gaussian).
    pub beta: f64,
    /// Secondary scaling parameter; together with the spread it sets `alpha^2 = (lambda + n) / (n + kappa)`.
    pub kappa: f64,
}

impl Default for UkfParams {
    fn default() -> Self {
        Self {
            spread_offset: 3.0,
            beta: 2.0,
            kappa: 0.0,
        }
    }
}

impl UkfParams {
    pub fn lambda(&self, n: usize) -> f64 {
        self.spread_offset - n as f64
    }

    fn alpha_sq(&self, n: usize) -> f64 {
        (self.lambda(n) + n as f64) / (n as f64 + self.kappa)
    }

    /// Mean and covariance weights for the `2n+1` sigma points of an
    /// `n`-dimensional distribution.
    pub fn weights(&self, n: usize) -> (Vec<f64>, Vec<f64>) {
        let lambda = self.lambda(n);
        let c = n as f64 + lambda;

        let mut weights_m = vec![0.5 / c; 2 * n + 1];
        weights_m[0] = lambda / c;

        let mut weights_c = weights_m.clone();
        weights_c[0] = weights_m[0] + (1.0 - self.alpha_sq(n) + self.beta);

        (weights_m, weights_c)
    }
}

/// An ordered set of sigma points with their parallel weight arrays.
///
/// A set produced by pushing points through a function keeps the weights of
/// the set it came from, so the number of points is `2n+1` for the `n` of
/// the distribution that was originally sampled, not necessarily for `N`.
#[derive(Debug, Clone, PartialEq)]
pub struct SigmaPoints<const N: usize> {
    pub points: Vec<SVector<f64, N>>,
    pub weights_m: Vec<f64>,
    pub weights_c: Vec<f64>,
}

impl<const N: usize> SigmaPoints<N> {
    /// Generates the `2N+1` sigma points of the distribution `(mean, covariance)`.
    ///
    /// Fails when the covariance has no Cholesky factor (not positive definite).
    pub fn generate(
        mean: &SVector<f64, N>,
        covariance: &SMatrix<f64, N, N>,
        params: &UkfParams,
    ) -> Result<Self, NumericalError> {
        // Cholesky decomposition: P = L * L^T
        let l_matrix = Cholesky::new(*covariance)
            .ok_or(NumericalError::NotPositiveDefinite { dim: N })?
            .l();

        let scale = (N as f64 + params.lambda(N)).sqrt();
        let scaled_l = l_matrix * scale;

        // First point is the mean, the other 2N are spread symmetrically around it.
        let mut points = Vec::with_capacity(2 * N + 1);
        points.push(*mean);
        for i in 0..N {
            points.push(mean + scaled_l.column(i));
        }
        for i in 0..N {
            points.push(mean - scaled_l.column(i));
        }

        let (weights_m, weights_c) = params.weights(N);

        Ok(Self {
            points,
            weights_m,
            weights_c,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Pushes every point through `f`, keeping the weights.
    pub fn transform<const M: usize, F>(&self, f: F) -> SigmaPoints<M>
    where
        F: Fn(&SVector<f64, N>) -> SVector<f64, M>,
    {
        SigmaPoints {
            points: self.points.iter().map(f).collect(),
            weights_m: self.weights_m.clone(),
            weights_c: self.weights_c.clone(),
        }
    }

    /// Weighted sample mean using the mean weights.
    pub fn mean(&self) -> SVector<f64, N> {
        self.points
            .iter()
            .zip(&self.weights_m)
            .fold(SVector::zeros(), |acc, (point, w)| acc + point * *w)
    }

    /// Weighted mean accumulated as offsets from the first point.
    ///
    /// With a wrapping `residual` this averages angles on the short side of
    /// the circle; with a plain difference it equals [`Self::mean`].
    pub fn mean_with<F>(&self, residual: F) -> SVector<f64, N>
    where
        F: Fn(&SVector<f64, N>, &SVector<f64, N>) -> SVector<f64, N>,
    {
        let Some(anchor) = self.points.first().copied() else {
            return SVector::zeros();
        };
        self.points
            .iter()
            .zip(&self.weights_m)
            .fold(anchor, |acc, (point, w)| acc + residual(point, &anchor) * *w)
    }

    /// Weighted sample covariance around `mean`.
    ///
    /// `residual(point, mean)` computes each deviation, which lets callers
    /// wrap angular components before the outer product is taken.
    pub fn covariance<F>(&self, mean: &SVector<f64, N>, residual: F) -> SMatrix<f64, N, N>
    where
        F: Fn(&SVector<f64, N>, &SVector<f64, N>) -> SVector<f64, N>,
    {
        let mut covariance = SMatrix::zeros();
        for (point, w) in self.points.iter().zip(&self.weights_c) {
            let diff = residual(point, mean);
            covariance += diff * diff.transpose() * *w;
        }
        covariance
    }

    /// Weighted cross-covariance between this set and `other`, which must have
    /// been produced from the same sampling (same length and weights).
    pub fn cross_covariance<const M: usize, F, G>(
        &self,
        mean: &SVector<f64, N>,
        residual: F,
        other: &SigmaPoints<M>,
        other_mean: &SVector<f64, M>,
        other_residual: G,
    ) -> SMatrix<f64, N, M>
    where
        F: Fn(&SVector<f64, N>, &SVector<f64, N>) -> SVector<f64, N>,
        G: Fn(&SVector<f64, M>, &SVector<f64, M>) -> SVector<f64, M>,
    {
        debug_assert_eq!(self.len(), other.len());
        let mut cross = SMatrix::zeros();
        for ((x, z), w) in self.points.iter().zip(&other.points).zip(&self.weights_c) {
            let diff_x = residual(x, mean);
            let diff_z = other_residual(z, other_mean);
            cross += diff_x * diff_z.transpose() * *w;
        }
        cross
    }
}

/// Plain vector difference, the residual for components without wraparound.
pub fn linear_residual<const N: usize>(a: &SVector<f64, N>, b: &SVector<f64, N>) -> SVector<f64, N> {
    a - b
}
