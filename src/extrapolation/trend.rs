//! Least-squares polynomial trend fitting
//!
//! Small dense normal equations (degree ≤ 2 in practice) solved by Gaussian
//! elimination with partial pivoting. MD values are centred and scaled
//! before fitting so deep wells (MD ~ 10⁴) stay well conditioned.

/// A fitted polynomial in the normalised variable u = (x − center) / scale.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit {
    /// Coefficients, lowest order first.
    pub coefficients: Vec<f64>,
    center: f64,
    scale: f64,
}

impl PolynomialFit {
    /// Fit a polynomial of `degree` to `(xs, ys)`.
    ///
    /// Returns `None` when there are fewer than `degree + 1` points, the
    /// inputs differ in length, or the system is singular (e.g. repeated x).
    pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Option<Self> {
        let terms = degree + 1;
        if xs.len() != ys.len() || xs.len() < terms {
            return None;
        }

        let center = xs.iter().sum::<f64>() / xs.len() as f64;
        let spread = xs.iter().map(|x| (x - center).abs()).fold(0.0, f64::max);
        let scale = if spread > 0.0 { spread } else { 1.0 };

        // Normal equations: A[i][j] = Σ u^(i+j), b[i] = Σ y·u^i
        let mut a = vec![vec![0.0; terms]; terms];
        let mut b = vec![0.0; terms];
        for (&x, &y) in xs.iter().zip(ys) {
            let u = (x - center) / scale;
            let powers: Vec<f64> = (0..2 * terms - 1).map(|p| u.powi(p as i32)).collect();
            for i in 0..terms {
                b[i] += y * powers[i];
                for j in 0..terms {
                    a[i][j] += powers[i + j];
                }
            }
        }

        let coefficients = solve(a, b)?;
        Some(Self {
            coefficients,
            center,
            scale,
        })
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluate at `x` (Horner).
    pub fn eval(&self, x: f64) -> f64 {
        let u = (x - self.center) / self.scale;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * u + c)
    }
}

/// Solve `a · x = b` in place; `None` if singular.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_fit_exact() {
        let xs = [1000.0, 1010.0, 1020.0, 1030.0, 1040.0];
        let ys: Vec<f64> = xs.iter().map(|x| 0.05 * x - 20.0).collect();
        let fit = PolynomialFit::fit(&xs, &ys, 1).unwrap();
        assert!((fit.eval(1100.0) - 35.0).abs() < 1e-9);
        assert_eq!(fit.degree(), 1);
    }

    #[test]
    fn test_quadratic_fit_exact() {
        let xs: Vec<f64> = (0..10).map(|i| 5000.0 + i as f64 * 10.0).collect();
        let f = |x: f64| 1e-4 * (x - 5000.0).powi(2) + 0.02 * (x - 5000.0) + 30.0;
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let fit = PolynomialFit::fit(&xs, &ys, 2).unwrap();
        assert!((fit.eval(5150.0) - f(5150.0)).abs() < 1e-6);
    }

    #[test]
    fn test_too_few_points() {
        assert!(PolynomialFit::fit(&[1.0, 2.0], &[1.0, 2.0], 2).is_none());
        assert!(PolynomialFit::fit(&[1.0], &[1.0], 1).is_none());
    }

    #[test]
    fn test_repeated_x_is_singular() {
        assert!(PolynomialFit::fit(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0], 1).is_none());
    }
}
