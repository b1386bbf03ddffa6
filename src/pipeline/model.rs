//! L2-regularised logistic regression
//!
//! Minimises `0.5 * |w|^2 + C * sum(log-loss)` over the raw coefficients `w`
//! (intercept unpenalised). The Newton iterations run on standardised features
//! with the penalty rescaled to `lambda / s_j^2` per column, so the optimum is
//! the same as in raw space. Each Newton system is solved with faer and the
//! step is halved until the penalised loss stops increasing. The returned
//! weights apply to the raw features, which is what `weights.bin` and the
//! proof circuit consume.

use anyhow::Result;
use faer::prelude::SpSolver;
use faer::Mat;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use super::matrix::FeatureMatrix;

/// Standard deviations below this are treated as constant columns
const MIN_STD: f64 = 1e-12;

/// Keeps the intercept row of the Hessian invertible when predictions saturate
const INTERCEPT_RIDGE: f64 = 1e-10;

/// Smallest line-search step before giving up on an iteration
const MIN_STEP: f64 = 1e-10;

/// Optimiser settings
#[derive(Debug, Clone, Copy)]
pub struct TrainConfig {
    /// Maximum Newton iterations
    pub max_iter: usize,
    /// Inverse regularisation strength (penalty is 1/C on the coefficients)
    pub c: f64,
    /// Stop once the largest coefficient update falls below this
    pub tolerance: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_iter: 100,
            c: 1.0,
            tolerance: 1e-8,
        }
    }
}

/// A fitted binary linear classifier
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl LogisticRegression {
    /// Build a classifier from known weights
    pub fn from_weights(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            iterations: 0,
            converged: true,
        }
    }

    /// Fit on `x` with 0/1 labels `y`.
    ///
    /// Fails on empty input, mismatched lengths, single-class labels or a
    /// Newton system that cannot be solved.
    pub fn fit(x: &FeatureMatrix, y: &[u8], config: &TrainConfig) -> Result<Self> {
        let n = x.n_rows();
        let p = x.n_features();

        if n == 0 {
            anyhow::bail!("Cannot train on an empty dataset");
        }
        if y.len() != n {
            anyhow::bail!("Label count {} does not match row count {}", y.len(), n);
        }
        let positives = y.iter().filter(|&&l| l == 1).count();
        if positives == 0 || positives == n {
            anyhow::bail!("Training labels contain a single class; need both 0 and 1");
        }
        if config.c <= 0.0 || !config.c.is_finite() {
            anyhow::bail!("Regularisation C must be positive, got {}", config.c);
        }

        let (means, stds) = column_moments(x);
        let design: Vec<Vec<f64>> = x
            .rows
            .par_iter()
            .map(|row| {
                let mut z = Vec::with_capacity(p + 1);
                z.push(1.0);
                z.extend(row.iter().zip(&means).zip(&stds).map(|((&v, &m), &s)| (v - m) / s));
                z
            })
            .collect();
        let targets: Vec<f64> = y.iter().map(|&l| l as f64).collect();

        let dim = p + 1;
        let lambda = 1.0 / config.c;
        // beta_j = w_j * s_j, so lambda * w_j^2 = (lambda / s_j^2) * beta_j^2
        let penalty: Vec<f64> = std::iter::once(0.0)
            .chain(stds.iter().map(|&s| lambda / (s * s)))
            .collect();
        let mut beta = vec![0.0; dim];
        let mut converged = false;
        let mut iterations = 0;

        let pb = ProgressBar::new(config.max_iter as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("   Fitting model [{bar:40.cyan/blue}] {pos}/{len} iterations {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        let mut current_loss = penalized_loss(&design, &targets, &beta, &penalty);

        while iterations < config.max_iter {
            iterations += 1;
            pb.inc(1);

            let probs: Vec<f64> = design.par_iter().map(|z| sigmoid(dot(z, &beta))).collect();

            // Gradient of the penalised negative log-likelihood
            let mut grad = design
                .par_iter()
                .zip(probs.par_iter().zip(targets.par_iter()))
                .fold(
                    || vec![0.0; dim],
                    |mut acc, (z, (&prob, &t))| {
                        let r = prob - t;
                        for (a, &zj) in acc.iter_mut().zip(z) {
                            *a += r * zj;
                        }
                        acc
                    },
                )
                .reduce(|| vec![0.0; dim], add_vectors);
            for j in 1..dim {
                grad[j] += penalty[j] * beta[j];
            }

            // Hessian: Z^T W Z + diag(penalty)
            let sqrt_w: Vec<f64> = probs.iter().map(|&q| (q * (1.0 - q)).sqrt()).collect();
            let zw = Mat::<f64>::from_fn(n, dim, |i, j| design[i][j] * sqrt_w[i]);
            let mut hessian = zw.transpose() * &zw;
            hessian[(0, 0)] += INTERCEPT_RIDGE;
            for j in 1..dim {
                hessian[(j, j)] += penalty[j];
            }

            let g = Mat::<f64>::from_fn(dim, 1, |i, _| grad[i]);
            let delta_mat = hessian.partial_piv_lu().solve(&g);
            let delta: Vec<f64> = (0..dim).map(|i| delta_mat[(i, 0)]).collect();
            if delta.iter().any(|d| !d.is_finite()) {
                pb.finish_and_clear();
                anyhow::bail!("Newton system is singular at iteration {}", iterations);
            }

            // Step halving until the loss does not increase
            let mut step = 1.0;
            let (candidate, candidate_loss) = loop {
                let candidate: Vec<f64> = beta
                    .iter()
                    .zip(&delta)
                    .map(|(&b, &d)| b - step * d)
                    .collect();
                let loss = penalized_loss(&design, &targets, &candidate, &penalty);
                if loss <= current_loss + 1e-12 || step < MIN_STEP {
                    break (candidate, loss);
                }
                step *= 0.5;
            };

            let max_update = delta
                .iter()
                .map(|d| (step * d).abs())
                .fold(0.0f64, f64::max);
            beta = candidate;
            current_loss = candidate_loss;

            if max_update < config.tolerance {
                converged = true;
                break;
            }
        }

        pb.finish_with_message(if converged { "converged" } else { "stopped" });

        // Undo standardisation: w_j = beta_j / s_j, b = beta_0 - sum(beta_j * m_j / s_j)
        let coefficients: Vec<f64> = beta[1..]
            .iter()
            .zip(&stds)
            .map(|(&b, &s)| b / s)
            .collect();
        let intercept = beta[0]
            - coefficients
                .iter()
                .zip(&means)
                .map(|(&w, &m)| w * m)
                .sum::<f64>();

        Ok(Self {
            coefficients,
            intercept,
            iterations,
            converged,
        })
    }

    /// Raw linear score of one example
    pub fn score_row(&self, row: &[f64]) -> f64 {
        dot(row, &self.coefficients) + self.intercept
    }

    /// Continuous decision scores (logits), one per row
    pub fn decision_function(&self, x: &FeatureMatrix) -> Vec<f64> {
        x.rows.par_iter().map(|r| self.score_row(r)).collect()
    }

    /// Probability of the positive class per row
    pub fn predict_proba(&self, x: &FeatureMatrix) -> Vec<f64> {
        self.decision_function(x).into_iter().map(sigmoid).collect()
    }

    /// Hard predictions at the default threshold (score > 0)
    pub fn predict(&self, x: &FeatureMatrix) -> Vec<u8> {
        self.decision_function(x)
            .into_iter()
            .map(|s| u8::from(s > 0.0))
            .collect()
    }

    /// Fraction of rows predicted correctly
    pub fn accuracy(&self, x: &FeatureMatrix, y: &[u8]) -> f64 {
        let preds = self.predict(x);
        if preds.is_empty() {
            return 0.0;
        }
        let correct = preds.iter().zip(y).filter(|(p, l)| p == l).count();
        correct as f64 / preds.len() as f64
    }

    /// Coefficients followed by the intercept, as f32
    pub fn weights_with_intercept(&self) -> Vec<f32> {
        self.coefficients
            .iter()
            .chain(std::iter::once(&self.intercept))
            .map(|&w| w as f32)
            .collect()
    }
}

/// Per-column mean and population standard deviation
fn column_moments(x: &FeatureMatrix) -> (Vec<f64>, Vec<f64>) {
    let n = x.n_rows() as f64;
    let (means, stds): (Vec<f64>, Vec<f64>) = (0..x.n_features())
        .into_par_iter()
        .map(|j| {
            let mean = x.rows.iter().map(|r| r[j]).sum::<f64>() / n;
            let var = x.rows.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / n;
            let std = var.sqrt();
            (mean, if std < MIN_STD { 1.0 } else { std })
        })
        .unzip();
    (means, stds)
}

fn penalized_loss(design: &[Vec<f64>], targets: &[f64], beta: &[f64], penalty: &[f64]) -> f64 {
    let nll: f64 = design
        .par_iter()
        .zip(targets.par_iter())
        .map(|(z, &t)| {
            let eta = dot(z, beta);
            softplus(eta) - t * eta
        })
        .sum();
    let ridge: f64 = beta.iter().zip(penalty).map(|(b, l)| l * b * b).sum();
    nll + 0.5 * ridge
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn add_vectors(mut a: Vec<f64>, b: Vec<f64>) -> Vec<f64> {
    for (x, y) in a.iter_mut().zip(b) {
        *x += y;
    }
    a
}

/// log(1 + e^x) without overflow
fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
