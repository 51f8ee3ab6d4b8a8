//! Values with first-order (linearized Gaussian) uncertainty.
//!
//! An [`Uncertain`] value is a nominal value plus its sensitivity to each
//! independent variable it was computed from. Independent variables are
//! identified by a tag; two values derived from the same tagged variable are
//! correlated, so `x - x` has zero uncertainty.
//!
//! The standard deviation is
//!
//! ```text
//! σ_f = sqrt( Σ_v (∂f/∂v · σ_v)² )
//! ```
//!
//! Operations are explicit methods rather than operator overloads so each
//! propagation rule is visible at the call site.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Term {
    std_dev: f64,
    derivative: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Uncertain {
    nominal: f64,
    terms: BTreeMap<String, Term>,
}

impl Uncertain {
    /// An independent variable with standard deviation `std_dev`.
    pub fn variable(nominal: f64, std_dev: f64, tag: impl Into<String>) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(
            tag.into(),
            Term {
                std_dev: std_dev.abs(),
                derivative: 1.0,
            },
        );
        Self { nominal, terms }
    }

    /// A value known exactly.
    pub fn exact(nominal: f64) -> Self {
        Self {
            nominal,
            terms: BTreeMap::new(),
        }
    }

    pub fn nominal(&self) -> f64 {
        self.nominal
    }

    pub fn std_dev(&self) -> f64 {
        self.terms
            .values()
            .map(|t| {
                let c = t.derivative * t.std_dev;
                c * c
            })
            .sum::<f64>()
            .sqrt()
    }

    /// `∂self/∂v` for the variable tagged `tag` (zero if unrelated).
    pub fn derivative(&self, tag: &str) -> f64 {
        self.terms.get(tag).map(|t| t.derivative).unwrap_or(0.0)
    }

    /// `k·self`
    pub fn scale(&self, k: f64) -> Self {
        Self {
            nominal: k * self.nominal,
            terms: self
                .terms
                .iter()
                .map(|(tag, t)| {
                    (
                        tag.clone(),
                        Term {
                            std_dev: t.std_dev,
                            derivative: k * t.derivative,
                        },
                    )
                })
                .collect(),
        }
    }

    /// `self + k`
    pub fn offset(&self, k: f64) -> Self {
        Self {
            nominal: self.nominal + k,
            terms: self.terms.clone(),
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::affine(&[(1.0, self), (1.0, other)], 0.0)
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::affine(&[(1.0, self), (-1.0, other)], 0.0)
    }

    /// Product rule: `∂(fg) = g·∂f + f·∂g`.
    pub fn mul(&self, other: &Self) -> Self {
        let mut out = Self::exact(self.nominal * other.nominal);
        out.accumulate(self, other.nominal);
        out.accumulate(other, self.nominal);
        out
    }

    /// `self^n`
    pub fn powi(&self, n: i32) -> Self {
        let nominal = self.nominal.powi(n);
        let slope = if n == 0 {
            0.0
        } else {
            f64::from(n) * self.nominal.powi(n - 1)
        };
        let mut out = Self::exact(nominal);
        out.accumulate(self, slope);
        out
    }

    /// `constant + Σ kᵢ·uᵢ`
    pub fn affine(parts: &[(f64, &Self)], constant: f64) -> Self {
        let nominal = constant + parts.iter().map(|(k, u)| k * u.nominal).sum::<f64>();
        let mut out = Self::exact(nominal);
        for (k, u) in parts {
            out.accumulate(u, *k);
        }
        out
    }

    /// Add `k·∂u` into this value's sensitivities.
    fn accumulate(&mut self, u: &Self, k: f64) {
        for (tag, t) in &u.terms {
            self.terms
                .entry(tag.clone())
                .and_modify(|existing| existing.derivative += k * t.derivative)
                .or_insert(Term {
                    std_dev: t.std_dev,
                    derivative: k * t.derivative,
                });
        }
    }
}
