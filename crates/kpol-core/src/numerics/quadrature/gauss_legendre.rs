use super::{IntegrationRange, Quadrature, QuadratureError, QuadratureValue};
use std::f64::consts::PI;

const NEWTON_TOLERANCE: f64 = 1.0e-15;
const NEWTON_MAX_ITERATIONS: usize = 100;

/// Fixed-node Gauss-Legendre rule. Nodes and weights on `[-1, 1]` are
/// computed once by Newton iteration on `P_n`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    pub const DEFAULT_NODES: usize = 300;

    pub fn new(node_count: usize) -> Result<Self, QuadratureError> {
        if node_count == 0 {
            return Err(QuadratureError::InvalidNodeCount { nodes: node_count });
        }
        Ok(Self::build(node_count))
    }

    fn build(node_count: usize) -> Self {
        let mut nodes = vec![0.0; node_count];
        let mut weights = vec![0.0; node_count];
        let n = node_count as f64;

        for index in 0..node_count.div_ceil(2) {
            let mut z = (PI * (index as f64 + 0.75) / (n + 0.5)).cos();
            let mut derivative = 0.0;
            for _ in 0..NEWTON_MAX_ITERATIONS {
                let (value, slope) = legendre_with_derivative(node_count, z);
                derivative = slope;
                let step = value / slope;
                z -= step;
                if step.abs() <= NEWTON_TOLERANCE {
                    break;
                }
            }
            if derivative == 0.0 {
                derivative = legendre_with_derivative(node_count, z).1;
            }

            let weight = 2.0 / ((1.0 - z * z) * derivative * derivative);
            let mirror = node_count - 1 - index;
            nodes[index] = -z;
            nodes[mirror] = z;
            weights[index] = weight;
            weights[mirror] = weight;
        }

        Self { nodes, weights }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Applies the rule on `[lower, upper]` to any summable codomain.
    pub fn apply<T, F>(&self, integrand: F, lower: f64, upper: f64) -> T
    where
        F: Fn(f64) -> T,
        T: std::ops::Mul<f64, Output = T> + std::iter::Sum<T>,
    {
        let center = 0.5 * (upper + lower);
        let half_length = 0.5 * (upper - lower);
        let sum: T = self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(node, weight)| integrand(center + half_length * node) * *weight)
            .sum();
        sum * half_length
    }
}

impl Default for GaussLegendre {
    fn default() -> Self {
        Self::build(Self::DEFAULT_NODES)
    }
}

impl Quadrature for GaussLegendre {
    fn integrate(
        &self,
        integrand: &dyn Fn(f64) -> f64,
        range: IntegrationRange,
    ) -> Result<QuadratureValue, QuadratureError> {
        range.validate()?;
        let (lower, upper) = range.parameter_bounds();
        let transformed = range.transform(integrand);
        let value = self.apply(&transformed, lower, upper);
        if !value.is_finite() {
            return Err(QuadratureError::NonFiniteIntegrand { lower, upper });
        }
        Ok(QuadratureValue {
            value,
            error: 0.0,
            evaluations: self.node_count(),
            subdivisions: 1,
        })
    }
}

/// `(P_n(z), P_n'(z))` from the three-term recurrence.
fn legendre_with_derivative(order: usize, z: f64) -> (f64, f64) {
    let mut current = 1.0;
    let mut previous = 0.0;
    for degree in 1..=order {
        let before = previous;
        previous = current;
        let k = degree as f64;
        current = ((2.0 * k - 1.0) * z * previous - (k - 1.0) * before) / k;
    }
    let derivative = order as f64 * (z * current - previous) / (z * z - 1.0);
    (current, derivative)
}
