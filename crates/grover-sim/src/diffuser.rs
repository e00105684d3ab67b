//! The Grover diffusion operator (inversion about the mean).

use serde::{Deserialize, Serialize};

use crate::error::GroverResult;
use crate::statevector::StateVector;

/// How the diffuser realizes 2|s⟩⟨s| − I.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffusionMethod {
    /// Closed form aᵢ := 2μ − aᵢ, O(N).
    #[default]
    Reflection,
    /// H^⊗n, 2|0⟩⟨0| − I, H^⊗n, O(N·n).
    Decomposed,
}

/// Reflects every amplitude through the current mean.
///
/// The mean is taken from the state on every call; it changes from one Grover
/// iteration to the next and must never be cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diffuser {
    method: DiffusionMethod,
}

impl Diffuser {
    /// Diffuser using the closed-form reflection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffuser using the given realization.
    pub fn with_method(method: DiffusionMethod) -> Self {
        Self { method }
    }

    /// The realization in use.
    pub fn method(&self) -> DiffusionMethod {
        self.method
    }

    /// Apply inversion about the mean to `state`.
    pub fn apply(&self, state: &mut StateVector) -> GroverResult<()> {
        match self.method {
            DiffusionMethod::Reflection => state.apply_diffusion(),
            DiffusionMethod::Decomposed => state.apply_diffusion_decomposed(),
        }
    }
}
