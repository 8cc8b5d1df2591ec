//! State machine trait for phase enums.
//!
//! Gives every closed set of dialogue steps the same interface for checking
//! and performing transitions, so an illegal move surfaces as a typed error
//! instead of silently writing a bogus phase.

use std::fmt::Debug;

use super::{DomainError, ErrorCode};

/// Trait for enums that represent state machines.
///
/// Implementors list their legal moves; `transition_to` and `is_terminal`
/// come for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for Phase {
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Phase::PedirDni => vec![Phase::PedirDni, Phase::ConfirmarDni, Phase::Inicio],
///             // ... etc
///         }
///     }
/// }
///
/// let next = current.transition_to(Phase::ConfirmarDni)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + Debug {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {:?} to {:?}", self, target),
            )
            .with_detail("from", format!("{:?}", self))
            .with_detail("to", format!("{:?}", target)))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
