//! Dialogue phases of a customer conversation.
//!
//! A phase is the step a user's conversation is parked at between two
//! inbound messages. Two phases (`validar_reclamo`, `ejecutar_accion`) never
//! wait for input: they are only ever entered through a same-turn cascade.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// The current step of a user's conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for free text to classify.
    Inicio,

    /// Waiting for the customer to pick which contact field to update.
    SeleccionarDato,

    /// Waiting for a numeric national id.
    PedirDni,

    /// Waiting for a yes/no on the resolved customer name.
    ConfirmarDni,

    /// Waiting for the complaint description.
    SolicitarDescripcion,

    /// Running the claim validator on the stored description.
    ValidarReclamo,

    /// Waiting for a complaint id to show in detail.
    ConsultarReclamos,

    /// Waiting for the new value of the selected field.
    ConfirmarActualizacion,

    /// Performing the registered action against the domain services.
    EjecutarAccion,
}

impl Phase {
    pub const ALL: [Phase; 9] = [
        Phase::Inicio,
        Phase::SeleccionarDato,
        Phase::PedirDni,
        Phase::ConfirmarDni,
        Phase::SolicitarDescripcion,
        Phase::ValidarReclamo,
        Phase::ConsultarReclamos,
        Phase::ConfirmarActualizacion,
        Phase::EjecutarAccion,
    ];

    /// Persisted name of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inicio => "inicio",
            Self::SeleccionarDato => "seleccionar_dato",
            Self::PedirDni => "pedir_dni",
            Self::ConfirmarDni => "confirmar_dni",
            Self::SolicitarDescripcion => "solicitar_descripcion",
            Self::ValidarReclamo => "validar_reclamo",
            Self::ConsultarReclamos => "consultar_reclamos",
            Self::ConfirmarActualizacion => "confirmar_actualizacion",
            Self::EjecutarAccion => "ejecutar_accion",
        }
    }

    /// Returns true if the phase runs without waiting for a new message.
    pub fn is_automatic(&self) -> bool {
        matches!(self, Self::ValidarReclamo | Self::EjecutarAccion)
    }

    /// Returns true if cancel keywords abort the flow from this phase.
    pub fn is_cancellable(&self) -> bool {
        !matches!(self, Self::Inicio)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Inicio
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("fase", format!("unknown phase '{}'", s)))
    }
}

impl StateMachine for Phase {
    fn valid_transitions(&self) -> Vec<Self> {
        use Phase::*;
        match self {
            Inicio => vec![Inicio, SeleccionarDato, PedirDni],
            SeleccionarDato => vec![SeleccionarDato, PedirDni, Inicio],
            PedirDni => vec![PedirDni, ConfirmarDni, Inicio],
            ConfirmarDni => vec![
                ConfirmarDni,
                SolicitarDescripcion,
                ConsultarReclamos,
                ConfirmarActualizacion,
                Inicio,
            ],
            SolicitarDescripcion => vec![SolicitarDescripcion, ValidarReclamo, Inicio],
            ValidarReclamo => vec![EjecutarAccion, SolicitarDescripcion, Inicio],
            ConsultarReclamos => vec![ConsultarReclamos, Inicio],
            ConfirmarActualizacion => vec![EjecutarAccion, Inicio],
            EjecutarAccion => vec![Inicio],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod phase_basics {
        use super::*;

        #[test]
        fn default_phase_is_inicio() {
            assert_eq!(Phase::default(), Phase::Inicio);
        }

        #[test]
        fn serializes_to_persisted_name() {
            for phase in Phase::ALL {
                let json = serde_json::to_string(&phase).unwrap();
                assert_eq!(json, format!("\"{}\"", phase.as_str()));
            }
        }

        #[test]
        fn parses_every_persisted_name() {
            for phase in Phase::ALL {
                assert_eq!(phase.as_str().parse::<Phase>().unwrap(), phase);
            }
        }

        #[test]
        fn rejects_unknown_names() {
            assert!("esperando".parse::<Phase>().is_err());
            assert!("INICIO".parse::<Phase>().is_err());
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn every_phase_can_return_to_inicio() {
            for phase in Phase::ALL {
                assert!(
                    phase.can_transition_to(&Phase::Inicio),
                    "{:?} must be able to reset",
                    phase
                );
            }
        }

        #[test]
        fn no_phase_is_terminal() {
            for phase in Phase::ALL {
                assert!(!phase.is_terminal());
            }
        }

        #[test]
        fn automatic_phases_never_loop_on_themselves() {
            for phase in Phase::ALL.into_iter().filter(Phase::is_automatic) {
                assert!(!phase.can_transition_to(&phase));
            }
        }

        #[test]
        fn identity_must_be_confirmed_before_any_action() {
            assert!(!Phase::PedirDni.can_transition_to(&Phase::SolicitarDescripcion));
            assert!(!Phase::Inicio.can_transition_to(&Phase::EjecutarAccion));
        }

        #[test]
        fn validation_can_send_back_for_a_new_description() {
            assert!(Phase::ValidarReclamo
                .transition_to(Phase::SolicitarDescripcion)
                .is_ok());
        }

        #[test]
        fn only_inicio_ignores_cancel() {
            let non_cancellable: Vec<_> =
                Phase::ALL.into_iter().filter(|p| !p.is_cancellable()).collect();
            assert_eq!(non_cancellable, vec![Phase::Inicio]);
        }
    }
}
