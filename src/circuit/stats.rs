//! Compute circuit statistics
//!
//! ```
//! # use gatesim::Circuit;
//! # let circuit = Circuit::new();
//! use gatesim::circuit::stats::stats;
//! let stats = stats(&circuit);
//!
//! // Check that there is no Xor gate
//! assert_eq!(stats.nb_of(gatesim::ComponentKind::Xor), 0);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use crate::{Circuit, ComponentKind};

/// Number of components of each kind in a circuit
#[derive(Clone, Debug)]
pub struct CircuitStats {
    /// Number of components, by kind
    pub nb_by_kind: Vec<(ComponentKind, usize)>,
    /// Number of wires
    pub nb_wires: usize,
    /// Number of input pins driven by several wires
    pub nb_multiply_driven: usize,
}

impl CircuitStats {
    /// Number of components of a given kind
    pub fn nb_of(&self, kind: ComponentKind) -> usize {
        self.nb_by_kind
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, nb)| *nb)
            .unwrap_or(0)
    }

    /// Number of Input components
    pub fn nb_inputs(&self) -> usize {
        self.nb_of(ComponentKind::Input)
    }

    /// Number of Output and Led components
    pub fn nb_outputs(&self) -> usize {
        self.nb_of(ComponentKind::Output) + self.nb_of(ComponentKind::Led)
    }

    /// Total number of logic gates
    pub fn nb_gates(&self) -> usize {
        self.nb_by_kind
            .iter()
            .filter(|(k, _)| k.is_gate())
            .map(|(_, nb)| nb)
            .sum()
    }
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Inputs: {}", self.nb_inputs())?;
        writeln!(f, "  Outputs: {}", self.nb_outputs())?;
        writeln!(f, "  Gates: {}", self.nb_gates())?;
        for (k, nb) in &self.nb_by_kind {
            if k.is_gate() && *nb != 0 {
                writeln!(f, "      {}: {}", k, nb)?;
            }
        }
        writeln!(f, "  Wires: {}", self.nb_wires)?;
        if self.nb_multiply_driven != 0 {
            writeln!(f, "  Pins with several drivers: {}", self.nb_multiply_driven)?;
        }
        fmt::Result::Ok(())
    }
}

/// Compute the statistics of the circuit
pub fn stats(c: &Circuit) -> CircuitStats {
    let mut nb_by_kind: Vec<(ComponentKind, usize)> =
        ComponentKind::ALL.iter().map(|k| (*k, 0)).collect();
    for comp in c.components() {
        for (k, nb) in nb_by_kind.iter_mut() {
            if *k == comp.kind() {
                *nb += 1;
            }
        }
    }
    CircuitStats {
        nb_by_kind,
        nb_wires: c.nb_wires(),
        nb_multiply_driven: c.multiply_driven_pins().len(),
    }
}
