//! Simulation of a circuit: event-driven propagation and truth tables
//!
//! ```
//! # use gatesim::{Circuit, ComponentKind};
//! use gatesim::sim::{generate_truth_table, PropagationEngine};
//! let mut circuit = Circuit::new();
//! let a = circuit.add_input();
//! let b = circuit.add_input();
//! let x = circuit.add_gate(ComponentKind::And, &[a, b]);
//! let o = circuit.add_output(x);
//!
//! // Drive the inputs and propagate
//! let mut engine = PropagationEngine::new();
//! engine.set_input(&mut circuit, a, true);
//! engine.set_input(&mut circuit, b, true);
//! assert!(engine.step(&mut circuit).converged);
//! assert_eq!(engine.get_outputs(&circuit)[&o], vec![true]);
//!
//! // Enumerate all input values
//! let table = generate_truth_table(&circuit);
//! assert_eq!(table.len(), 4);
//! assert_eq!(table[3].outputs, vec![true]);
//! ```

mod engine;
mod truth_table;

use crate::Circuit;

pub use engine::{PropagationEngine, StepResult, MAX_ITERATIONS};
pub use truth_table::{generate_truth_table, TruthTableGenerator, TruthTableRow, MAX_TABLE_INPUTS};

/// Simulate a circuit for a single input assignment; return the values of the outputs
///
/// Input values are given in circuit order, and output values are returned in circuit order.
/// The circuit itself is not modified.
pub fn simulate(circuit: &Circuit, input_values: &[bool]) -> Vec<bool> {
    assert_eq!(input_values.len(), circuit.nb_inputs());
    let mut copy = circuit.clone();
    let mut engine = PropagationEngine::new();
    for (id, v) in circuit.input_ids().into_iter().zip(input_values) {
        engine.set_input(&mut copy, id, *v);
    }
    engine.step(&mut copy);
    circuit
        .output_ids()
        .iter()
        .map(|id| copy.component(*id).and_then(|c| c.value()).unwrap_or(false))
        .collect()
}
