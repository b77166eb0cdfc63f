//! Combinational logic circuit simulation
//!
//! This crate evaluates circuits made of logic gates, input sources and output sinks connected by
//! wires, and builds their truth tables.
//!
//! # Usage
//!
//! Gatesim is distributed as a library as well as a binary program.
//!
//! ```bash
//! # Show available commands
//! gatesim help
//! # Generate a 2-bit adder and show its statistics
//! gatesim generate adder --size 2 -o adder.bench
//! gatesim show adder.bench
//! # Simulate it for a single input assignment
//! gatesim simulate adder.bench --set a0=1 --set b0=1
//! # Enumerate all input assignments
//! gatesim table adder.bench -o adder.table
//! ```
//!
//! # Datastructures
//!
//! `Circuit` holds components and wires, as a graphical editor would build them.
//! Each component has a kind from a fixed set (And, Or, Not, Xor, Nand, Nor, Input, Output, Led),
//! and vectors of input and output values whose sizes are fixed by the kind.
//! Wires connect one output pin to one input pin. Loops are allowed, but there is no sequential
//! element: a loop either settles or oscillates.
//!
//! For example, here is a half adder:
//! ```
//! # use gatesim::{Circuit, ComponentKind};
//! let mut circuit = Circuit::new();
//! let a = circuit.add_input();
//! let b = circuit.add_input();
//! let sum = circuit.add_gate(ComponentKind::Xor, &[a, b]);
//! let carry = circuit.add_gate(ComponentKind::And, &[a, b]);
//! circuit.add_output(sum);
//! circuit.add_output(carry);
//! assert_eq!(gatesim::sim::simulate(&circuit, &[true, true]), vec![false, true]);
//! ```
//!
//! # Simulation
//!
//! `PropagationEngine` propagates values from the inputs: only components whose inputs changed
//! are recomputed, and a step stops once nothing changes anymore, or after a fixed number of
//! recomputations for circuits that never settle.
//! Truth tables are built by simulating an independent copy of the circuit for each input
//! assignment.

#![warn(missing_docs)]

pub mod circuit;
pub mod cmd;
pub mod io;
pub mod sim;

pub use circuit::{stats, Circuit, Component, ComponentId, ComponentKind, Wire, WireId};
