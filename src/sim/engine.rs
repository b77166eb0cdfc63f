use std::collections::VecDeque;

use fxhash::{FxHashMap, FxHashSet};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{Circuit, ComponentId, Wire};

/// Maximum number of component recomputations in a single step
pub const MAX_ITERATIONS: usize = 100;

/// Outcome of a simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Number of component recomputations performed
    pub iterations: usize,
    /// Whether a fixpoint was reached before the iteration limit
    pub converged: bool,
}

/// Event-driven simulation of a circuit
///
/// Only components whose inputs changed are recomputed. The engine does not own the circuit:
/// it is borrowed for the duration of each call, and the engine only keeps the set of
/// components that need to be recomputed.
/// Stale components are processed in the order they were marked, so that an acyclic circuit
/// listed in topological order settles with a single recomputation per component. With a
/// seed, the order is randomized.
#[derive(Debug, Clone, Default)]
pub struct PropagationEngine {
    /// Components to recompute
    work_list: VecDeque<ComponentId>,
    /// Whether a component is already in the work list
    is_stale: FxHashSet<ComponentId>,
    /// Random generator to pick the next component, if any
    rng: Option<SmallRng>,
}

impl PropagationEngine {
    /// Create an engine that processes stale components in first-in first-out order
    pub fn new() -> PropagationEngine {
        PropagationEngine::default()
    }

    /// Create an engine that processes stale components in a random order
    pub fn with_seed(seed: u64) -> PropagationEngine {
        PropagationEngine {
            rng: Some(SmallRng::seed_from_u64(seed)),
            ..Default::default()
        }
    }

    /// Number of components waiting to be recomputed
    pub fn nb_stale(&self) -> usize {
        self.work_list.len()
    }

    /// Whether a component is waiting to be recomputed
    pub fn is_stale(&self, id: ComponentId) -> bool {
        self.is_stale.contains(&id)
    }

    /// Mark a component for recomputation
    fn mark_stale(&mut self, id: ComponentId) {
        if self.is_stale.insert(id) {
            self.work_list.push_back(id);
        }
    }

    /// Pick the next component to recompute
    fn pop(&mut self) -> Option<ComponentId> {
        if self.work_list.is_empty() {
            return None;
        }
        let id = match &mut self.rng {
            Some(rng) => {
                let i = rng.gen_range(0..self.work_list.len());
                self.work_list.swap_remove_back(i)?
            }
            None => self.work_list.pop_front()?,
        };
        self.is_stale.remove(&id);
        Some(id)
    }

    /// Run a simulation step, until a fixpoint is reached or [`MAX_ITERATIONS`] recomputations
    ///
    /// All components are considered stale at the start. When the limit is hit, typically
    /// because of a loop that oscillates, the circuit is left in its last state.
    pub fn step(&mut self, circuit: &mut Circuit) -> StepResult {
        for c in circuit.components() {
            self.mark_stale(c.id());
        }
        let fanout = circuit.fanout();
        let mut iterations = 0;
        while iterations < MAX_ITERATIONS {
            let Some(id) = self.pop() else {
                break;
            };
            let Some(i) = circuit.position(id) else {
                continue;
            };
            iterations += 1;
            self.update_component(circuit, i, &fanout[i]);
        }
        StepResult {
            iterations,
            converged: self.work_list.is_empty(),
        }
    }

    /// Recompute a single component and propagate its outputs
    ///
    /// If the outputs changed, every fanout pin is rewritten and its component becomes stale.
    /// Otherwise, only the fanout pins that disagree with the outputs are rewritten: this is how
    /// the externally driven value of an Input reaches the rest of the circuit.
    fn update_component(&mut self, circuit: &mut Circuit, i: usize, fanout: &[Wire]) {
        let comp = circuit.component_at_mut(i);
        let kind = comp.kind();
        let changed = if kind.is_source() {
            false
        } else {
            let new_outputs = kind.eval(comp.inputs());
            let changed = new_outputs != comp.outputs();
            if changed {
                comp.set_outputs(new_outputs);
            }
            changed
        };
        let outputs = comp.outputs().to_vec();

        for w in fanout {
            let Some(&value) = outputs.get(w.from_pin) else {
                continue;
            };
            let Some(target) = circuit.component_mut(w.to) else {
                continue;
            };
            let Some(&current) = target.inputs().get(w.to_pin) else {
                continue;
            };
            if changed || current != value {
                target.set_input_pin(w.to_pin, value);
                self.mark_stale(w.to);
            }
        }
    }

    /// Drive the value of an Input component
    ///
    /// Components that are not Inputs, or do not exist, are silently ignored.
    pub fn set_input(&mut self, circuit: &mut Circuit, id: ComponentId, value: bool) {
        if let Some(c) = circuit.component_mut(id) {
            if c.drive(value) {
                self.mark_stale(id);
            }
        }
    }

    /// Put all pins of all components back to false
    pub fn reset(&mut self, circuit: &mut Circuit) {
        for i in 0..circuit.nb_components() {
            circuit.component_at_mut(i).clear_pins();
        }
        self.work_list.clear();
        self.is_stale.clear();
    }

    /// Values displayed by the Output and Led components
    pub fn get_outputs(&self, circuit: &Circuit) -> FxHashMap<ComponentId, Vec<bool>> {
        circuit
            .components()
            .iter()
            .filter(|c| c.kind().is_sink())
            .map(|c| (c.id(), c.inputs().to_vec()))
            .collect()
    }
}
