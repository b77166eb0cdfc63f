use crate::sim::{PropagationEngine, StepResult};
use crate::{Circuit, ComponentId};

/// Maximum number of Input components for truth table generation
pub const MAX_TABLE_INPUTS: usize = 16;

/// A single row of a truth table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTableRow {
    /// Value of each Input component
    pub inputs: Vec<bool>,
    /// Value displayed by each Output or Led component
    pub outputs: Vec<bool>,
    /// Index of the row; input i contributes bit i
    pub row_index: usize,
}

/// Exhaustive enumeration of the input assignments of a circuit
///
/// Inputs and outputs are ordered as they appear in the circuit. Each row is simulated
/// on a separate copy of the circuit, so rows are independent from each other and the
/// original circuit is never modified.
#[derive(Debug, Clone)]
pub struct TruthTableGenerator<'a> {
    circuit: &'a Circuit,
    inputs: Vec<ComponentId>,
    outputs: Vec<ComponentId>,
    seed: Option<u64>,
}

impl<'a> TruthTableGenerator<'a> {
    /// Prepare the enumeration
    ///
    /// Returns None if the circuit has no input, no output, or more than
    /// [`MAX_TABLE_INPUTS`] inputs.
    pub fn new(circuit: &'a Circuit) -> Option<TruthTableGenerator<'a>> {
        let inputs = circuit.input_ids();
        let outputs = circuit.output_ids();
        if inputs.is_empty() || outputs.is_empty() {
            return None;
        }
        if inputs.len() > MAX_TABLE_INPUTS {
            eprintln!(
                "Warning: circuit has {} inputs, too many for truth table generation (max {})",
                inputs.len(),
                MAX_TABLE_INPUTS
            );
            return None;
        }
        Some(TruthTableGenerator {
            circuit,
            inputs,
            outputs,
            seed: None,
        })
    }

    /// Simulate each row with a randomized processing order
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of Input components
    pub fn nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of Output and Led components
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Number of rows in the table
    pub fn nb_rows(&self) -> usize {
        1 << self.nb_inputs()
    }

    /// Input components, in table order
    pub fn input_ids(&self) -> &[ComponentId] {
        &self.inputs
    }

    /// Output and Led components, in table order
    pub fn output_ids(&self) -> &[ComponentId] {
        &self.outputs
    }

    /// Simulate a single row
    ///
    /// If the circuit does not settle for this assignment, the row holds the values left when
    /// the iteration limit was hit; use [`Self::row_with_status`] to detect it.
    pub fn row(&self, row_index: usize) -> TruthTableRow {
        self.row_with_status(row_index).0
    }

    /// Simulate a single row, and report whether the simulation converged
    pub fn row_with_status(&self, row_index: usize) -> (TruthTableRow, StepResult) {
        assert!(row_index < self.nb_rows());
        let mut circuit = self.circuit.clone();
        let mut engine = match self.seed {
            Some(s) => PropagationEngine::with_seed(s.wrapping_add(row_index as u64)),
            None => PropagationEngine::new(),
        };
        for (k, id) in self.inputs.iter().enumerate() {
            engine.set_input(&mut circuit, *id, (row_index >> k) & 1 != 0);
        }
        let status = engine.step(&mut circuit);

        let inputs = self
            .inputs
            .iter()
            .map(|id| {
                circuit
                    .component(*id)
                    .and_then(|c| c.outputs().first().copied())
                    .unwrap_or(false)
            })
            .collect();
        let outputs = self
            .outputs
            .iter()
            .map(|id| {
                circuit
                    .component(*id)
                    .and_then(|c| c.inputs().first().copied())
                    .unwrap_or(false)
            })
            .collect();
        let row = TruthTableRow {
            inputs,
            outputs,
            row_index,
        };
        (row, status)
    }

    /// Simulate all rows, in increasing index order
    pub fn rows(&self) -> impl Iterator<Item = TruthTableRow> + '_ {
        (0..self.nb_rows()).map(move |i| self.row(i))
    }
}

/// Generate the truth table of a circuit
///
/// The table is empty if the circuit has no input, no output, or more than
/// [`MAX_TABLE_INPUTS`] inputs.
pub fn generate_truth_table(circuit: &Circuit) -> Vec<TruthTableRow> {
    match TruthTableGenerator::new(circuit) {
        Some(gen) => gen.rows().collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{generate_truth_table, TruthTableGenerator};
    use crate::sim::MAX_ITERATIONS;
    use crate::circuit::generators::{adder, random, testcases};
    use crate::{Circuit, ComponentKind};

    fn outputs(kind: ComponentKind) -> Vec<bool> {
        generate_truth_table(&testcases::single_gate(kind))
            .iter()
            .map(|r| r.outputs[0])
            .collect()
    }

    #[test]
    fn test_single_gates() {
        assert_eq!(outputs(ComponentKind::And), vec![false, false, false, true]);
        assert_eq!(outputs(ComponentKind::Or), vec![false, true, true, true]);
        assert_eq!(outputs(ComponentKind::Xor), vec![false, true, true, false]);
        assert_eq!(outputs(ComponentKind::Nand), vec![true, true, true, false]);
        assert_eq!(outputs(ComponentKind::Nor), vec![true, false, false, false]);
        assert_eq!(outputs(ComponentKind::Not), vec![true, false]);
    }

    #[test]
    fn test_and_rows() {
        let table = generate_truth_table(&testcases::single_gate(ComponentKind::And));
        assert_eq!(table.len(), 4);
        for (i, row) in table.iter().enumerate() {
            assert_eq!(row.row_index, i);
            assert_eq!(row.inputs, vec![i & 1 != 0, i & 2 != 0]);
            assert_eq!(row.outputs, vec![i == 3]);
        }
    }

    #[test]
    fn test_ripple_carry() {
        let c = adder::ripple_carry(2);
        let table = generate_truth_table(&c);
        assert_eq!(table.len(), 32);
        for row in &table {
            // Inputs are a0, b0, a1, b1, cin
            let bit = |k: usize| row.inputs[k] as usize;
            let a = bit(0) + 2 * bit(2);
            let b = bit(1) + 2 * bit(3);
            let sum = a + b + bit(4);
            let got: usize = row
                .outputs
                .iter()
                .enumerate()
                .map(|(k, v)| (*v as usize) << k)
                .sum();
            assert_eq!(got, sum, "row {}", row.row_index);
        }
    }

    fn check_adder(len: usize) {
        let c = adder::ripple_carry(len);
        let gen = TruthTableGenerator::new(&c).unwrap();
        for i in 0..gen.nb_rows() {
            let (row, status) = gen.row_with_status(i);
            assert!(status.converged, "row {i}");
            let value = |bits: &[bool]| -> usize {
                bits.iter()
                    .enumerate()
                    .map(|(k, v)| (*v as usize) << k)
                    .sum()
            };
            // Inputs are interleaved as a0, b0, a1, b1, ..., then cin
            let a: Vec<_> = (0..len).map(|k| row.inputs[2 * k]).collect();
            let b: Vec<_> = (0..len).map(|k| row.inputs[2 * k + 1]).collect();
            let cin = row.inputs[2 * len] as usize;
            assert_eq!(
                value(&row.outputs),
                value(&a) + value(&b) + cin,
                "row {i} of {len}-bit adder"
            );
        }
    }

    #[test]
    fn test_larger_adders() {
        for len in 5..=7 {
            check_adder(len);
        }
    }

    #[test]
    fn test_oscillation_status() {
        // XOR with an inverter loop: stable when the input is 1, oscillating when it is 0
        let mut c = Circuit::new();
        let i = c.add_input();
        let x = c.add(ComponentKind::Xor);
        c.add_wire(i, 0, x, 0);
        let n = c.add_gate(ComponentKind::Not, &[x]);
        c.add_wire(n, 0, x, 1);
        c.add_output(n);

        let gen = TruthTableGenerator::new(&c).unwrap();
        let (row, status) = gen.row_with_status(0);
        assert!(!status.converged);
        assert_eq!(status.iterations, MAX_ITERATIONS);
        assert_eq!(row.outputs.len(), 1);
        let (row, status) = gen.row_with_status(1);
        assert!(status.converged);
        assert_eq!(row.inputs, vec![true]);
        assert_eq!(gen.row(1), row);
    }

    #[test]
    fn test_randomized_order() {
        for seed in 0..5 {
            let c = random::acyclic(4, 10, 3, seed);
            let reference = generate_truth_table(&c);
            let gen = TruthTableGenerator::new(&c).unwrap().with_seed(seed + 100);
            let shuffled: Vec<_> = gen.rows().collect();
            assert_eq!(shuffled, reference);
        }
    }

    #[test]
    fn test_circuit_untouched() {
        let c = adder::full_adder();
        let before = format!("{c}");
        let table = generate_truth_table(&c);
        assert_eq!(table.len(), 8);
        assert_eq!(format!("{c}"), before);
    }

    #[test]
    fn test_empty() {
        let mut c = Circuit::new();
        assert!(generate_truth_table(&c).is_empty());
        let i = c.add_input();
        c.add_gate(ComponentKind::Not, &[i]);
        // No output
        assert!(generate_truth_table(&c).is_empty());

        // No input
        let mut c = Circuit::new();
        let n = c.add(ComponentKind::Not);
        c.add_output(n);
        assert!(generate_truth_table(&c).is_empty());
    }

    #[test]
    fn test_too_many_inputs() {
        let mut c = Circuit::new();
        let ids: Vec<_> = (0..17).map(|_| c.add_input()).collect();
        c.add_output(ids[0]);
        assert!(TruthTableGenerator::new(&c).is_none());
        assert!(generate_truth_table(&c).is_empty());

        // Exactly at the limit
        c.remove_component(ids[16]);
        let gen = TruthTableGenerator::new(&c).unwrap();
        assert_eq!(gen.nb_rows(), 1 << 16);
    }

    #[test]
    fn test_contiguous() {
        let mut c = Circuit::new();
        let ids: Vec<_> = (0..10).map(|_| c.add_input()).collect();
        let x = c.add_gate(ComponentKind::Xor, &[ids[0], ids[9]]);
        c.add_output(x);
        let table = generate_truth_table(&c);
        assert_eq!(table.len(), 1024);
        for (i, row) in table.iter().enumerate() {
            assert_eq!(row.row_index, i);
            assert_eq!(row.inputs.len(), 10);
            assert_eq!(row.outputs, vec![(i & 1 != 0) != (i & 512 != 0)]);
        }
    }

    #[test]
    fn test_led_sink() {
        let mut c = Circuit::new();
        let i = c.add_input();
        let led = c.add(ComponentKind::Led);
        c.add_wire(i, 0, led, 0);
        let table = generate_truth_table(&c);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].outputs, vec![false]);
        assert_eq!(table[1].outputs, vec![true]);
    }
}
