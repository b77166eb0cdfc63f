//! Circuit generators and templates

/// Adder generators
pub mod adder {
    use crate::{Circuit, ComponentId, ComponentKind};

    /// Sum and carry of a full adder built from basic gates
    fn full_adder_logic(
        c: &mut Circuit,
        a: ComponentId,
        b: ComponentId,
        cin: ComponentId,
    ) -> (ComponentId, ComponentId) {
        let ab = c.add_gate(ComponentKind::Xor, &[a, b]);
        let sum = c.add_gate(ComponentKind::Xor, &[ab, cin]);
        let g = c.add_gate(ComponentKind::And, &[a, b]);
        let p = c.add_gate(ComponentKind::And, &[ab, cin]);
        let cout = c.add_gate(ComponentKind::Or, &[g, p]);
        (sum, cout)
    }

    /// A half adder: inputs a, b; outputs sum, carry
    pub fn half_adder() -> Circuit {
        let mut ret = Circuit::new();
        let a = ret.add_labelled(ComponentKind::Input, "a");
        let b = ret.add_labelled(ComponentKind::Input, "b");
        let s = ret.add_gate(ComponentKind::Xor, &[a, b]);
        let c = ret.add_gate(ComponentKind::And, &[a, b]);
        ret.add_output(s);
        ret.add_output(c);
        ret.check();
        ret
    }

    /// A full adder: inputs a, b, cin; outputs sum, cout
    pub fn full_adder() -> Circuit {
        let mut ret = Circuit::new();
        let a = ret.add_labelled(ComponentKind::Input, "a");
        let b = ret.add_labelled(ComponentKind::Input, "b");
        let cin = ret.add_labelled(ComponentKind::Input, "cin");
        let (s, cout) = full_adder_logic(&mut ret, a, b, cin);
        ret.add_output(s);
        ret.add_output(cout);
        ret.check();
        ret
    }

    /// A simple and slow ripple-carry adder
    ///
    /// Inputs are a0, b0, a1, b1, ... and the carry-in; outputs are the sum bits then the carry-out.
    pub fn ripple_carry(len: usize) -> Circuit {
        assert!(len > 0);
        let mut ret = Circuit::new();
        let mut pairs = Vec::new();
        for i in 0..len {
            let a = ret.add_labelled(ComponentKind::Input, &format!("a{i}"));
            let b = ret.add_labelled(ComponentKind::Input, &format!("b{i}"));
            pairs.push((a, b));
        }
        let mut c = ret.add_labelled(ComponentKind::Input, "cin");
        let mut sums = Vec::new();
        for (a, b) in pairs {
            let (s, next_c) = full_adder_logic(&mut ret, a, b, c);
            sums.push(s);
            c = next_c;
        }
        for s in sums {
            ret.add_output(s);
        }
        ret.add_output(c);
        ret.check();
        ret
    }
}

/// Simple generators to test functionality
pub mod testcases {
    use crate::{Circuit, ComponentKind};

    /// A single gate driven by fresh inputs and observed by an Output
    pub fn single_gate(kind: ComponentKind) -> Circuit {
        assert!(kind.is_gate());
        let mut ret = Circuit::new();
        let inputs: Vec<_> = (0..kind.nb_inputs()).map(|_| ret.add_input()).collect();
        let g = ret.add_gate(kind, &inputs);
        ret.add_output(g);
        ret.check();
        ret
    }

    /// A chain of inverters closed on itself, observed by a Led
    ///
    /// With an odd length, the loop has no stable state and oscillates forever.
    pub fn inverter_ring(len: usize) -> Circuit {
        assert!(len > 0);
        let mut ret = Circuit::new();
        let first = ret.add(ComponentKind::Not);
        let mut last = first;
        for _ in 1..len {
            last = ret.add_gate(ComponentKind::Not, &[last]);
        }
        ret.add_wire(last, 0, first, 0);
        let led = ret.add(ComponentKind::Led);
        ret.add_wire(last, 0, led, 0);
        ret.check();
        ret
    }

    /// An input driving an inverter, whose output fans out to several sinks
    pub fn fanout(nb_sinks: usize) -> Circuit {
        let mut ret = Circuit::new();
        let i = ret.add_input();
        let n = ret.add_gate(ComponentKind::Not, &[i]);
        for k in 0..nb_sinks {
            let kind = if k % 2 == 0 {
                ComponentKind::Output
            } else {
                ComponentKind::Led
            };
            let o = ret.add(kind);
            ret.add_wire(n, 0, o, 0);
        }
        ret.check();
        ret
    }

    /// A chain of buffers made of pairs of inverters, from one input to one output
    pub fn inverter_chain(len: usize) -> Circuit {
        let mut ret = Circuit::new();
        let mut s = ret.add_input();
        for _ in 0..len {
            s = ret.add_gate(ComponentKind::Not, &[s]);
        }
        ret.add_output(s);
        ret.check();
        ret
    }
}

/// Random generators for property testing
pub mod random {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use crate::{Circuit, ComponentKind};

    const GATE_KINDS: [ComponentKind; 6] = [
        ComponentKind::And,
        ComponentKind::Or,
        ComponentKind::Not,
        ComponentKind::Xor,
        ComponentKind::Nand,
        ComponentKind::Nor,
    ];

    /// A random acyclic circuit
    ///
    /// Each gate is driven by inputs or earlier gates only, so the circuit always
    /// has a single stable state for each input assignment.
    pub fn acyclic(nb_inputs: usize, nb_gates: usize, nb_outputs: usize, seed: u64) -> Circuit {
        assert!(nb_inputs > 0);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ret = Circuit::new();
        let mut signals: Vec<_> = (0..nb_inputs).map(|_| ret.add_input()).collect();
        for _ in 0..nb_gates {
            let kind = GATE_KINDS[rng.gen_range(0..GATE_KINDS.len())];
            let drivers: Vec<_> = (0..kind.nb_inputs())
                .map(|_| signals[rng.gen_range(0..signals.len())])
                .collect();
            signals.push(ret.add_gate(kind, &drivers));
        }
        for _ in 0..nb_outputs {
            let s = signals[rng.gen_range(0..signals.len())];
            ret.add_output(s);
        }
        ret.check();
        ret
    }
}
