use std::fmt;
use std::str::FromStr;

/// Kind of a circuit component
///
/// The set of kinds is closed: each one has a fixed number of input and output pins,
/// and a pure transfer function from input values to output values.
/// Inputs are signal sources whose value is driven externally, while Output and Led
/// are sinks that display the value of their single input.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum ComponentKind {
    /// 2-input And gate
    And,
    /// 2-input Or gate
    Or,
    /// Inverter
    Not,
    /// 2-input Xor gate
    Xor,
    /// 2-input Nand gate
    Nand,
    /// 2-input Nor gate
    Nor,
    /// Externally driven signal source
    Input,
    /// Output sink
    Output,
    /// Led sink
    Led,
}

impl ComponentKind {
    /// All component kinds, in declaration order
    pub const ALL: [ComponentKind; 9] = [
        ComponentKind::And,
        ComponentKind::Or,
        ComponentKind::Not,
        ComponentKind::Xor,
        ComponentKind::Nand,
        ComponentKind::Nor,
        ComponentKind::Input,
        ComponentKind::Output,
        ComponentKind::Led,
    ];

    /// Number of input pins
    pub fn nb_inputs(&self) -> usize {
        use ComponentKind::*;
        match self {
            And | Or | Xor | Nand | Nor => 2,
            Not | Output | Led => 1,
            Input => 0,
        }
    }

    /// Number of output pins
    pub fn nb_outputs(&self) -> usize {
        use ComponentKind::*;
        match self {
            And | Or | Not | Xor | Nand | Nor | Input => 1,
            Output | Led => 0,
        }
    }

    /// Returns whether the component is a signal source (Input)
    pub fn is_source(&self) -> bool {
        matches!(self, ComponentKind::Input)
    }

    /// Returns whether the component is a sink (Output or Led)
    pub fn is_sink(&self) -> bool {
        matches!(self, ComponentKind::Output | ComponentKind::Led)
    }

    /// Returns whether the component is a logic gate
    pub fn is_gate(&self) -> bool {
        !self.is_source() && !self.is_sink()
    }

    /// Apply the transfer function of the component
    ///
    /// The result has exactly `nb_outputs()` elements. Input components return a constant
    /// false: their actual value is driven directly into their output pin.
    pub fn eval(&self, inputs: &[bool]) -> Vec<bool> {
        use ComponentKind::*;
        assert_eq!(
            inputs.len(),
            self.nb_inputs(),
            "{self} expects {} inputs",
            self.nb_inputs()
        );
        match self {
            And => vec![inputs[0] & inputs[1]],
            Or => vec![inputs[0] | inputs[1]],
            Not => vec![!inputs[0]],
            Xor => vec![inputs[0] ^ inputs[1]],
            Nand => vec![!(inputs[0] & inputs[1])],
            Nor => vec![!(inputs[0] | inputs[1])],
            Input => vec![false],
            Output | Led => Vec::new(),
        }
    }

    /// Short name, as used in circuit files
    pub fn name(&self) -> &'static str {
        use ComponentKind::*;
        match self {
            And => "AND",
            Or => "OR",
            Not => "NOT",
            Xor => "XOR",
            Nand => "NAND",
            Nor => "NOR",
            Input => "INPUT",
            Output => "OUTPUT",
            Led => "LED",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        ComponentKind::ALL
            .iter()
            .find(|k| k.name() == upper)
            .copied()
            .ok_or_else(|| format!("Unknown component kind {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::ComponentKind;
    use super::ComponentKind::*;

    #[test]
    fn test_arity() {
        for k in [And, Or, Xor, Nand, Nor] {
            assert_eq!(k.nb_inputs(), 2);
            assert_eq!(k.nb_outputs(), 1);
            assert!(k.is_gate());
        }
        assert_eq!(Not.nb_inputs(), 1);
        assert_eq!(Not.nb_outputs(), 1);
        assert_eq!(Input.nb_inputs(), 0);
        assert_eq!(Input.nb_outputs(), 1);
        assert!(Input.is_source());
        for k in [Output, Led] {
            assert_eq!(k.nb_inputs(), 1);
            assert_eq!(k.nb_outputs(), 0);
            assert!(k.is_sink());
        }
    }

    #[test]
    fn test_eval() {
        let pairs = [(false, false), (false, true), (true, false), (true, true)];
        for (a, b) in pairs {
            assert_eq!(And.eval(&[a, b]), vec![a && b]);
            assert_eq!(Or.eval(&[a, b]), vec![a || b]);
            assert_eq!(Xor.eval(&[a, b]), vec![a != b]);
            assert_eq!(Nand.eval(&[a, b]), vec![!(a && b)]);
            assert_eq!(Nor.eval(&[a, b]), vec![!(a || b)]);
        }
        assert_eq!(Not.eval(&[false]), vec![true]);
        assert_eq!(Not.eval(&[true]), vec![false]);
        assert_eq!(Input.eval(&[]), vec![false]);
        assert!(Output.eval(&[true]).is_empty());
        assert!(Led.eval(&[true]).is_empty());
    }

    #[test]
    fn test_eval_size() {
        for k in ComponentKind::ALL {
            let inputs = vec![true; k.nb_inputs()];
            assert_eq!(k.eval(&inputs).len(), k.nb_outputs());
        }
    }

    #[test]
    #[should_panic]
    fn test_eval_wrong_arity() {
        And.eval(&[true]);
    }

    #[test]
    fn test_names() {
        for k in ComponentKind::ALL {
            assert_eq!(k.to_string().parse::<ComponentKind>(), Ok(k));
        }
        assert_eq!("nand".parse::<ComponentKind>(), Ok(Nand));
        assert!("MUX".parse::<ComponentKind>().is_err());
    }
}
