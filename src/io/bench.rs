//! IO for .bench-like circuit files

use std::io::{BufRead, BufReader, Read, Write};

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;

use crate::{Circuit, ComponentId, ComponentKind};

/// A gate statement: name, kind and driving signals
type GateStatement = (String, ComponentKind, Vec<String>);

fn parse_keyword(t: &str) -> Result<(ComponentKind, String), String> {
    let parts: Vec<_> = t
        .split(&['(', ')'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 2 {
        return Err(format!("Invalid statement {t}"));
    }
    let kind = match parts[0].to_uppercase().as_str() {
        "INPUT" => ComponentKind::Input,
        "OUTPUT" => ComponentKind::Output,
        "LED" => ComponentKind::Led,
        _ => return Err(format!("Unknown keyword {}", parts[0])),
    };
    Ok((kind, parts[1].to_string()))
}

fn parse_gate(t: &str) -> Result<GateStatement, String> {
    let parts: Vec<_> = t
        .split(&['=', '(', ',', ')'])
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() < 2 {
        return Err(format!("Invalid statement {t}"));
    }
    let kind: ComponentKind = parts[1]
        .parse()
        .map_err(|_| format!("Unknown gate type {}", parts[1]))?;
    if !kind.is_gate() {
        return Err(format!("Unknown gate type {}", parts[1]));
    }
    let deps = parts[2..].to_vec();
    if deps.len() != kind.nb_inputs() {
        return Err(format!(
            "Gate {} has {} inputs, {} expected",
            parts[0],
            deps.len(),
            kind.nb_inputs()
        ));
    }
    Ok((parts[0].clone(), kind, deps))
}

fn circuit_from_statements(
    inputs: &[String],
    gates: &[GateStatement],
    sinks: &[(ComponentKind, String)],
) -> Result<Circuit, String> {
    let mut ret = Circuit::new();
    let mut name_to_id = FxHashMap::<String, ComponentId>::default();

    for name in inputs {
        let id = ret.add_labelled(ComponentKind::Input, name);
        if name_to_id.insert(name.clone(), id).is_some() {
            return Err(format!("{name} is defined twice"));
        }
    }
    for (name, kind, _) in gates {
        let id = ret.add_labelled(*kind, name);
        if name_to_id.insert(name.clone(), id).is_some() {
            return Err(format!("{name} is defined twice"));
        }
    }

    let lookup = |name: &String| -> Result<ComponentId, String> {
        name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| format!("Signal {name} is not generated anywhere"))
    };
    for (name, _, deps) in gates {
        let gate = name_to_id[name];
        for (pin, dep) in deps.iter().enumerate() {
            let driver = lookup(dep)?;
            ret.add_wire(driver, 0, gate, pin);
        }
    }
    for (kind, name) in sinks {
        let driver = lookup(name)?;
        let sink = ret.add_labelled(*kind, name);
        ret.add_wire(driver, 0, sink, 0);
    }
    ret.check();
    Ok(ret)
}

/// Read a circuit in .bench format
///
/// These files describe the circuit with simple statements like:
/// ```text
///     # This is a comment
///     INPUT(i0)
///     INPUT(i1)
///     OUTPUT(x3)
///     LED(x4)
///     x0 = AND(i0, i1)
///     x1 = NAND(x0, i1)
///     x2 = OR(x0, i0)
///     x3 = NOR(i0, x1)
///     x4 = XOR(x3, x2)
///     x5 = NOT(x4)
/// ```
/// Each Input and gate is labelled with its name; each Output and Led is labelled
/// with the name of the signal it displays. A `# Circuit: <name>` comment gives the name
/// of the circuit.
pub fn read_bench<R: Read>(r: R) -> Result<Circuit, String> {
    let mut inputs = Vec::new();
    let mut gates = Vec::new();
    let mut sinks = Vec::new();
    let mut name = None;
    for l in BufReader::new(r).lines() {
        let Ok(s) = l else {
            return Err("Error during file IO".to_string());
        };
        let t = s.trim();
        if let Some(n) = t.strip_prefix("# Circuit:") {
            name = Some(n.trim().to_string());
            continue;
        }
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        if t.contains('=') {
            gates.push(parse_gate(t)?);
        } else {
            let (kind, name) = parse_keyword(t)?;
            if kind.is_source() {
                inputs.push(name);
            } else {
                sinks.push((kind, name));
            }
        }
    }
    let mut ret = circuit_from_statements(&inputs, &gates, &sinks)?;
    if let Some(n) = name {
        ret.set_name(&n);
    }
    Ok(ret)
}

/// Names of the Input and gate components when written to a file
///
/// Labels are used when they are unique and usable in a statement; otherwise the
/// component identifier is used.
fn signal_names(c: &Circuit) -> FxHashMap<ComponentId, String> {
    let mut seen = FxHashSet::default();
    let mut duplicated = FxHashSet::default();
    for comp in c.components().iter().filter(|comp| !comp.kind().is_sink()) {
        if let Some(l) = &comp.label {
            if !seen.insert(l.as_str()) {
                duplicated.insert(l.as_str());
            }
        }
    }
    let is_usable = |l: &str| {
        !l.is_empty()
            && !duplicated.contains(l)
            && l.chars().all(|ch| ch.is_alphanumeric() || "_-.[]".contains(ch))
    };
    c.components()
        .iter()
        .filter(|comp| !comp.kind().is_sink())
        .map(|comp| {
            let name = match &comp.label {
                Some(l) if is_usable(l) => l.clone(),
                _ => comp.id().to_string(),
            };
            (comp.id(), name)
        })
        .collect()
}

/// Write a circuit in .bench format
///
/// Placement is not saved. Components with an undriven input pin cannot be represented,
/// and are written as comments.
pub fn write_bench<W: Write>(w: &mut W, c: &Circuit) -> std::io::Result<()> {
    let names = signal_names(c);
    // Driver of each input pin; the last wire wins
    let mut drivers = FxHashMap::default();
    for wire in c.wires() {
        if let Some(n) = names.get(&wire.from) {
            drivers.insert((wire.to, wire.to_pin), n.clone());
        }
    }

    writeln!(w, "# .bench file")?;
    writeln!(w, "# Generated by gatesim")?;
    if let Some(name) = c.name() {
        writeln!(w, "# Circuit: {name}")?;
    }
    for comp in c.components() {
        if comp.kind().is_source() {
            writeln!(w, "INPUT({})", names[&comp.id()])?;
        }
    }
    writeln!(w)?;
    for comp in c.components() {
        if comp.kind().is_sink() {
            match drivers.get(&(comp.id(), 0)) {
                Some(d) => writeln!(w, "{}({})", comp.kind(), d)?,
                None => writeln!(w, "# {} {} is not driven", comp.kind(), comp.name())?,
            }
        }
    }
    writeln!(w)?;
    for comp in c.components() {
        if !comp.kind().is_gate() {
            continue;
        }
        let deps: Option<Vec<&String>> = (0..comp.kind().nb_inputs())
            .map(|pin| drivers.get(&(comp.id(), pin)))
            .collect();
        match deps {
            Some(deps) => writeln!(
                w,
                "{} = {}({})",
                names[&comp.id()],
                comp.kind(),
                deps.iter().join(", ")
            )?,
            None => writeln!(
                w,
                "# {} {} has an undriven input",
                comp.kind(),
                names[&comp.id()]
            )?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{read_bench, write_bench};
    use crate::circuit::generators::adder;
    use crate::sim::generate_truth_table;
    use crate::{Circuit, ComponentKind};

    const EXAMPLE: &str = "# .bench file
INPUT(i0)
INPUT(i1)

OUTPUT(x0)
OUTPUT(x1)
LED(x6)
OUTPUT(i1)

x0 = AND(i0, i1)
x1 = NAND(i0, i1)
x2 = OR(x0, i1)
x3 = NOR(i0, i1)
x4 = XOR(  i0, x3 )
x5   =  NOT(x2)
x6 = xor(x4, x5)
";

    #[test]
    fn test_read() {
        let c = read_bench(EXAMPLE.as_bytes()).unwrap();
        assert_eq!(c.nb_inputs(), 2);
        assert_eq!(c.nb_outputs(), 4);
        assert_eq!(c.nb_components(), 13);
        assert_eq!(c.nb_wires(), 17);
        let x4 = c.find_by_label("x4").unwrap();
        assert_eq!(c.component(x4).unwrap().kind(), ComponentKind::Xor);
        let led = c.output_ids()[2];
        assert_eq!(c.component(led).unwrap().kind(), ComponentKind::Led);
        assert_eq!(c.component(led).unwrap().label.as_deref(), Some("x6"));
    }

    #[test]
    fn test_readwrite() {
        let c = read_bench(EXAMPLE.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_bench(&mut buf, &c).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("x4 = XOR(i0, x3)"));
        assert!(text.contains("LED(x6)"));
        let c2 = read_bench(text.as_bytes()).unwrap();
        assert_eq!(c2.nb_components(), c.nb_components());
        assert_eq!(c2.nb_wires(), c.nb_wires());
        assert_eq!(generate_truth_table(&c), generate_truth_table(&c2));
    }

    #[test]
    fn test_write_generated() {
        let mut c = adder::ripple_carry(2);
        c.set_name("adder2");
        let mut buf = Vec::new();
        write_bench(&mut buf, &c).unwrap();
        let c2 = read_bench(buf.as_slice()).unwrap();
        assert_eq!(c2.name(), Some("adder2"));
        assert_eq!(generate_truth_table(&c), generate_truth_table(&c2));

        assert_eq!(read_bench(EXAMPLE.as_bytes()).unwrap().name(), None);
    }

    #[test]
    fn test_write_undriven() {
        let mut c = Circuit::new();
        let i = c.add_labelled(ComponentKind::Input, "a");
        c.add_labelled(ComponentKind::And, "g");
        let n = c.add_gate(ComponentKind::Not, &[i]);
        c.add(ComponentKind::Led);
        c.add_output(n);
        let mut buf = Vec::new();
        write_bench(&mut buf, &c).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("# AND g has an undriven input"));
        assert!(text.contains(&format!("{} = NOT(a)", n)));
        let c2 = read_bench(text.as_bytes()).unwrap();
        assert_eq!(c2.nb_components(), 3);
    }

    #[test]
    fn test_errors() {
        assert!(read_bench("x = MUX(a, b)".as_bytes())
            .unwrap_err()
            .contains("Unknown gate type"));
        assert!(read_bench("x = INPUT(a)".as_bytes()).is_err());
        assert!(read_bench("CLOCK(a)".as_bytes())
            .unwrap_err()
            .contains("Unknown keyword"));
        assert!(read_bench("INPUT(a)\nx = AND(a)".as_bytes())
            .unwrap_err()
            .contains("expected"));
        assert!(read_bench("INPUT(a)\nOUTPUT(b)".as_bytes())
            .unwrap_err()
            .contains("not generated"));
        assert!(read_bench("INPUT(a)\na = NOT(a)".as_bytes())
            .unwrap_err()
            .contains("defined twice"));
    }
}
