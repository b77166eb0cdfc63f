//! Text output for truth tables

use std::io::Write;

use itertools::Itertools;

use crate::sim::TruthTableRow;

fn bits(values: &[bool]) -> String {
    values.iter().map(|b| if *b { "1" } else { "0" }).join(" ")
}

/// Format a single row, with input values and output values separated by a bar
pub fn format_row(row: &TruthTableRow) -> String {
    format!("{} | {}", bits(&row.inputs), bits(&row.outputs))
}

/// Write a truth table, with a header giving the names of inputs and outputs
///
/// ```text
/// # a b | sum carry
/// 0 0 | 0 0
/// 1 0 | 1 0
/// 0 1 | 1 0
/// 1 1 | 0 1
/// ```
pub fn write_truth_table<W: Write>(
    w: &mut W,
    input_names: &[String],
    output_names: &[String],
    rows: &[TruthTableRow],
) -> std::io::Result<()> {
    writeln!(
        w,
        "# {} | {}",
        input_names.iter().join(" "),
        output_names.iter().join(" ")
    )?;
    for row in rows {
        writeln!(w, "{}", format_row(row))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_row, write_truth_table};
    use crate::circuit::generators::adder;
    use crate::sim::{generate_truth_table, TruthTableRow};

    #[test]
    fn test_format_row() {
        let row = TruthTableRow {
            inputs: vec![true, false, true],
            outputs: vec![false],
            row_index: 5,
        };
        assert_eq!(format_row(&row), "1 0 1 | 0");
    }

    #[test]
    fn test_half_adder() {
        let c = adder::half_adder();
        let rows = generate_truth_table(&c);
        let names = |ids: Vec<crate::ComponentId>| -> Vec<String> {
            ids.iter().map(|id| c.component(*id).unwrap().name()).collect()
        };
        let mut buf = Vec::new();
        write_truth_table(&mut buf, &names(c.input_ids()), &names(c.output_ids()), &rows)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("# a b | "));
        assert_eq!(lines[1], "0 0 | 0 0");
        assert_eq!(lines[2], "1 0 | 1 0");
        assert_eq!(lines[3], "0 1 | 1 0");
        assert_eq!(lines[4], "1 1 | 0 1");
    }
}
