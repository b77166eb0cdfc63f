//! Read and write circuits and truth tables to files

mod bench;
mod table;

use std::fs::File;
use std::path::PathBuf;

pub use bench::{read_bench, write_bench};
pub use table::{format_row, write_truth_table};

use crate::Circuit;

/// Read a circuit from a file
///
/// Following extensions are supported: .bench
/// Circuits without a name are named after the file.
pub fn read_circuit_file(path: &PathBuf) -> Result<Circuit, String> {
    match path.extension() {
        None => Err("No extension given".to_string()),
        Some(s) => {
            if s == "bench" {
                let f = File::open(path)
                    .map_err(|e| format!("Unable to open {}: {e}", path.display()))?;
                let mut circuit = read_bench(f)?;
                if circuit.name().is_none() {
                    if let Some(stem) = path.file_stem() {
                        circuit.set_name(&stem.to_string_lossy());
                    }
                }
                Ok(circuit)
            } else {
                Err(format!("Unknown extension {}", s.to_string_lossy()))
            }
        }
    }
}

/// Write a circuit to a file
///
/// Following extensions are supported: .bench
pub fn write_circuit_file(path: &PathBuf, circuit: &Circuit) -> Result<(), String> {
    match path.extension() {
        None => Err("No extension given".to_string()),
        Some(s) => {
            if s == "bench" {
                let mut f = File::create(path)
                    .map_err(|e| format!("Unable to create {}: {e}", path.display()))?;
                write_bench(&mut f, circuit).map_err(|e| e.to_string())
            } else {
                Err(format!("Unknown extension {}", s.to_string_lossy()))
            }
        }
    }
}
