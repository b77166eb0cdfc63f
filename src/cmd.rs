//! Command line interface

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use kdam::{tqdm, BarExt};

use crate::circuit::generators::{adder, testcases};
use crate::io::{read_circuit_file, write_circuit_file, write_truth_table};
use crate::sim::{PropagationEngine, TruthTableGenerator, MAX_ITERATIONS, MAX_TABLE_INPUTS};
use crate::{Circuit, ComponentId};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a circuit
    ///
    /// Will print statistics on the number of inputs, outputs, gates and wires in the circuit.
    #[clap()]
    Show(ShowArgs),

    /// Simulate a circuit
    ///
    /// Inputs are driven by name, for example `--set a=1 --set b=0`. Inputs that are not
    /// given are driven to 0.
    #[clap(alias = "sim")]
    Simulate(SimulateArgs),

    /// Generate the truth table of a circuit
    ///
    /// All input assignments are enumerated, with one simulation per row.
    /// Circuits with more than 16 inputs are refused.
    #[clap(alias = "tt")]
    Table(TableArgs),

    /// Generate a reference circuit
    #[clap(alias = "gen")]
    Generate(GenerateArgs),
}

impl Commands {
    /// Run the command
    pub fn run(&self) -> Result<(), String> {
        match self {
            Commands::Show(a) => a.run(),
            Commands::Simulate(a) => a.run(),
            Commands::Table(a) => a.run(),
            Commands::Generate(a) => a.run(),
        }
    }
}

/// Display names of a list of components
fn component_names(circuit: &Circuit, ids: &[ComponentId]) -> Vec<String> {
    ids.iter()
        .map(|id| match circuit.component(*id) {
            Some(c) => c.name(),
            None => id.to_string(),
        })
        .collect()
}

/// Command arguments for circuit informations
#[derive(Args)]
pub struct ShowArgs {
    /// Circuit to show
    file: PathBuf,

    /// Print every component and wire
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl ShowArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), String> {
        use crate::circuit::stats::stats;
        let circuit = read_circuit_file(&self.file)?;
        println!("Circuit stats:\n{}", stats(&circuit));
        if self.verbose {
            println!("{}", circuit);
        }
        Ok(())
    }
}

/// Parse an input assignment such as `a=1`
fn parse_assignment(s: &str) -> Result<(String, bool), String> {
    let Some((name, value)) = s.split_once('=') else {
        return Err(format!("Expected name=value, got {s}"));
    };
    let value = match value.trim() {
        "1" | "true" => true,
        "0" | "false" => false,
        v => return Err(format!("Invalid value {v} for {name}")),
    };
    Ok((name.trim().to_string(), value))
}

/// Command arguments for simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Circuit to simulate
    file: PathBuf,

    /// Input values, as name=value
    #[arg(short = 's', long = "set", value_parser = parse_assignment)]
    assignments: Vec<(String, bool)>,

    /// Number of simulation steps
    #[arg(long, default_value_t = 1)]
    steps: usize,

    /// Seed to randomize the processing order
    #[arg(long)]
    seed: Option<u64>,
}

impl SimulateArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), String> {
        let mut circuit = read_circuit_file(&self.file)?;
        let mut engine = match self.seed {
            Some(s) => PropagationEngine::with_seed(s),
            None => PropagationEngine::new(),
        };
        for (name, value) in &self.assignments {
            let id = circuit
                .input_ids()
                .into_iter()
                .find(|id| {
                    circuit.component(*id).and_then(|c| c.label.as_deref()) == Some(name.as_str())
                })
                .ok_or_else(|| format!("No input named {name}"))?;
            engine.set_input(&mut circuit, id, *value);
        }
        for i in 0..self.steps {
            let res = engine.step(&mut circuit);
            if !res.converged {
                println!(
                    "Step {}: no stable state after {} iterations",
                    i + 1,
                    res.iterations
                );
            }
        }
        let outputs = engine.get_outputs(&circuit);
        for id in circuit.output_ids() {
            let name = circuit.component(id).map(|c| c.name()).unwrap_or_default();
            let value = outputs.get(&id).and_then(|v| v.first().copied());
            println!("{}: {}", name, if value == Some(true) { 1 } else { 0 });
        }
        Ok(())
    }
}

/// Command arguments for truth table generation
#[derive(Args)]
pub struct TableArgs {
    /// Circuit to analyze
    file: PathBuf,

    /// Output file for the truth table; printed if not given
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Seed to randomize the processing order
    #[arg(long)]
    seed: Option<u64>,
}

impl TableArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), String> {
        let circuit = read_circuit_file(&self.file)?;
        let Some(mut gen) = TruthTableGenerator::new(&circuit) else {
            if circuit.nb_inputs() > MAX_TABLE_INPUTS {
                return Err(format!(
                    "Circuit has {} inputs, at most {} are supported",
                    circuit.nb_inputs(),
                    MAX_TABLE_INPUTS
                ));
            }
            return Err("Circuit needs at least one input and one output".to_string());
        };
        if let Some(s) = self.seed {
            gen = gen.with_seed(s);
        }

        let mut progress = tqdm!(total = gen.nb_rows());
        progress.set_description("Rows simulated");
        let mut rows = Vec::new();
        let mut unstable = Vec::new();
        for i in 0..gen.nb_rows() {
            let (row, status) = gen.row_with_status(i);
            if !status.converged {
                unstable.push(i);
            }
            rows.push(row);
            progress.update(1).map_err(|e| e.to_string())?;
        }
        if !unstable.is_empty() {
            progress
                .write(format!(
                    "Warning: no stable state after {} iterations for {} rows (first is row {})",
                    MAX_ITERATIONS,
                    unstable.len(),
                    unstable[0]
                ))
                .map_err(|e| e.to_string())?;
        }
        progress
            .write(format!(
                "Simulated {} rows for {} inputs and {} outputs",
                gen.nb_rows(),
                gen.nb_inputs(),
                gen.nb_outputs()
            ))
            .map_err(|e| e.to_string())?;

        let input_names = component_names(&circuit, gen.input_ids());
        let output_names = component_names(&circuit, gen.output_ids());
        let res = match &self.output {
            Some(path) => {
                let mut f = File::create(path)
                    .map_err(|e| format!("Unable to create {}: {e}", path.display()))?;
                write_truth_table(&mut f, &input_names, &output_names, &rows)
            }
            None => {
                let mut out = std::io::stdout().lock();
                write_truth_table(&mut out, &input_names, &output_names, &rows)
                    .and_then(|_| out.flush())
            }
        };
        res.map_err(|e| e.to_string())
    }
}

/// Reference circuits
#[derive(Clone, Copy, ValueEnum)]
pub enum Template {
    /// Half adder
    HalfAdder,
    /// Full adder
    FullAdder,
    /// Ripple-carry adder of the given size
    Adder,
    /// Ring of inverters of the given size
    Ring,
}

/// Command arguments for circuit generation
#[derive(Args)]
pub struct GenerateArgs {
    /// Circuit to generate
    #[arg(value_enum)]
    template: Template,

    /// Output file for the circuit
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Size of the circuit
    #[arg(long, default_value_t = 4)]
    size: usize,
}

impl GenerateArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), String> {
        if self.size == 0 {
            return Err("Size should be positive".to_string());
        }
        let (mut circuit, name) = match self.template {
            Template::HalfAdder => (adder::half_adder(), "half_adder".to_string()),
            Template::FullAdder => (adder::full_adder(), "full_adder".to_string()),
            Template::Adder => (
                adder::ripple_carry(self.size),
                format!("adder{}", self.size),
            ),
            Template::Ring => (
                testcases::inverter_ring(self.size),
                format!("ring{}", self.size),
            ),
        };
        circuit.set_name(&name);
        write_circuit_file(&self.output, &circuit)
    }
}
