mod format;

use clap::{Parser, Subcommand, ValueEnum};
use simplex_solver::{Phase, Problem, Relation, Solution, SolutionStatus, Solver, Trace};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simplex")]
#[command(about = "Solve small linear programs with the simplex method", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem and output the optimal solution
    Solve {
        /// JSON file containing the problem
        file: PathBuf,
        /// Show every intermediate tableau
        #[arg(short, long)]
        steps: bool,
        /// Show shadow prices, reduced costs and binding constraints
        #[arg(short, long)]
        analysis: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
        /// Maximum number of pivots
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Tolerance for floating point comparisons
        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// Check a problem file for errors
    Check {
        /// JSON file containing the problem
        file: PathBuf,
    },
    /// Output the dual of a problem as JSON
    Dual {
        /// JSON file containing the problem
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).parse_default_env().init();

    match cli.command {
        Commands::Solve {
            file,
            steps,
            analysis,
            format,
            max_iterations,
            tolerance,
        } => {
            let problem = load(&file);

            let mut solver = Solver::new().with_trace(steps);
            if let Some(max) = max_iterations {
                solver = solver.with_max_iterations(max);
            }
            if let Some(tol) = tolerance {
                solver = solver.with_tolerance(tol);
            }

            let solution = match solver.solve(&problem) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Solve error: {}", e);
                    std::process::exit(1);
                }
            };

            match format {
                Format::Json => println!("{}", to_json(&solution)),
                Format::Pretty => print_solution(&problem, &solution, analysis),
            }

            if !solution.is_optimal() {
                std::process::exit(1);
            }
        }
        Commands::Check { file } => {
            let problem = load(&file);

            if let Err(e) = problem.validate() {
                eprintln!("✗ {} has errors:", file.display());
                eprintln!("  {}", e);
                std::process::exit(1);
            }

            let count = |relation: Relation| problem.constraints.iter().filter(|c| c.relation == relation).count();

            println!("✓ {} is valid", file.display());
            println!("  {:?}", problem.sense);
            println!("  {} variables", problem.num_variables());
            println!("  {} constraints", problem.num_constraints());
            println!("    {} <=", count(Relation::Le));
            println!("    {} >=", count(Relation::Ge));
            println!("    {} =", count(Relation::Eq));
        }
        Commands::Dual { file } => {
            let problem = load(&file);

            match problem.dual() {
                Ok(dual) => println!("{}", to_json(&dual)),
                Err(e) => {
                    eprintln!("Dual error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn load(file: &Path) -> Problem {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::from_str(&source) {
        Ok(problem) => problem,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {}", e))
}

fn print_solution(problem: &Problem, solution: &Solution, analysis: bool) {
    if let Some(trace) = &solution.trace {
        print_steps(trace);
    }

    match solution.status {
        SolutionStatus::Optimal => {
            println!("Status: OPTIMAL");
            if let Some(objective) = solution.objective_value {
                println!("Objective: {}", format::value(objective));
            }
            println!("Iterations: {}", solution.iterations);
            println!();
            println!("Variables:");
            for (j, value) in solution.values.iter().flatten().enumerate() {
                println!("  {:20} {:>12}", problem.variable_name(j), format::value(*value));
            }

            if let (true, Some(analysis)) = (analysis, &solution.analysis) {
                println!();
                println!("Analysis:");
                println!();

                if !analysis.binding_constraints.is_empty() {
                    println!("Binding constraints:");
                    for name in &analysis.binding_constraints {
                        println!("  - {}", name);
                    }
                    println!();
                }

                println!("Shadow prices:");
                for sp in &analysis.shadow_prices {
                    println!("  {:20} {:>12}", sp.constraint, format::value(sp.value));
                }
                println!();

                println!("Reduced costs (variables not in solution):");
                for rc in &analysis.reduced_costs {
                    if !rc.is_basic {
                        println!("  {:20} {:>12}", rc.variable, format::value(rc.reduced_cost));
                    }
                }
            }
        }
        SolutionStatus::Infeasible => {
            println!("Status: INFEASIBLE");
            println!("No solution exists that satisfies all constraints.");
        }
        SolutionStatus::Unbounded => {
            println!("Status: UNBOUNDED");
            println!("The problem has no finite optimal solution.");
        }
    }
}

fn print_steps(trace: &Trace) {
    let variables = &trace.column_labels[..trace.column_labels.len() - 1];

    for (n, step) in trace.steps.iter().enumerate() {
        // Phase 1 optimizes the auxiliary objective W
        let (phase, objective) = match step.phase {
            Phase::One => ("Phase 1", "W"),
            Phase::Two => ("Phase 2", "Z"),
        };
        match step.pivot {
            Some((row, col)) => println!(
                "Step {} ({}): pivot on row {}, {} enters",
                n + 1,
                phase,
                row + 1,
                variables[col]
            ),
            None => println!("Step {} ({}): initial tableau", n + 1, phase),
        }

        let objective_row = step.grid.len() - 1;
        let rows: Vec<(String, Vec<f64>)> = step
            .grid
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let label = if i == objective_row {
                    objective.to_string()
                } else {
                    variables[step.basis[i]].clone()
                };
                (label, row.clone())
            })
            .collect();

        format::table(&trace.column_labels, &rows);
        println!();
    }
}
