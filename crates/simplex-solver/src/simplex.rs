use log::{debug, trace, warn};

use crate::error::SolverError;
use crate::problem::Problem;
use crate::solution::{Solution, Step, Trace};
use crate::standard_form::StandardForm;
use crate::tableau::{Phase, Tableau};

/// Simplex solver for linear programming problems
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    /// Maximum pivots before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
    /// Record every intermediate tableau
    trace: bool,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
            trace: false,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve the LP problem using the two-phase simplex method
    pub fn solve(&self, problem: &Problem) -> Result<Solution, SolverError> {
        let form = StandardForm::build(problem)?;
        debug!(
            "Solving {} variables x {} constraints ({} auxiliary, {} artificial columns)",
            form.n_structural,
            form.rows.len(),
            form.n_auxiliary,
            form.n_artificial
        );

        let mut engine = Engine::new(self, &form);
        let outcome = engine.run()?;
        debug!("Finished as {:?} after {} iterations", outcome, engine.iterations);

        let mut solution = match outcome {
            State::Optimal => Solution::from_optimal(problem, &form, &engine.tableau, engine.iterations, self.tolerance),
            State::Unbounded => Solution::unbounded(engine.iterations),
            _ => Solution::infeasible(engine.iterations),
        };

        if let Some(steps) = engine.steps {
            solution.trace = Some(Trace {
                column_labels: form.column_labels(problem),
                steps,
            });
        }

        Ok(solution)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Phase1,
    Phase2,
    Optimal,
    Infeasible,
    Unbounded,
}

impl State {
    fn is_terminal(self) -> bool {
        matches!(self, State::Optimal | State::Infeasible | State::Unbounded)
    }
}

/// One solve in progress; owns its tableau exclusively
struct Engine<'a> {
    solver: &'a Solver,
    form: &'a StandardForm,
    tableau: Tableau,
    iterations: usize,
    steps: Option<Vec<Step>>,
}

impl<'a> Engine<'a> {
    fn new(solver: &'a Solver, form: &'a StandardForm) -> Self {
        let tableau = Tableau::new(form);
        Self {
            solver,
            form,
            tableau,
            iterations: 0,
            steps: solver.trace.then(Vec::new),
        }
    }

    fn run(&mut self) -> Result<State, SolverError> {
        let mut state = match self.tableau.phase() {
            Phase::One => State::Phase1,
            Phase::Two => State::Phase2,
        };
        self.record(None);

        while !state.is_terminal() {
            state = self.step(state)?;
        }
        Ok(state)
    }

    /// Advance by one pivot or one phase transition
    fn step(&mut self, state: State) -> Result<State, SolverError> {
        let Some(col) = self.entering_column() else {
            return Ok(match state {
                State::Phase1 => self.finish_phase_one()?,
                State::Phase2 => State::Optimal,
                terminal => terminal,
            });
        };

        let Some(row) = self.leaving_row(col) else {
            return Ok(match state {
                State::Phase1 => {
                    // The auxiliary objective is bounded above by zero
                    warn!("Phase 1 reported an unbounded column {}; treating as infeasible", col);
                    State::Infeasible
                }
                _ => State::Unbounded,
            });
        };

        self.pivot(row, col)?;
        Ok(state)
    }

    fn pivot(&mut self, row: usize, col: usize) -> Result<(), SolverError> {
        if self.iterations >= self.solver.max_iterations {
            return Err(SolverError::IterationLimitExceeded {
                limit: self.solver.max_iterations,
            });
        }

        trace!(
            "Pivot {}: column {} enters, column {} leaves (row {})",
            self.iterations + 1,
            col,
            self.tableau.basis()[row],
            row
        );
        self.tableau.pivot(row, col);
        self.iterations += 1;
        self.record(Some((row, col)));
        Ok(())
    }

    /// Most negative objective-row entry; leftmost on ties
    fn entering_column(&self) -> Option<usize> {
        let obj = self.tableau.objective_row();
        let phase_two = self.tableau.phase() == Phase::Two;

        let mut min_val = -self.solver.tolerance;
        let mut min_col = None;

        for j in 0..self.tableau.num_columns() {
            if phase_two && self.form.is_artificial(j) {
                continue;
            }
            if obj[j] < min_val {
                min_val = obj[j];
                min_col = Some(j);
            }
        }

        min_col
    }

    /// Minimum ratio test; ties go to the row whose basic column has the lowest index
    fn leaving_row(&self, col: usize) -> Option<usize> {
        let tol = self.solver.tolerance;
        let basis = self.tableau.basis();

        let mut best: Option<(usize, f64)> = None;

        for i in 0..self.tableau.num_rows() {
            let val = self.tableau.value(i, col);
            if val <= tol {
                continue;
            }
            let ratio = self.tableau.rhs(i) / val;
            best = match best {
                None => Some((i, ratio)),
                Some((_, min_ratio)) if ratio < min_ratio - tol => Some((i, ratio)),
                Some((min_row, min_ratio)) if (ratio - min_ratio).abs() <= tol && basis[i] < basis[min_row] => {
                    Some((i, ratio))
                }
                keep => keep,
            };
        }

        best.map(|(row, _)| row)
    }

    /// Phase 1 → Phase 2 when every artificial reached zero, otherwise infeasible
    fn finish_phase_one(&mut self) -> Result<State, SolverError> {
        let residual = self.tableau.objective_value();
        if residual.abs() > self.solver.tolerance {
            debug!("Phase 1 ended with artificial sum {}; no feasible region", -residual);
            return Ok(State::Infeasible);
        }

        self.drive_out_artificials()?;
        self.tableau.install_phase_two(self.form);
        debug!("Phase 1 complete after {} iterations", self.iterations);
        self.record(None);
        Ok(State::Phase2)
    }

    /// Replace artificials still basic at zero level with any non-artificial
    /// column that has a non-zero entry in their row. Rows without one are
    /// redundant and keep their artificial, which then never moves.
    fn drive_out_artificials(&mut self) -> Result<(), SolverError> {
        for row in 0..self.tableau.num_rows() {
            if !self.form.is_artificial(self.tableau.basis()[row]) {
                continue;
            }
            let replacement = (0..self.tableau.num_columns())
                .find(|&j| !self.form.is_artificial(j) && self.tableau.value(row, j).abs() > self.solver.tolerance);

            match replacement {
                Some(col) => self.pivot(row, col)?,
                None => debug!("Row {} is redundant; its artificial stays basic at zero", row),
            }
        }
        Ok(())
    }

    fn record(&mut self, pivot: Option<(usize, usize)>) {
        if let Some(steps) = self.steps.as_mut() {
            steps.push(Step {
                phase: self.tableau.phase(),
                iteration: self.iterations,
                pivot,
                basis: self.tableau.basis().to_vec(),
                grid: self.tableau.grid(),
            });
        }
    }
}
