//! Oracle adapter: CaDiCaL behind the clause-level interface

use crate::error::PuzzleError;
use crate::sat::theory::{Clause, Theory};
use cadical::Solver;
use std::collections::HashMap;

/// A satisfying assignment, indexable by proposition id. Variables the
/// oracle leaves unassigned are absent and read as false.
pub type Assignment = HashMap<i32, bool>;

/// Thin wrapper around CaDiCaL. Clauses are submitted up front and only
/// ever appended to (blocking clauses during enumeration); the oracle is
/// treated as a correct and complete black box.
pub struct SatSolver {
    solver: Solver,
    num_vars: usize,
    num_clauses: usize,
}

impl SatSolver {
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            num_vars: 0,
            num_clauses: 0,
        }
    }

    /// Load a built theory into a fresh solver.
    pub fn load(theory: &Theory) -> Self {
        let mut solver = Self::new();
        solver.num_vars = theory.num_vars;
        for clause in &theory.clauses {
            solver.add_clause(clause);
        }
        solver
    }

    /// Submit one clause. The empty clause is legal and makes the problem
    /// unsatisfiable.
    pub fn add_clause(&mut self, clause: &Clause) {
        for &literal in &clause.literals {
            let var = literal.unsigned_abs() as usize;
            if var > self.num_vars {
                self.num_vars = var;
            }
        }
        self.solver.add_clause(clause.literals.iter().copied());
        self.num_clauses += 1;
    }

    /// Query the oracle: `Some(assignment)` on SAT, `None` on UNSAT.
    /// An indeterminate verdict is an oracle failure and propagates.
    pub fn solve(&mut self) -> Result<Option<Assignment>, PuzzleError> {
        match self.solver.solve() {
            Some(true) => Ok(Some(self.extract_assignment())),
            Some(false) => Ok(None),
            None => Err(PuzzleError::Oracle(
                "solver returned an indeterminate verdict".into(),
            )),
        }
    }

    /// Append a blocking clause: the disjunction of the negations of the
    /// given (true) literals, forbidding that exact combination again.
    pub fn block(&mut self, literals: &[i32]) {
        let blocking = Clause::new(literals.iter().map(|&l| -l).collect());
        self.add_clause(&blocking);
    }

    fn extract_assignment(&self) -> Assignment {
        let mut assignment = HashMap::with_capacity(self.num_vars);
        for var in 1..=self.num_vars as i32 {
            if let Some(value) = self.solver.value(var) {
                assignment.insert(var, value);
            }
        }
        assignment
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn num_clauses(&self) -> usize {
        self.num_clauses
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satisfiable_formula() {
        let mut solver = SatSolver::new();
        solver.add_clause(&Clause::binary(1, 2));
        solver.add_clause(&Clause::binary(-1, 2));

        let assignment = solver.solve().unwrap().expect("should be SAT");
        assert_eq!(assignment.get(&2), Some(&true));
    }

    #[test]
    fn test_unsatisfiable_formula() {
        let mut solver = SatSolver::new();
        solver.add_clause(&Clause::unit(1));
        solver.add_clause(&Clause::unit(-1));

        assert!(solver.solve().unwrap().is_none());
    }

    #[test]
    fn test_empty_clause_is_falsum() {
        let mut solver = SatSolver::new();
        solver.add_clause(&Clause::new(vec![]));
        assert!(solver.solve().unwrap().is_none());
    }

    #[test]
    fn test_blocking_drives_enumeration() {
        // x1 free, x2 forced true: exactly two models over (x1, x2).
        let mut solver = SatSolver::new();
        solver.add_clause(&Clause::unit(2));

        let mut models = 0;
        while let Some(assignment) = solver.solve().unwrap() {
            models += 1;
            assert!(models <= 2, "enumeration must terminate");
            let literals: Vec<i32> = (1..=2)
                .map(|v| if assignment[&v] { v } else { -v })
                .collect();
            solver.block(&literals);
        }
        assert_eq!(models, 2);
    }

    #[test]
    fn test_variable_count_tracks_highest_literal() {
        let mut solver = SatSolver::new();
        solver.add_clause(&Clause::new(vec![1, -5, 3]));
        assert_eq!(solver.num_vars(), 5);
        solver.add_clause(&Clause::binary(2, -7));
        assert_eq!(solver.num_vars(), 7);
        assert_eq!(solver.num_clauses(), 2);
    }
}
