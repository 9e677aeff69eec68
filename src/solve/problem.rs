//! Problem assembly and solution enumeration

use crate::error::PuzzleError;
use crate::puzzle::{generate_placements, Board, Instance, Placement, Shape};
use crate::sat::{SatSolver, Theory, TheoryBuilder, TheoryConfig, VariableAllocator};
use crate::solve::solution::Solution;
use serde::Serialize;
use std::fmt;

/// Encoding statistics reported alongside solve results.
#[derive(Debug, Clone, Serialize)]
pub struct EncodingStatistics {
    pub num_pieces: usize,
    pub num_placements: usize,
    pub placements_per_piece: Vec<(String, usize)>,
    pub cover_variables: usize,
    pub selector_variables: usize,
    pub num_clauses: usize,
    pub num_literals: usize,
    /// (component id, clauses contributed), in emission order.
    pub clauses_per_component: Vec<(String, usize)>,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Encoding:")?;
        writeln!(f, "  pieces:     {}", self.num_pieces)?;
        writeln!(f, "  placements: {}", self.num_placements)?;
        for (name, count) in &self.placements_per_piece {
            writeln!(f, "    {:<8} {}", name, count)?;
        }
        writeln!(
            f,
            "  variables:  {} ({} cover + {} selector)",
            self.cover_variables + self.selector_variables,
            self.cover_variables,
            self.selector_variables
        )?;
        writeln!(f, "  clauses:    {}", self.num_clauses)?;
        for (id, count) in &self.clauses_per_component {
            writeln!(f, "    [{}] {}", id, count)?;
        }
        writeln!(f, "  literals:   {}", self.num_literals)
    }
}

/// A fully assembled tiling problem: the board, pieces and instance, the
/// generated placements, the variable layout, and the compiled theory.
pub struct TilingProblem {
    board: Board,
    shapes: Vec<Shape>,
    instance: Instance,
    placements: Vec<Vec<Placement>>,
    vars: VariableAllocator,
    theory: Theory,
}

impl TilingProblem {
    /// Assemble a problem: enumerate placements for every piece, lay out
    /// variables, and compile the theory for the given component set.
    pub fn new(
        board: Board,
        shapes: Vec<Shape>,
        instance: Instance,
        config: &TheoryConfig,
    ) -> Result<Self, PuzzleError> {
        let placements: Vec<Vec<Placement>> = shapes
            .iter()
            .enumerate()
            .map(|(piece, shape)| generate_placements(piece, shape, &board))
            .collect();
        let vars = VariableAllocator::new(&board, &placements);
        let theory = TheoryBuilder::new(&board, &placements, &vars, config).build(&instance);
        Ok(Self {
            board,
            shapes,
            instance,
            placements,
            vars,
            theory,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn placements(&self) -> &[Vec<Placement>] {
        &self.placements
    }

    pub fn theory(&self) -> &Theory {
        &self.theory
    }

    pub fn variables(&self) -> &VariableAllocator {
        &self.vars
    }

    pub fn statistics(&self) -> EncodingStatistics {
        EncodingStatistics {
            num_pieces: self.shapes.len(),
            num_placements: self.placements.iter().map(Vec::len).sum(),
            placements_per_piece: self
                .shapes
                .iter()
                .zip(&self.placements)
                .map(|(shape, ps)| (shape.name().to_string(), ps.len()))
                .collect(),
            cover_variables: self.vars.cover_count(),
            selector_variables: self.vars.count() - self.vars.cover_count(),
            num_clauses: self.theory.clause_count(),
            num_literals: self.theory.literal_count(),
            clauses_per_component: self
                .theory
                .component_counts
                .iter()
                .map(|&(id, count)| (id.to_string(), count))
                .collect(),
        }
    }

    /// Find one solution, or `None` if the instance is unsatisfiable.
    pub fn solve_first(&self) -> Result<Option<Solution>, PuzzleError> {
        let mut iter = self.solutions();
        iter.next().transpose()
    }

    /// Count all solutions via blocking-clause enumeration.
    pub fn count_solutions(&self) -> Result<usize, PuzzleError> {
        let mut count = 0;
        for result in self.solutions() {
            result?;
            count += 1;
        }
        Ok(count)
    }

    /// Collect up to `max` solutions (all of them when `max` is `None`).
    pub fn enumerate(&self, max: Option<usize>) -> Result<Vec<Solution>, PuzzleError> {
        let mut solutions = Vec::new();
        for result in self.solutions() {
            solutions.push(result?);
            if max.is_some_and(|m| solutions.len() >= m) {
                break;
            }
        }
        Ok(solutions)
    }

    /// Stream solutions lazily. Each yielded solution is blocked in the
    /// underlying solver before the next query, so the stream is finite
    /// and free of repeats.
    pub fn solutions(&self) -> SolutionIter<'_> {
        SolutionIter {
            problem: self,
            solver: SatSolver::load(&self.theory),
            blocking: Vec::new(),
            done: false,
        }
    }
}

/// Streaming solution iterator. After exhaustion, `blocking_clauses`
/// holds the selector clauses that ruled out each yielded solution.
pub struct SolutionIter<'a> {
    problem: &'a TilingProblem,
    solver: SatSolver,
    blocking: Vec<Vec<i32>>,
    done: bool,
}

impl SolutionIter<'_> {
    /// Selector literals true in the last model, one per piece. Negating
    /// these forbids the exact combination of placements.
    fn selector_literals(&self, solution: &Solution) -> Vec<i32> {
        solution
            .chosen
            .iter()
            .enumerate()
            .map(|(piece, &index)| self.problem.vars.selector(piece, index))
            .collect()
    }

    /// The blocking clauses accumulated so far (negated selector literals).
    pub fn blocking_clauses(&self) -> &[Vec<i32>] {
        &self.blocking
    }

    /// The solver in its current state, for exporting the strengthened
    /// formula after enumeration.
    pub fn solver(&self) -> &SatSolver {
        &self.solver
    }
}

impl Iterator for SolutionIter<'_> {
    type Item = Result<Solution, PuzzleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let assignment = match self.solver.solve() {
            Ok(Some(assignment)) => assignment,
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        let decoded = Solution::decode(
            &assignment,
            &self.problem.board,
            &self.problem.placements,
            &self.problem.vars,
        )
        .and_then(|solution| {
            solution
                .validate(&self.problem.board, &self.problem.instance)
                .map(|()| solution)
        });

        match decoded {
            Ok(solution) => {
                let literals = self.selector_literals(&solution);
                self.solver.block(&literals);
                self.blocking
                    .push(literals.into_iter().map(|l| -l).collect());
                Some(Ok(solution))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
