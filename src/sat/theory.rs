//! Clause generation: the puzzle theory and its toggleable components

use crate::error::PuzzleError;
use crate::puzzle::{Board, Instance, Placement};
use crate::sat::VariableAllocator;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A disjunction of signed literals (positive = variable, negative = its
/// negation). An empty clause is falsum and makes the theory unsatisfiable;
/// it arises legitimately when a piece has no legal placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>,
}

impl Clause {
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    pub fn unit(literal: i32) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self {
            literals: vec![lit1, lit2],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }
}

/// The named components of the puzzle theory.
///
/// Required components characterize exactly the valid tilings; every
/// optional component is entailed by them for any instance and may only
/// change the oracle's search effort, never the solution set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// At most one piece per cell.
    T1,
    /// No piece on structurally blocked cells.
    T2,
    /// Per piece: some placement is selected, and a selected placement
    /// forces its cells covered (the E.1.1 + E.2.1 pair).
    T31,
    /// Backward implication: all of a placement's cells covered by the
    /// piece implies that placement is the chosen one. Alias of E.2.2.
    T32,
    /// Redundant restatement: some selector per piece.
    T4,
    /// Target cells stay uncovered.
    I1,
    /// Every usable non-target cell is covered by some piece.
    I2,
    /// At-least-one selector per piece (part of T.3.1).
    E11,
    /// At-most-one selector per piece.
    E12,
    /// Forward Tseytin implication (part of T.3.1).
    E21,
    /// Backward Tseytin implication. Alias of T.3.2.
    E22,
}

impl Component {
    pub const ALL: [Component; 11] = [
        Component::T1,
        Component::T2,
        Component::T31,
        Component::T32,
        Component::T4,
        Component::I1,
        Component::I2,
        Component::E11,
        Component::E12,
        Component::E21,
        Component::E22,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Component::T1 => "T.1",
            Component::T2 => "T.2",
            Component::T31 => "T.3.1",
            Component::T32 => "T.3.2",
            Component::T4 => "T.4",
            Component::I1 => "I.1",
            Component::I2 => "I.2",
            Component::E11 => "E.1.1",
            Component::E12 => "E.1.2",
            Component::E21 => "E.2.1",
            Component::E22 => "E.2.2",
        }
    }

    pub fn parse(id: &str) -> Option<Component> {
        Component::ALL.iter().copied().find(|c| c.id() == id)
    }

    /// Required components cannot be disabled.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Component::T1
                | Component::T2
                | Component::T31
                | Component::I1
                | Component::E11
                | Component::E21
        )
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Which optional components to emit. Required components are always on;
/// [`TheoryConfig::set`] rejects any attempt to switch them off.
///
/// Defaults mirror the reference configuration: backward implications and
/// remainder coverage on, the completion restatement and exclusive
/// selectors off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TheoryConfig {
    /// T.3.2 / E.2.2
    #[serde(default = "default_true")]
    pub backward_implications: bool,
    /// T.4
    #[serde(default)]
    pub completion: bool,
    /// E.1.2
    #[serde(default)]
    pub exclusive_selectors: bool,
    /// I.2
    #[serde(default = "default_true")]
    pub cover_remainder: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TheoryConfig {
    fn default() -> Self {
        Self {
            backward_implications: true,
            completion: false,
            exclusive_selectors: false,
            cover_remainder: true,
        }
    }
}

impl TheoryConfig {
    /// Enable or disable one component by id. Disabling a required
    /// component is a configuration error.
    pub fn set(&mut self, component: Component, enabled: bool) -> Result<(), PuzzleError> {
        if component.is_required() {
            if !enabled {
                return Err(PuzzleError::Configuration(format!(
                    "component {} is required and cannot be disabled",
                    component.id()
                )));
            }
            return Ok(());
        }
        match component {
            Component::T32 | Component::E22 => self.backward_implications = enabled,
            Component::T4 => self.completion = enabled,
            Component::E12 => self.exclusive_selectors = enabled,
            Component::I2 => self.cover_remainder = enabled,
            _ => unreachable!("required components handled above"),
        }
        Ok(())
    }

    pub fn is_enabled(&self, component: Component) -> bool {
        match component {
            Component::T32 | Component::E22 => self.backward_implications,
            Component::T4 => self.completion,
            Component::E12 => self.exclusive_selectors,
            Component::I2 => self.cover_remainder,
            _ => true,
        }
    }

    /// Apply `+ID` / `-ID` overrides, e.g. `+T.4`, `-I.2`.
    pub fn apply_overrides(&mut self, overrides: &[String]) -> Result<(), PuzzleError> {
        for item in overrides {
            let (enabled, id) = if let Some(id) = item.strip_prefix('+') {
                (true, id)
            } else if let Some(id) = item.strip_prefix('-') {
                (false, id)
            } else {
                return Err(PuzzleError::Configuration(format!(
                    "component override '{}' must start with '+' or '-'",
                    item
                )));
            };
            let component = Component::parse(id).ok_or_else(|| {
                PuzzleError::Configuration(format!("unknown theory component '{}'", id))
            })?;
            self.set(component, enabled)?;
        }
        Ok(())
    }
}

/// A built propositional theory: the clause set plus bookkeeping.
#[derive(Debug, Clone)]
pub struct Theory {
    pub clauses: Vec<Clause>,
    pub num_vars: usize,
    /// (component id, clauses contributed), in emission order.
    pub component_counts: Vec<(&'static str, usize)>,
}

impl Theory {
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }
}

impl fmt::Display for Theory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Theory:")?;
        writeln!(f, "  variables: {}", self.num_vars)?;
        writeln!(f, "  clauses:   {}", self.clause_count())?;
        writeln!(f, "  literals:  {}", self.literal_count())?;
        for (id, count) in &self.component_counts {
            writeln!(f, "  [{}] {} clause(s)", id, count)?;
        }
        Ok(())
    }
}

/// Assembles the clause set from the active components. Each component is
/// a pure function of (board, placements, allocator, instance); components
/// combine by union, in a fixed emission order so exported artifacts are
/// reproducible.
pub struct TheoryBuilder<'a> {
    board: &'a Board,
    placements: &'a [Vec<Placement>],
    vars: &'a VariableAllocator,
    config: &'a TheoryConfig,
}

impl<'a> TheoryBuilder<'a> {
    pub fn new(
        board: &'a Board,
        placements: &'a [Vec<Placement>],
        vars: &'a VariableAllocator,
        config: &'a TheoryConfig,
    ) -> Self {
        Self {
            board,
            placements,
            vars,
            config,
        }
    }

    /// Build the full theory for one instance.
    pub fn build(&self, instance: &Instance) -> Theory {
        let mut clauses = Vec::new();
        let mut counts = Vec::new();
        let mut emit = |id: &'static str, mut generated: Vec<Clause>| {
            counts.push((id, generated.len()));
            clauses.append(&mut generated);
        };

        emit(Component::T1.id(), self.no_overlap());
        emit(Component::T2.id(), self.blocked_cells());
        emit(Component::E11.id(), self.selector_at_least_one());
        if self.config.exclusive_selectors {
            emit(Component::E12.id(), self.selector_at_most_one());
        }
        emit(Component::E21.id(), self.forward_implications());
        if self.config.backward_implications {
            emit(Component::E22.id(), self.backward_implications());
        }
        if self.config.completion {
            emit(Component::T4.id(), self.completion());
        }
        emit(Component::I1.id(), self.target_holes(instance));
        if self.config.cover_remainder {
            emit(Component::I2.id(), self.remainder_coverage(instance));
        }

        Theory {
            clauses,
            num_vars: self.vars.count(),
            component_counts: counts,
        }
    }

    /// T.1: for every cell and every unordered pair of distinct pieces,
    /// they do not both cover it.
    fn no_overlap(&self) -> Vec<Clause> {
        let pieces = self.vars.piece_count();
        self.board
            .all_cells()
            .flat_map(|cell| {
                (0..pieces).tuple_combinations().map(move |(k1, k2)| {
                    Clause::binary(-self.vars.cover(k1, cell), -self.vars.cover(k2, cell))
                })
            })
            .collect()
    }

    /// T.2: no piece occupies a structurally blocked cell.
    fn blocked_cells(&self) -> Vec<Clause> {
        let pieces = self.vars.piece_count();
        self.board
            .blocked_cells()
            .into_iter()
            .flat_map(|cell| (0..pieces).map(move |k| Clause::unit(-self.vars.cover(k, cell))))
            .collect()
    }

    /// E.1.1 (part of T.3.1): per piece, at least one selector is true.
    /// A piece with no placements yields the empty clause, correctly
    /// rendering the theory unsatisfiable.
    fn selector_at_least_one(&self) -> Vec<Clause> {
        self.placements
            .iter()
            .enumerate()
            .map(|(k, ps)| Clause::new((0..ps.len()).map(|p| self.vars.selector(k, p)).collect()))
            .collect()
    }

    /// E.1.2: per piece, at most one selector is true (pairwise).
    fn selector_at_most_one(&self) -> Vec<Clause> {
        self.placements
            .iter()
            .enumerate()
            .flat_map(|(k, ps)| {
                (0..ps.len()).tuple_combinations().map(move |(p1, p2)| {
                    Clause::binary(-self.vars.selector(k, p1), -self.vars.selector(k, p2))
                })
            })
            .collect()
    }

    /// E.2.1 (part of T.3.1): selecting a placement forces each of its
    /// cells covered by the piece. The deliberately one-directional half
    /// of the Tseytin equivalence.
    fn forward_implications(&self) -> Vec<Clause> {
        let mut clauses = Vec::new();
        for (k, ps) in self.placements.iter().enumerate() {
            for (p, placement) in ps.iter().enumerate() {
                let sel = self.vars.selector(k, p);
                for &cell in &placement.cells {
                    clauses.push(Clause::binary(-sel, self.vars.cover(k, cell)));
                }
            }
        }
        clauses
    }

    /// T.3.2 / E.2.2: if the piece covers every cell of a placement, that
    /// placement's selector is true.
    fn backward_implications(&self) -> Vec<Clause> {
        let mut clauses = Vec::new();
        for (k, ps) in self.placements.iter().enumerate() {
            for (p, placement) in ps.iter().enumerate() {
                let mut literals = vec![self.vars.selector(k, p)];
                literals.extend(placement.cells.iter().map(|&cell| -self.vars.cover(k, cell)));
                clauses.push(Clause::new(literals));
            }
        }
        clauses
    }

    /// T.4: redundant restatement that some selector per piece is true.
    fn completion(&self) -> Vec<Clause> {
        self.selector_at_least_one()
    }

    /// I.1: target cells stay uncovered by every piece.
    fn target_holes(&self, instance: &Instance) -> Vec<Clause> {
        let pieces = self.vars.piece_count();
        instance
            .targets()
            .iter()
            .flat_map(|&cell| (0..pieces).map(move |k| Clause::unit(-self.vars.cover(k, cell))))
            .collect()
    }

    /// I.2: every usable non-target cell is covered by some piece.
    fn remainder_coverage(&self, instance: &Instance) -> Vec<Clause> {
        let pieces = self.vars.piece_count();
        self.board
            .usable_cells()
            .into_iter()
            .filter(|&cell| !instance.is_target(cell))
            .map(|cell| Clause::new((0..pieces).map(|k| self.vars.cover(k, cell)).collect()))
            .collect()
    }
}
