//! DIMACS CNF interchange format

use crate::sat::theory::Clause;
use anyhow::{bail, Context, Result};
use std::fmt::Write as _;
use std::path::Path;

/// Render a clause set in DIMACS CNF: a `p cnf <nvars> <nclauses>` header,
/// then one line per clause with its signed literals, `0`-terminated.
pub fn to_dimacs(num_vars: usize, clauses: &[Clause]) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "p cnf {} {}", num_vars, clauses.len());
    for clause in clauses {
        for literal in &clause.literals {
            let _ = write!(out, "{} ", literal);
        }
        let _ = writeln!(out, "0");
    }
    out
}

/// Write a clause set to a DIMACS file, creating parent directories.
pub fn save_dimacs<P: AsRef<Path>>(path: P, num_vars: usize, clauses: &[Clause]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, to_dimacs(num_vars, clauses))
        .with_context(|| format!("failed to write DIMACS file: {}", path.display()))
}

/// Parse DIMACS CNF text back into `(num_vars, clauses)`. Comment lines
/// (`c ...`) are skipped; the clause count in the header must match.
pub fn parse_dimacs(input: &str) -> Result<(usize, Vec<Clause>)> {
    let mut lines = input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('c'));

    let header = lines.next().context("DIMACS input is empty")?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    let (num_vars, num_clauses) = match fields.as_slice() {
        ["p", "cnf", vars, clauses] => (
            vars.parse::<usize>().context("invalid variable count")?,
            clauses.parse::<usize>().context("invalid clause count")?,
        ),
        _ => bail!("malformed DIMACS header: '{}'", header),
    };

    let mut clauses = Vec::with_capacity(num_clauses);
    for line in lines {
        let mut literals = Vec::new();
        let mut terminated = false;
        for token in line.split_whitespace() {
            let literal: i32 = token
                .parse()
                .with_context(|| format!("invalid literal '{}'", token))?;
            if literal == 0 {
                terminated = true;
                break;
            }
            if literal.unsigned_abs() as usize > num_vars {
                bail!("literal {} exceeds declared variable count {}", literal, num_vars);
            }
            literals.push(literal);
        }
        if !terminated {
            bail!("clause line missing terminating 0: '{}'", line);
        }
        clauses.push(Clause::new(literals));
    }

    if clauses.len() != num_clauses {
        bail!(
            "header declares {} clauses but {} were found",
            num_clauses,
            clauses.len()
        );
    }
    Ok((num_vars, clauses))
}
