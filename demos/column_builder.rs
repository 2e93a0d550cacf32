//! Building a Constraint Matrix Column by Column
//!
//! Reads the ROWS and COLUMNS sections of a small MPS-style model, collects
//! every column as a sparse vector of exact rationals, and moves the
//! column-only builder into a full matrix.
//!
//! Run with: cargo run --example column_builder

use rustc_hash::FxHashMap;

use tessera::prelude::*;

const MODEL: &str = "\
ROWS
 N  COST
 L  LIM1
 G  LIM2
 E  MYEQN
COLUMNS
    X1        COST         1   LIM1         1
    X1        LIM2         1
    X2        COST         2   LIM1         1
    X2        MYEQN       -1
    X3        COST        -1   MYEQN        1
    X4        COST      1/2
    X5        LIM2       0
";

fn main() {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                 COLUMN-WISE MATRIX CONSTRUCTION");
    println!("═══════════════════════════════════════════════════════════════════\n");

    let mut rows: FxHashMap<&str, usize> = FxHashMap::default();
    let mut columns: Vec<(&str, Vec<(usize, Q)>)> = Vec::new();
    let mut section = "";

    for line in MODEL.lines() {
        if !line.starts_with(' ') {
            section = line.trim();
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        match section {
            "ROWS" => {
                let next = rows.len();
                rows.insert(fields[1], next);
            }
            "COLUMNS" => {
                let name = fields[0];
                if columns.last().map_or(true, |(last, _)| *last != name) {
                    columns.push((name, Vec::new()));
                }
                let Some((_, entries)) = columns.last_mut() else {
                    continue;
                };
                for pair in fields[1..].chunks(2) {
                    let row = rows[pair[0]];
                    let value: Q = pair[1].parse().expect("numeric token");
                    entries.push((row, value));
                }
            }
            _ => {}
        }
    }

    let mut builder = RestrictedSparseMatrix::<Q, OnlyCols>::new();
    for (name, entries) in &columns {
        let column = SparseVector::from_pairs(rows.len(), entries.iter().cloned());
        println!("  {name:>3}: {column}");
        builder |= &column;
    }

    let mut dropped = Vec::new();
    builder.squeeze_with(|old, new| {
        if new.is_none() {
            dropped.push(columns[old].0);
        }
    });
    println!("\n  Empty columns dropped: {dropped:?}");

    let matrix: SparseMatrix<Q> = builder.into();
    println!("  Matrix: {} x {}, {} nonzeros\n", matrix.num_rows(), matrix.num_cols(), matrix.nnz());
    print!("{matrix}");

    let cost = rows["COST"];
    println!("\n  Objective row: {}", matrix.row(cost));
    assert_eq!(matrix.get(cost, 3), Q::new(1, 2));

    println!("\n{}", matrix.statistics());

    let approx: SparseMatrix<f64> = matrix.map_nonzero(Q::to_f64);
    println!("\n  As floating point, row {cost}: {}", approx.row(cost));

    println!("\n✓ Column builder example completed successfully!");
}
