//! Symmetric Storage, Views and Copy-on-Write
//!
//! Shows how symmetric and skew-symmetric matrices mirror reads and writes
//! across the diagonal, how row views and minors write back into their
//! parent, and how copies stay independent.
//!
//! Run with: cargo run --example symmetric_views

use tessera::prelude::*;

fn q(n: i64) -> Q {
    Q::from_integer(n)
}

fn main() {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    SYMMETRIC STORAGE");
    println!("═══════════════════════════════════════════════════════════════════\n");

    let mut gram = SparseMatrix::<Q, Symmetric>::new(4, 4);
    gram.set(2, 3, q(7));
    gram.set(0, 0, q(1));
    println!("  Set (2,3) = 7; read (3,2) = {}", gram.get(3, 2));
    println!("  Stored cells: {}, visible entries: {}", gram.nnz(), gram.entries().count());
    assert_eq!(gram.get(3, 2), q(7));

    let mut skew = SparseMatrix::<Q, SkewSymmetric>::new(3, 3);
    skew.set(0, 1, q(5));
    skew.row_mut(2).set(0, Q::new(1, 3));
    println!("\n  Skew (0,1) = 5; read (1,0) = {}", skew.get(1, 0));
    println!("  Skew row 0: {}", skew.row(0));
    match skew.try_set(1, 1, q(4)) {
        Ok(()) => println!("  unexpected diagonal write"),
        Err(e) => println!("  Diagonal write refused: {e}"),
    }

    println!("\n═══════════════════════════════════════════════════════════════════");
    println!("                    VIEWS AND COPIES");
    println!("═══════════════════════════════════════════════════════════════════\n");

    let mut m = SparseMatrix::<Q>::from_row_major(3, 3, (1..=9).map(q));
    let snapshot = m.clone();
    println!("  Shared after clone: {}", m.is_shared());

    m.row_mut(1).clear();
    {
        let mut corner = m.minor_mut([0, 2], [0, 2]).expect("valid selection");
        corner *= q(10);
    }
    println!("  Shared after mutation: {}", m.is_shared());
    print!("\n  Mutated:\n{m}");
    print!("\n  Snapshot:\n{snapshot}");
    assert_eq!(snapshot.get(1, 1), q(5));
    assert_eq!(m.get(2, 2), q(90));

    let mut v = m.row(0).to_sparse();
    {
        let mut alias = v.alias_mut();
        alias.set(1, q(-1));
    }
    println!("\n  Row 0 through an alias: {v}");
    println!("  Product m * v: {}", &m * &v);

    m.squeeze_rows();
    println!("\n  After squeezing empty rows: {} x {}", m.num_rows(), m.num_cols());

    println!("\n✓ Symmetric views example completed successfully!");
}
