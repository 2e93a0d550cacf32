//! Compile-time storage tags.
//!
//! A [`Symmetry`] tag selects how a square matrix stores its two triangles;
//! a [`Restriction`] tag selects which direction of lines a builder matrix
//! keeps. Both map onto a runtime [`Layout`] understood by the table.

use std::fmt::Debug;

/// The storage layout of a [`Table`](crate::Table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Row trees and column trees; random access in both directions.
    Full,
    /// Row trees only.
    OnlyRows,
    /// Column trees only.
    OnlyCols,
    /// One tree per index, lower triangle stored, mirror is the identity.
    Symmetric,
    /// One tree per index, lower triangle stored, mirror is negation.
    SkewSymmetric,
}

impl Layout {
    /// Returns true for the two triangular layouts.
    #[must_use]
    pub const fn is_symmetric(self) -> bool {
        matches!(self, Self::Symmetric | Self::SkewSymmetric)
    }

    /// Returns true if values read across the diagonal are negated.
    #[must_use]
    pub const fn is_skew(self) -> bool {
        matches!(self, Self::SkewSymmetric)
    }
}

/// Symmetry discipline of a [`SparseMatrix`](crate::SparseMatrix).
pub trait Symmetry: Copy + Default + Debug + Send + Sync + 'static {
    /// Table layout used by matrices with this discipline.
    const LAYOUT: Layout;
}

/// No symmetry; both triangles are stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NonSymmetric;

/// `M(i, j) == M(j, i)`; only the lower triangle is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Symmetric;

/// `M(i, j) == -M(j, i)`; only the strict lower triangle is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SkewSymmetric;

impl Symmetry for NonSymmetric {
    const LAYOUT: Layout = Layout::Full;
}

impl Symmetry for Symmetric {
    const LAYOUT: Layout = Layout::Symmetric;
}

impl Symmetry for SkewSymmetric {
    const LAYOUT: Layout = Layout::SkewSymmetric;
}

/// Line direction kept by a
/// [`RestrictedSparseMatrix`](crate::RestrictedSparseMatrix).
pub trait Restriction: Copy + Default + Debug + Send + Sync + 'static {
    /// Table layout used by builders with this restriction.
    const LAYOUT: Layout;
}

/// Keep row trees only; the column count grows with appended rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OnlyRows;

/// Keep column trees only; the row count grows with appended columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OnlyCols;

impl Restriction for OnlyRows {
    const LAYOUT: Layout = Layout::OnlyRows;
}

impl Restriction for OnlyCols {
    const LAYOUT: Layout = Layout::OnlyCols;
}
