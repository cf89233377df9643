//! Resolving a query to exactly one table row

use crate::{
    core::{Result, error::CompareErrorKind},
    dataset::{Row, Table},
};

/// An exact-match condition on one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter<'q> {
    pub column: &'q str,
    pub value: &'q str,
}

impl<'q> Filter<'q> {
    pub fn new(column: &'q str, value: &'q str) -> Self {
        Self { column, value }
    }
}

/// Find the single row matching every filter.
///
/// Filters are applied in order and matching is exact: no trimming or case folding.
pub fn find<'t>(table: &'t Table, filters: &[Filter<'_>]) -> Result<Row<'t>> {
    let bound = filters
        .iter()
        .map(|filter| Ok((table.column_index(filter.column)?, filter.value)))
        .collect::<Result<Vec<(usize, &str)>>>()?;

    let mut matches = table.rows().filter(|row| {
        bound
            .iter()
            .all(|&(index, value)| row.get_index(index) == Some(value))
    });

    let Some(row) = matches.next() else {
        return Err(CompareErrorKind::NotFound {
            query: describe(filters),
        }
        .into());
    };

    let extra = matches.count();
    if extra > 0 {
        return Err(CompareErrorKind::AmbiguousMatch {
            query: describe(filters),
            count: extra + 1,
        }
        .into());
    }

    tracing::debug!("Located {}", describe(filters));
    Ok(row)
}

fn describe(filters: &[Filter<'_>]) -> String {
    filters
        .iter()
        .map(|filter| format!("{} '{}'", filter.column, filter.value))
        .collect::<Vec<_>>()
        .join(", ")
}
