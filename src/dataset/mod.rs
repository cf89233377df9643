//! Source tables and the geographic levels they cover.

pub mod locator;
pub mod reader;

use std::{fmt, path::Path, str::FromStr};

use crate::core::{
    DatasetPaths, Result,
    error::{CompareError, CompareErrorKind},
};

pub use locator::{Filter, find};
pub use reader::{Row, Table};

/// The geographic level of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Country,
    State,
    County,
}

/// Column names a granularity's table is read through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Key columns, in the order they are filtered on
    pub key_columns: &'static [&'static str],
    pub cases_column: &'static str,
    pub deaths_column: &'static str,
}

/// A [`Schema`] resolved against a table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundSchema {
    pub cases: usize,
    pub deaths: usize,
}

const WORLD_SCHEMA: Schema = Schema {
    key_columns: &["location"],
    cases_column: "total_cases",
    deaths_column: "total_deaths",
};

const STATE_SCHEMA: Schema = Schema {
    key_columns: &["state"],
    cases_column: "cases",
    deaths_column: "deaths",
};

const COUNTY_SCHEMA: Schema = Schema {
    key_columns: &["state", "county"],
    cases_column: "cases",
    deaths_column: "deaths",
};

impl Granularity {
    pub fn schema(&self) -> Schema {
        match self {
            Granularity::Country => WORLD_SCHEMA,
            Granularity::State => STATE_SCHEMA,
            Granularity::County => COUNTY_SCHEMA,
        }
    }

    pub fn dataset_path<'a>(&self, paths: &'a DatasetPaths) -> &'a Path {
        match self {
            Granularity::Country => &paths.world,
            Granularity::State => &paths.states,
            Granularity::County => &paths.counties,
        }
    }

    /// The word a user types to pick this granularity
    pub fn plural(&self) -> &'static str {
        match self {
            Granularity::Country => "countries",
            Granularity::State => "states",
            Granularity::County => "counties",
        }
    }
}

impl Schema {
    /// Resolve every column this schema needs, failing on the first absent one
    pub fn bind(&self, table: &Table) -> Result<BoundSchema> {
        for column in self.key_columns {
            table.column_index(column)?;
        }

        Ok(BoundSchema {
            cases: table.column_index(self.cases_column)?,
            deaths: table.column_index(self.deaths_column)?,
        })
    }
}

impl FromStr for Granularity {
    type Err = CompareError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "counties" => Ok(Granularity::County),
            "states" => Ok(Granularity::State),
            "countries" => Ok(Granularity::Country),
            _ => Err(CompareErrorKind::InvalidGranularity {
                input: s.to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Granularity::Country => "country",
            Granularity::State => "state",
            Granularity::County => "county",
        };
        write!(f, "{s}")
    }
}
