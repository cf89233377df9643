//! Comparing total cases and deaths between two locations.

pub mod charts;
pub mod prompt;

use charming::{ImageRenderer, theme::Theme};

use crate::{
    core::{
        ChartConfig, DatasetPaths, Result,
        error::{CompareError, CompareErrorKind},
        format_count,
    },
    dataset::{Filter, Granularity, Row, Table, find},
};

/// A location to look up, tagged with its granularity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    Country(String),
    State(String),
    County { county: String, state: String },
}

/// Two locations of the same granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRequest {
    pub granularity: Granularity,
    pub first: Location,
    pub second: Location,
}

/// Paired totals and labels, slot 0 for the first location and slot 1 for the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonResult {
    pub cases: [u64; 2],
    pub deaths: [u64; 2],
    pub labels: [String; 2],
}

impl Location {
    pub fn county(county: impl Into<String>, state: impl Into<String>) -> Self {
        Location::County {
            county: county.into(),
            state: state.into(),
        }
    }

    /// Build a location from user input. Country and state names are taken as given.
    pub fn parse(granularity: Granularity, input: &str) -> Result<Self> {
        match granularity {
            Granularity::Country => Ok(Location::Country(input.to_string())),
            Granularity::State => Ok(Location::State(input.to_string())),
            Granularity::County => Self::parse_county(input),
        }
    }

    /// Parse `"<county>, <state>"`, splitting on the first comma.
    pub fn parse_county(input: &str) -> Result<Self> {
        let parse_error = || {
            CompareError::from(CompareErrorKind::ParseError {
                input: input.to_string(),
            })
            .with_hint(Some("Example: Union, New Jersey"))
        };

        let (county, state) = input.split_once(',').ok_or_else(parse_error)?;
        let state = state.trim();
        if county.is_empty() || state.is_empty() {
            return Err(parse_error());
        }

        Ok(Location::county(county, state))
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Location::Country(_) => Granularity::Country,
            Location::State(_) => Granularity::State,
            Location::County { .. } => Granularity::County,
        }
    }

    /// The name shown on the charts
    pub fn label(&self) -> String {
        match self {
            Location::Country(name) | Location::State(name) => name.clone(),
            Location::County { county, state } => format!("{county} County, {state}"),
        }
    }

    fn filters(&self) -> Vec<Filter<'_>> {
        let values: Vec<&str> = match self {
            Location::Country(name) | Location::State(name) => vec![name.as_str()],
            Location::County { county, state } => vec![state.as_str(), county.as_str()],
        };

        self.granularity()
            .schema()
            .key_columns
            .iter()
            .zip(values)
            .map(|(column, value)| Filter::new(column, value))
            .collect()
    }
}

impl ComparisonRequest {
    /// Parse both identifiers for the given granularity
    pub fn new(granularity: Granularity, first: &str, second: &str) -> Result<Self> {
        Ok(Self {
            granularity,
            first: Location::parse(granularity, first)?,
            second: Location::parse(granularity, second)?,
        })
    }
}

/// Look up both locations in an already loaded table.
pub fn compare(
    table: &Table,
    granularity: Granularity,
    first: &Location,
    second: &Location,
) -> Result<ComparisonResult> {
    if first.granularity() != granularity || second.granularity() != granularity {
        return Err(CompareErrorKind::MixedGranularity {
            expected: granularity.to_string(),
        }
        .into());
    }

    let schema = granularity.schema();
    let bound = schema.bind(table)?;

    let first_row = locate(table, first)?;
    let second_row = locate(table, second)?;

    Ok(ComparisonResult {
        cases: [
            count(&first_row, bound.cases, schema.cases_column, first)?,
            count(&second_row, bound.cases, schema.cases_column, second)?,
        ],
        deaths: [
            count(&first_row, bound.deaths, schema.deaths_column, first)?,
            count(&second_row, bound.deaths, schema.deaths_column, second)?,
        ],
        labels: [first.label(), second.label()],
    })
}

/// Load the request's dataset and compare the two locations in it.
pub fn compare_files(paths: &DatasetPaths, request: &ComparisonRequest) -> Result<ComparisonResult> {
    let path = request.granularity.dataset_path(paths);
    tracing::info!("Loading {} data from {}", request.granularity, path.display());

    let table = Table::load(path)?;
    compare(&table, request.granularity, &request.first, &request.second)
}

/// Compare the two locations and render the cases and deaths charts.
pub fn run(
    paths: &DatasetPaths,
    chart_config: &ChartConfig,
    request: &ComparisonRequest,
) -> Result<ComparisonResult> {
    let result = compare_files(paths, request)?;

    for ((label, cases), deaths) in result.labels.iter().zip(result.cases).zip(result.deaths) {
        tracing::info!(
            "{label}: {} cases, {} deaths",
            format_count(cases),
            format_count(deaths)
        );
    }

    let mut renderer =
        ImageRenderer::new(chart_config.width, chart_config.height).theme(Theme::Walden);
    charts::render(&result, &chart_config.output_dir, &mut renderer)?;

    Ok(result)
}

fn locate<'t>(table: &'t Table, location: &Location) -> Result<Row<'t>> {
    find(table, &location.filters()).map_err(|err| {
        if matches!(err.kind(), CompareErrorKind::NotFound { .. }) {
            err.with_hint(Some(format!(
                "{} names must match the dataset exactly, e.g. 'New Jersey' rather than 'nj'",
                location.granularity()
            )))
        } else {
            err
        }
    })
}

/// Read a whole, non-negative count. Whole-number floats such as `"1234.0"` are accepted.
fn count(row: &Row<'_>, index: usize, column: &str, location: &Location) -> Result<u64> {
    let raw = row.get_index(index).unwrap_or_default();

    parse_count(raw).ok_or_else(|| {
        CompareErrorKind::InvalidData {
            column: column.to_string(),
            value: raw.to_string(),
            query: location.label(),
        }
        .into()
    })
}

fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(count) = raw.parse::<u64>() {
        return Some(count);
    }

    let value = raw.parse::<f64>().ok()?;
    let whole = value.is_finite() && value >= 0.0 && value.fract() == 0.0;
    (whole && value <= u64::MAX as f64).then_some(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTIES: &str = "date,county,state,fips,cases,deaths\n\
        2023-03-23,Union,New Jersey,34039,180000,2100\n\
        2023-03-23,Union,Ohio,39159,15000,120\n\
        2023-03-23,Cook,Illinois,17031,1500000,15000\n";

    const WORLD: &str = "iso_code,continent,location,last_updated_date,total_cases,new_cases,total_deaths\n\
        DEU,Europe,Germany,2024-08-04,38437756.0,0.0,174979.0\n\
        FRA,Europe,France,2024-08-04,38997490.0,0.0,167985.0\n\
        ATA,,Antarctica,2024-08-04,,,\n";

    #[test]
    fn test_parse_county() {
        let location = Location::parse_county("Union, New Jersey").unwrap();
        assert_eq!(location, Location::county("Union", "New Jersey"));
    }

    #[test]
    fn test_parse_county_splits_on_first_comma() {
        let location = Location::parse_county("Union,  New Jersey, USA ").unwrap();
        assert_eq!(location, Location::county("Union", "New Jersey, USA"));
    }

    #[test]
    fn test_parse_county_without_comma() {
        let err = Location::parse_county("Union").unwrap_err();
        assert!(matches!(
            err.kind(),
            CompareErrorKind::ParseError { input } if input == "Union"
        ));
    }

    #[test]
    fn test_parse_county_with_empty_state() {
        let err = Location::parse_county("Union, ").unwrap_err();
        assert!(matches!(err.kind(), CompareErrorKind::ParseError { .. }));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Location::Country("Germany".into()).label(), "Germany");
        assert_eq!(Location::State("New Jersey".into()).label(), "New Jersey");
        assert_eq!(
            Location::county("Cook", "Illinois").label(),
            "Cook County, Illinois"
        );
    }

    #[test]
    fn test_compare_counties() {
        let table = Table::from_reader(COUNTIES.as_bytes()).unwrap();
        let result = compare(
            &table,
            Granularity::County,
            &Location::county("Union", "New Jersey"),
            &Location::county("Cook", "Illinois"),
        )
        .unwrap();

        assert_eq!(
            result,
            ComparisonResult {
                cases: [180000, 1500000],
                deaths: [2100, 15000],
                labels: [
                    "Union County, New Jersey".to_string(),
                    "Cook County, Illinois".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_compare_countries_with_float_counts() {
        let table = Table::from_reader(WORLD.as_bytes()).unwrap();
        let request = ComparisonRequest::new(Granularity::Country, "Germany", "France").unwrap();
        let result = compare(&table, request.granularity, &request.first, &request.second)
            .unwrap();

        assert_eq!(result.cases, [38437756, 38997490]);
        assert_eq!(result.deaths, [174979, 167985]);
        assert_eq!(result.labels, ["Germany", "France"]);
    }

    #[test]
    fn test_missing_count_is_invalid_data() {
        let table = Table::from_reader(WORLD.as_bytes()).unwrap();
        let err = compare(
            &table,
            Granularity::Country,
            &Location::Country("Germany".into()),
            &Location::Country("Antarctica".into()),
        )
        .unwrap_err();

        assert!(matches!(
            err.kind(),
            CompareErrorKind::InvalidData { column, query, .. }
                if column == "total_cases" && query == "Antarctica"
        ));
    }

    #[test]
    fn test_unknown_location_is_not_found_with_hint() {
        let table = Table::from_reader(COUNTIES.as_bytes()).unwrap();
        let err = compare(
            &table,
            Granularity::County,
            &Location::county("Union", "nj"),
            &Location::county("Cook", "Illinois"),
        )
        .unwrap_err();

        assert!(matches!(err.kind(), CompareErrorKind::NotFound { .. }));
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_mixed_granularity() {
        let table = Table::from_reader(COUNTIES.as_bytes()).unwrap();
        let err = compare(
            &table,
            Granularity::County,
            &Location::county("Union", "New Jersey"),
            &Location::State("Illinois".into()),
        )
        .unwrap_err();

        assert!(matches!(err.kind(), CompareErrorKind::MixedGranularity { .. }));
    }

    #[test]
    fn test_wrong_dataset_fails_fast() {
        let table = Table::from_reader(WORLD.as_bytes()).unwrap();
        let err = compare(
            &table,
            Granularity::State,
            &Location::State("Ohio".into()),
            &Location::State("Illinois".into()),
        )
        .unwrap_err();

        assert!(matches!(err.kind(), CompareErrorKind::MissingColumn { .. }));
    }

    #[test]
    fn test_compare_files_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DatasetPaths {
            counties: dir.path().join("us-counties.csv"),
            ..DatasetPaths::default()
        };
        std::fs::write(&paths.counties, COUNTIES).unwrap();

        let request =
            ComparisonRequest::new(Granularity::County, "Union, Ohio", "Cook, Illinois").unwrap();
        let first_run = compare_files(&paths, &request).unwrap();
        let second_run = compare_files(&paths, &request).unwrap();

        assert_eq!(first_run, second_run);
        assert_eq!(first_run.cases, [15000, 1500000]);
    }

    #[test]
    fn test_run_writes_both_charts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DatasetPaths {
            counties: dir.path().join("us-counties.csv"),
            ..DatasetPaths::default()
        };
        std::fs::write(&paths.counties, COUNTIES).unwrap();
        let chart_config = ChartConfig {
            output_dir: dir.path().join("out"),
            ..ChartConfig::default()
        };

        let request =
            ComparisonRequest::new(Granularity::County, "Union, New Jersey", "Cook, Illinois")
                .unwrap();
        let result = run(&paths, &chart_config, &request).unwrap();

        assert_eq!(result.deaths, [2100, 15000]);
        for file_name in ["cases_chart.svg", "deaths_chart.svg"] {
            let svg = std::fs::read_to_string(chart_config.output_dir.join(file_name)).unwrap();
            assert!(svg.contains("<svg"), "{file_name} should be an SVG document");
        }
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("3052636"), Some(3052636));
        assert_eq!(parse_count("174979.0"), Some(174979));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count("-5"), None);
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("NaN"), None);
    }
}
