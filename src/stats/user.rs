use crate::process::{
    table::{BIRTH_YEAR, GENDER, USER_TYPE},
    TripTable,
};
use crate::stats::{value_counts, Report};
use anyhow::Result;
use arrow::array::StringArray;
use std::fmt;

/// Label for rows with no value, so counts always add up to the row total.
pub const MISSING: &str = "(missing)";

/// Earliest, most recent and most common year of birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthYears {
    pub earliest: i64,
    pub most_recent: i64,
    pub most_common: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub user_types: Vec<(String, usize)>,
    /// `None` when the city publishes no gender column.
    pub genders: Option<Vec<(String, usize)>>,
    /// `None` when there is no birth-year column or no row has a value.
    pub birth_years: Option<BirthYears>,
}

fn category_counts(arr: &StringArray) -> Vec<(String, usize)> {
    value_counts(arr.iter().map(|v| v.unwrap_or(MISSING)))
        .into_iter()
        .map(|(k, c)| (k.to_string(), c))
        .collect()
}

/// Min, max and mode over the raw values, truncated to whole years only at the end.
///
/// Ties for the mode go to the earliest year.
fn birth_year_summary(mut years: Vec<f64>) -> Option<BirthYears> {
    years.retain(|y| !y.is_nan());
    years.sort_by(f64::total_cmp);
    let (&earliest, &most_recent) = (years.first()?, years.last()?);

    let mut most_common: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < years.len() {
        let run = years[i..].iter().take_while(|y| **y == years[i]).count();
        if most_common.map_or(true, |(_, best)| run > best) {
            most_common = Some((years[i], run));
        }
        i += run;
    }

    Some(BirthYears {
        earliest: earliest as i64,
        most_recent: most_recent as i64,
        most_common: most_common?.0 as i64,
    })
}

impl Report for UserStats {
    const HEADING: &'static str = "Calculating User Stats...";

    fn compute(table: &TripTable) -> Result<Self> {
        let user_types = category_counts(table.strings(USER_TYPE)?);

        let genders = if table.has_column(GENDER) {
            Some(category_counts(table.strings(GENDER)?))
        } else {
            None
        };

        let birth_years = if table.has_column(BIRTH_YEAR) {
            let years: Vec<f64> = table.floats(BIRTH_YEAR)?.iter().flatten().collect();
            birth_year_summary(years)
        } else {
            None
        };

        Ok(Self {
            user_types,
            genders,
            birth_years,
        })
    }
}

fn write_counts(f: &mut fmt::Formatter<'_>, title: &str, counts: &[(String, usize)]) -> fmt::Result {
    let width = counts
        .iter()
        .map(|(k, _)| k.len())
        .chain(std::iter::once(title.len()))
        .max()
        .unwrap_or(0);
    writeln!(f, "{}", title)?;
    for (k, c) in counts {
        writeln!(f, "{:<width$}    {}", k, c, width = width)?;
    }
    Ok(())
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_counts(f, USER_TYPE, &self.user_types)?;
        writeln!(f)?;
        match &self.genders {
            Some(g) => write_counts(f, GENDER, g)?,
            None => writeln!(
                f,
                "Gender data is not available for the selected city and time period."
            )?,
        }
        writeln!(f)?;
        match &self.birth_years {
            Some(b) => {
                writeln!(f, "Earliest birth year: {}", b.earliest)?;
                writeln!(f, "Most recent birth year: {}", b.most_recent)?;
                writeln!(f, "Most common birth year: {}", b.most_common)
            }
            None => writeln!(
                f,
                "Birth year data is not available for the selected city and time period."
            ),
        }
    }
}
