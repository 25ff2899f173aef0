use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::process::TripTable;
use crate::prompt::ask_yes;

pub const PAGE_SIZE: usize = 5;

/// Cursor over the filtered trips, handing out `PAGE_SIZE` rows at a time.
#[derive(Debug)]
pub struct RowPager<'a> {
    table: &'a TripTable,
    cursor: usize,
}

impl<'a> RowPager<'a> {
    pub fn new(table: &'a TripTable) -> Self {
        Self { table, cursor: 0 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The next page, empty once the table is exhausted. Always advances the cursor.
    pub fn next_page(&mut self) -> TripTable {
        let page = self.table.slice(self.cursor, PAGE_SIZE);
        self.cursor += PAGE_SIZE;
        page
    }
}

/// Offer raw rows five at a time until the user answers anything but "yes".
pub fn display_data<R: BufRead, W: Write>(table: &TripTable, input: &mut R, out: &mut W) -> Result<usize> {
    let mut pager = RowPager::new(table);
    let mut shown = 0;
    let mut more = ask_yes(
        input,
        out,
        "\nWould you like to view 5 rows of individual trip data? Enter yes or no\n",
    )?;
    while more {
        let page = pager.next_page();
        if page.is_empty() {
            writeln!(out, "No more rows to display.")?;
        } else {
            writeln!(out, "{}", page.pretty()?)?;
        }
        shown += page.num_rows();
        debug!(cursor = pager.cursor(), rows = page.num_rows(), "page shown");
        more = ask_yes(
            input,
            out,
            "Do you want to see the next 5 rows of data? Enter yes or no.\n",
        )?;
    }
    Ok(shown)
}
