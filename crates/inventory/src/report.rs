//! Plain-text stock report.

use std::io::{self, Write};

pub const REPORT_TITLE: &str = "Items Report";
pub const RULE_WIDTH: usize = 30;

/// Write the header followed by one `"<item> -> <quantity>"` line per entry.
pub fn write_report<'a, W, I>(out: &mut W, entries: I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = (&'a str, i64)>,
{
    writeln!(out, "{REPORT_TITLE}")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for (item, quantity) in entries {
        writeln!(out, "{item} -> {quantity}")?;
    }
    Ok(())
}
