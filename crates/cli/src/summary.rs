use std::io::{self, Write};

use perfbudget_core::{Analysis, Scope};

/// Rows with less time (seconds) or a smaller share (percent) are noise.
const TIME_THRESHOLD: f64 = 9e-3;

const NAME_WIDTH: usize = 40;

struct Row<'a> {
    name: &'a str,
    category: Option<&'a str>,
    time: f64,
    pct: f64,
}

impl Row<'_> {
    fn is_visible(&self) -> bool {
        self.time >= TIME_THRESHOLD && self.pct * 100.0 >= TIME_THRESHOLD
    }
}

/// Print function and category tables for every scope.
pub fn write_summary<W: Write>(out: &mut W, analysis: &Analysis, top: usize) -> io::Result<()> {
    writeln!(
        out,
        "{} instances: {} timed out, {} completed",
        analysis.corpus.len(),
        analysis.partitions.timed_out.len(),
        analysis.partitions.completed.len(),
    )?;

    for scope in [Scope::Full, Scope::TimedOut, Scope::Completed] {
        let stats = analysis.scope(scope);
        let functions = stats.functions.iter().map(|(name, f)| Row {
            name: name.as_str(),
            category: Some(f.category.as_str()),
            time: f.time,
            pct: f.pct,
        });
        write_table(out, &format!("{scope} / functions"), functions, top)?;

        let categories = stats.categories.iter().map(|(name, c)| Row {
            name: name.as_str(),
            category: None,
            time: c.time,
            pct: c.pct,
        });
        write_table(out, &format!("{scope} / categories"), categories, top)?;
    }
    Ok(())
}

fn write_table<'a, W: Write>(
    out: &mut W,
    title: &str,
    rows: impl Iterator<Item = Row<'a>>,
    top: usize,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "== {title}")?;
    writeln!(
        out,
        "{:<NAME_WIDTH$}  {:<16}  {:>12}  {:>8}",
        "Name", "Category", "Time", "Percent"
    )?;
    for row in rows.filter(Row::is_visible).take(top) {
        writeln!(
            out,
            "{:<NAME_WIDTH$}  {:<16}  {:>12}  {:>7.2}%",
            truncate(row.name, NAME_WIDTH),
            row.category.unwrap_or("-"),
            format_time(row.time),
            row.pct * 100.0,
        )?;
    }
    Ok(())
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let kept: String = name.chars().take(width - 1).collect();
        format!("{kept}…")
    } else {
        name.to_string()
    }
}

fn format_time(secs: f64) -> String {
    if secs >= 3600.0 {
        format!("{:.2}h", secs / 3600.0)
    } else if secs >= 60.0 {
        format!("{:.1}m", secs / 60.0)
    } else {
        format!("{secs:.2}s")
    }
}
