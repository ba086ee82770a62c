use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::read_lossy;
use crate::error::Result;
use crate::model::SampleEntry;

/// `children%  self%  command  module  [.] symbol`
static CALL_GRAPH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<children>\d+\.\d+)%\s+(?P<self>\d+\.\d+)%\s+(?P<command>\S+)\s+(?P<module>\S+)\s+\[\.\]\s+(?P<symbol>\S+)$",
    )
    .unwrap_or_else(|e| unreachable!("call-graph pattern is valid: {e}"))
});

/// Parse one line of `perf report` call-graph output.
///
/// Returns `None` for headers, footers, blank lines and anything else that is
/// not a five-field sample record.
pub fn parse_line(line: &str) -> Option<SampleEntry> {
    let caps = CALL_GRAPH_LINE.captures(line.trim_end())?;
    let children_pct = caps["children"].parse().ok()?;
    let self_pct = caps["self"].parse().ok()?;
    Some(SampleEntry::new(
        children_pct,
        self_pct,
        &caps["command"],
        &caps["module"],
        &caps["symbol"],
    ))
}

/// Whether a symbol names a source-level function worth attributing.
///
/// PLT stubs (`foo@plt`), reserved and mangled names (`_x`, `a__b`), C++ scope
/// paths (`ns::f`) and raw addresses (`0x4005d0`) are rejected.
pub fn is_attributable(symbol: &str) -> bool {
    !(symbol.contains('@')
        || symbol.contains("__")
        || symbol.contains("::")
        || symbol.starts_with('_')
        || symbol.starts_with("0x"))
}

/// Parse a whole report, keeping only attributable samples from `module`,
/// ordered by descending self percentage. Equal percentages keep report order.
pub fn parse_report(text: &str, module: &str) -> Vec<SampleEntry> {
    let mut entries: Vec<SampleEntry> = text
        .lines()
        .filter_map(parse_line)
        .filter(|e| e.module == module && is_attributable(&e.symbol))
        .collect();
    entries.sort_by(|a, b| b.self_pct.total_cmp(&a.self_pct));
    entries
}

/// Read and parse the report at `path`.
///
/// A missing report yields `Ok(None)`; an existing report with no usable
/// lines yields `Ok(Some(vec![]))`.
pub fn read_report(path: &Path, module: &str) -> Result<Option<Vec<SampleEntry>>> {
    Ok(read_lossy(path)?.map(|text| parse_report(&text, module)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
# Samples: 12K of event 'cycles'
#
# Children      Self  Command  Shared Object      Symbol
# ........  ........  .......  .................  ..............
#
    30.00%     5.00%  c2d      c2d                [.] bar
    50.00%    10.00%  c2d      c2d                [.] foo
    20.00%    20.00%  c2d      libc.so.6          [.] memcpy
    12.00%    12.00%  c2d      c2d                [.] foo@plt
     9.00%     9.00%  c2d      c2d                [.] _internal_helper
     8.00%     8.00%  c2d      c2d                [.] 0xdeadbeef
     7.00%     7.00%  c2d      c2d                [.] vtree__new
     6.00%     6.00%  c2d      c2d                [.] std::sort
     5.00%     5.00%  c2d      c2d                [.] baz
            |
            ---main
";

    #[test]
    fn parses_five_field_line() {
        let entry = parse_line("    50.00%    10.00%  c2d  c2d  [.] foo").unwrap();
        assert_eq!(entry.children_pct, 50.0);
        assert_eq!(entry.self_pct, 10.0);
        assert_eq!(entry.command, "c2d");
        assert_eq!(entry.module, "c2d");
        assert_eq!(entry.symbol, "foo");
    }

    #[test]
    fn rejects_non_record_lines() {
        assert!(parse_line("# Children  Self  Command").is_none());
        assert!(parse_line("").is_none());
        assert!(parse_line("  50%  10%  c2d  c2d  [.] foo").is_none());
        assert!(parse_line("  50.00%  10.00%  c2d  c2d  [k] foo").is_none());
        assert!(parse_line("            ---main").is_none());
    }

    #[test]
    fn filters_module_and_symbols_then_sorts() {
        let entries = parse_report(REPORT, "c2d");
        let symbols: Vec<_> = entries.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, ["foo", "bar", "baz"]);
    }

    #[test]
    fn excluded_symbols_never_survive() {
        for symbol in ["foo@plt", "_internal_helper", "0xdeadbeef", "a__b", "ns::f"] {
            assert!(!is_attributable(symbol), "{symbol} should be rejected");
        }
        assert!(is_attributable("compile_dnnf"));
    }

    #[test]
    fn equal_self_pct_keeps_report_order() {
        let text = "  1.00%  2.00%  c2d  c2d  [.] first\n  1.00%  2.00%  c2d  c2d  [.] second\n";
        let entries = parse_report(text, "c2d");
        assert_eq!(entries[0].symbol, "first");
        assert_eq!(entries[1].symbol, "second");
    }

    #[test]
    fn missing_report_is_none_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_report(&dir.path().join("nope.log"), "c2d").unwrap(), None);

        let empty = dir.path().join("empty.log");
        std::fs::write(&empty, "# nothing here\n").unwrap();
        assert_eq!(read_report(&empty, "c2d").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn invalid_utf8_line_does_not_spoil_neighbours() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.log");
        let mut bytes = b"  20.00%  10.00%  c2d  c2d  [.] bar\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe\n");
        bytes.extend_from_slice(b"  15.00%  5.00%  c2d  c2d  [.] foo\n");
        std::fs::write(&path, bytes).unwrap();

        let entries = read_report(&path, "c2d").unwrap().unwrap();
        let symbols: Vec<_> = entries.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, ["bar", "foo"]);
    }
}
