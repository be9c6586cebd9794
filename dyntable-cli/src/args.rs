//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;
use dyntable_lib::model::Value;

/// A staged cell edit from `--set`.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEdit {
    pub row_id: String,
    pub column_key: String,
    pub input: String,
}

/// Print a schema-driven table from a JSON fixture.
#[derive(Debug, Parser)]
#[command(name = "dyntable-cli", about = "Filter, sort and edit a table fixture, then print it.")]
pub struct Args {
    /// Fixture with `schema`, `rows`, and optional `config`, `template`, `references`.
    pub fixture: PathBuf,

    /// Keep rows whose KEY matches VALUE (repeatable). VALUE is read as JSON, else as text.
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, Value)>,

    /// Toggle the sort on KEY; give it twice for descending (repeatable).
    #[arg(long = "sort", value_name = "KEY")]
    pub sorts: Vec<String>,

    /// Edit and save one cell before printing (repeatable).
    #[arg(long = "set", value_name = "ROW.KEY=VALUE", value_parser = parse_edit)]
    pub edits: Vec<CellEdit>,

    /// Show page N.
    #[arg(long, value_name = "N")]
    pub page: Option<usize>,

    /// Match string filters exactly instead of by substring.
    #[arg(long)]
    pub exact: bool,
}

fn split_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

fn parse_filter(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = split_pair(raw)?;
    let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
    Ok((key, value))
}

fn parse_edit(raw: &str) -> Result<CellEdit, String> {
    let (target, input) = split_pair(raw)?;
    let (row_id, column_key) = target
        .rsplit_once('.')
        .ok_or_else(|| format!("expected ROW.KEY, got '{}'", target))?;
    Ok(CellEdit {
        row_id: row_id.to_string(),
        column_key: column_key.to_string(),
        input,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("dyntable-cli").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_full() {
        let args = parse(&[
            "leases.json",
            "--filter",
            "term=36",
            "--filter",
            "customer=Acme",
            "--sort",
            "customer",
            "--set",
            "D1.term=48",
            "--page",
            "2",
            "--exact",
        ])
        .unwrap();

        assert_eq!(args.fixture, PathBuf::from("leases.json"));
        assert_eq!(
            args.filters,
            vec![
                ("term".to_string(), Value::from(36)),
                ("customer".to_string(), Value::from("Acme"))
            ]
        );
        assert_eq!(args.sorts, vec!["customer".to_string()]);
        assert_eq!(args.edits[0].row_id, "D1");
        assert_eq!(args.edits[0].column_key, "term");
        assert_eq!(args.edits[0].input, "48");
        assert_eq!(args.page, Some(2));
        assert!(args.exact);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["a.json", "--filter"]).is_err());
        assert!(parse(&["a.json", "--filter", "term"]).is_err());
        assert!(parse(&["a.json", "--set", "term=1"]).is_err());
        assert!(parse(&["a.json", "--page", "two"]).is_err());
        assert!(parse(&["a.json", "--bogus"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
    }
}
