mod args;
mod error;
mod fixture;

use std::fs::File;

use clap::Parser;

use dyntable_lib::DynamicTable;
use dyntable_lib::config::StringMatch;
use dyntable_lib::events::GridEvent;
use dyntable_lib::host::InMemoryHost;
use dyntable_lib::query::FilterSpec;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::args::Args;
use crate::error::CliError;
use crate::fixture::Fixture;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), CliError> {
    let args = Args::parse();

    let log_file = File::create("dyntable-cli.log").map_err(|source| CliError::Io {
        path: "dyntable-cli.log".to_string(),
        source,
    })?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let mut fixture = Fixture::load(&args.fixture)?;
    if args.exact {
        fixture.config = fixture.config.with_string_match(StringMatch::Exact);
    }
    let mut grid = fixture.into_grid();
    let mut events = grid.events().subscribe();
    let host = InMemoryHost::new();

    for edit in &args.edits {
        grid.begin_edit(&edit.row_id, &edit.column_key)?;
        grid.stage_input(&edit.input)?;
        grid.save_edit(&host).await?;
    }
    for (key, value) in args.filters {
        grid.add_filter(FilterSpec::new(key, value));
    }
    for key in &args.sorts {
        grid.toggle_sort(key);
    }
    if let Some(page) = args.page {
        grid.change_page(&host, page)?;
    }

    print!("{}", render(&grid));
    while let Ok(event) = events.try_recv() {
        if let GridEvent::CellCommitted { row_id, column_key, .. } = event {
            log::info!("saved {}.{}", row_id, column_key);
        }
    }
    Ok(())
}

/// Renders the visible page as a padded text table.
fn render(grid: &DynamicTable) -> String {
    let columns = grid.schema().columns();
    let page = grid.page();
    let visible = grid.visible_rows();
    let shown = visible
        .iter()
        .skip((page.current_page() - 1) * page.page_size())
        .take(page.page_size());

    let mut table: Vec<Vec<String>> = vec![columns.iter().map(|c| c.name.clone()).collect()];
    for row in shown {
        table.push(
            columns
                .iter()
                .map(|c| grid.render_cell(row, &c.key).text().to_string())
                .collect(),
        );
    }

    let widths: Vec<usize> = (0..columns.len())
        .map(|i| table.iter().map(|r| r[i].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for (n, row) in table.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
        if n == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("  "));
            out.push('\n');
        }
    }
    out.push_str(&format!("\n{} visible, page {} of {}\n", visible.len(), page.current_page(), page.total_pages()));
    out
}
