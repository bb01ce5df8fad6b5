use std::path::Path;

use anyhow::{Context, Result};

use quotemill_core::matcher::{match_items, MatchedItem, NOT_AVAILABLE};
use quotemill_core::{load_master, parse_markdown_table};

pub fn run(table: &str, master: Option<&str>) -> Result<()> {
    let master_path = super::resolve_master(master)?;

    let table_md = std::fs::read_to_string(table)
        .with_context(|| format!("failed to read table file {table}"))?;
    let items = parse_markdown_table(&table_md)?;
    let master = load_master(&master_path)?;

    let matched = match_items(&items, &master);
    println!("{}", render_matched_table(&matched));

    Ok(())
}

fn render_matched_table(matched: &[MatchedItem]) -> String {
    let mut out = String::from(
        "| Req. Ref. | Project | Site | Env. | Type | Items | Qty (GiB) \
| Unit Cost | Total Cost | Quote Reference # | Matching Score |",
    );

    for m in matched {
        let item = &m.item;
        out.push_str(&format!(
            "\n| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {:.1} |",
            item.req_ref,
            item.project,
            item.site,
            item.env,
            item.kind,
            item.items,
            item.qty,
            money(m.unit_cost),
            money(m.total_cost),
            m.quote_reference.as_deref().unwrap_or(NOT_AVAILABLE),
            m.match_score,
        ));
    }

    out
}

fn money(amount: Option<rust_decimal::Decimal>) -> String {
    amount.map_or_else(|| NOT_AVAILABLE.into(), |a| format!("{a:.2}"))
}
