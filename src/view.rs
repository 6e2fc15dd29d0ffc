use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::store::Entry;

/// Column the listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortColumn {
    #[default]
    Id,
    Name,
    Username,
    Email,
    Amount,
}

/// Client-side shaping of a listing: filter, then sort, then paginate.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub sort: SortColumn,
    pub descending: bool,
    pub filter: Option<String>,
    /// 1-based page index.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort: SortColumn::Id,
            descending: false,
            filter: None,
            page: 1,
            page_size: 10,
        }
    }
}

/// Apply filter, sort, and pagination to a snapshot's entries.
///
/// The sort is stable, so records comparing equal keep their insertion
/// order. A page past the end of the data comes back empty.
pub fn shape(entries: &[Entry], opts: &ListOptions) -> Vec<Entry> {
    let mut rows: Vec<Entry> = match &opts.filter {
        Some(needle) => {
            let needle = needle.to_lowercase();
            entries
                .iter()
                .filter(|entry| matches_filter(entry, &needle))
                .cloned()
                .collect()
        }
        None => entries.to_vec(),
    };

    rows.sort_by(|a, b| {
        let ord = match opts.sort {
            SortColumn::Id => a.record.id.cmp(&b.record.id),
            SortColumn::Name => a.record.name.cmp(&b.record.name),
            SortColumn::Username => a.record.username.cmp(&b.record.username),
            SortColumn::Email => a.record.email.cmp(&b.record.email),
            SortColumn::Amount => a.record.amount.cmp(&b.record.amount),
        };
        if opts.descending { ord.reverse() } else { ord }
    });

    let start = opts.page.saturating_sub(1).saturating_mul(opts.page_size);
    rows.into_iter().skip(start).take(opts.page_size).collect()
}

fn matches_filter(entry: &Entry, needle: &str) -> bool {
    let record = &entry.record;
    record.name.to_lowercase().contains(needle)
        || record.username.to_lowercase().contains(needle)
        || record.email.to_lowercase().contains(needle)
}

/// Render shaped rows as a terminal table.
pub fn render_table(rows: &[Entry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Name", "Username", "Email", "Amount"]);

    for entry in rows {
        let record = &entry.record;
        table.add_row(vec![
            record
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            record.name.clone(),
            record.username.clone(),
            record.email.clone(),
            record
                .amount
                .map(|amount| amount.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}
