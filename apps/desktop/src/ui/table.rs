use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use client_core::{Draft, DraftField, Operation, Phase, ViewState};
use shared::domain::Property;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Also show location code, size and price columns.
    pub detailed: bool,
}

/// Renders one snapshot. Depends on nothing but its arguments.
pub fn render(state: &ViewState, options: RenderOptions) -> String {
    let mut out = String::new();

    if let Some(id) = state.last_created {
        let _ = writeln!(out, "Created property with ID: {id}");
    }
    if let Some(notice) = &state.notice {
        let _ = writeln!(out, "Error: {}", notice.message);
    }

    let refreshing = state.phase == Phase::Pending(Operation::Refresh);
    match &state.properties {
        _ if refreshing => out.push_str("Loading…\n"),
        None if state.error().is_none() => out.push_str("Loading…\n"),
        None => {}
        Some(properties) if properties.is_empty() => out.push_str("No properties found.\n"),
        Some(properties) => render_table(&mut out, properties, options),
    }

    out
}

pub fn render_draft(draft: &Draft) -> String {
    let mut out = String::new();
    let width = DraftField::ALL
        .iter()
        .map(|field| field.name().len())
        .max()
        .unwrap_or(0);
    for field in DraftField::ALL {
        let value = draft.get(field);
        let marker = if field.is_required() && value.trim().is_empty() {
            "  (required)"
        } else {
            ""
        };
        let _ = writeln!(out, "{:<width$} : {value}{marker}", field.name());
    }
    out
}

pub fn format_listing_date(listed_at: &DateTime<Utc>) -> String {
    listed_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn render_table(out: &mut String, properties: &[Property], options: RenderOptions) {
    let mut header = vec!["ID", "Address", "City", "ZIP", "Listed At"];
    if options.detailed {
        header.extend(["Location", "Size (ft²)", "Base Price (USD)"]);
    }

    let rows: Vec<Vec<String>> = properties
        .iter()
        .map(|p| {
            let mut row = vec![
                p.id.to_string(),
                p.address.clone(),
                p.city.clone(),
                p.zip.clone(),
                format_listing_date(&p.listing_date),
            ];
            if options.detailed {
                row.push(p.location_code.clone());
                row.push(format!("{}", p.size_sqft));
                row.push(format!("{:.2}", p.base_price_usd));
            }
            row
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, header.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, rule.iter().map(String::as_str), &widths);
    for row in &rows {
        write_row(out, row.iter().map(String::as_str), &widths);
    }
}

fn write_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
#[path = "../tests/render_tests.rs"]
mod tests;
