//! Message bodies for inventory and backup alerts.
//!
//! Every message has an HTML body for mail clients and a plain-text fallback.

use super::{AlertBatch, AlertKind};
use crate::inventory::ItemSummary;

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedAlert {
    pub subject: String,
    pub body_html: String,
    pub body_text: String,
}

pub fn compose(batch: &AlertBatch) -> ComposedAlert {
    match batch.kind {
        AlertKind::LowStock => low_stock(batch),
        AlertKind::MaintenanceDue => maintenance_reminder(batch),
    }
}

fn low_stock(batch: &AlertBatch) -> ComposedAlert {
    let count = batch.items.len();
    let subject = format!("Low stock - {} item{}", count, plural(count));

    let rows: String = batch
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td><td style=\"color:#ef4444;font-weight:600\">{} {}</td><td>{} {}</td><td>{}</td><td>{}</td></tr>",
                escape(&item.name),
                item.quantity,
                escape(&item.unit),
                item.min_quantity,
                escape(&item.unit),
                escape(or_dash(&item.category_name)),
                escape(or_dash(&item.location_name)),
            )
        })
        .collect();

    let body_html = wrap_html(
        "Low stock",
        &format!(
            "<p>The following {} item{} are at or below their minimum quantity:</p>\
             <table><thead><tr><th>Item</th><th>Current</th><th>Minimum</th><th>Category</th><th>Location</th></tr></thead>\
             <tbody>{}</tbody></table>",
            count,
            plural(count),
            rows
        ),
        batch,
    );

    let mut body_text = format!(
        "Low stock\n\nThe following {} item{} are at or below their minimum quantity:\n\n",
        count,
        plural(count)
    );
    for item in &batch.items {
        body_text.push_str(&format!(
            "- {}: {} {} (minimum {} {}), category {}, location {}\n",
            item.name,
            item.quantity,
            item.unit,
            item.min_quantity,
            item.unit,
            or_dash(&item.category_name),
            or_dash(&item.location_name),
        ));
    }

    ComposedAlert {
        subject,
        body_html,
        body_text,
    }
}

fn maintenance_reminder(batch: &AlertBatch) -> ComposedAlert {
    let count = batch.items.len();
    let subject = format!("Maintenance reminder - {} item{}", count, plural(count));

    let rows: String = batch
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td><td style=\"color:#f59e0b;font-weight:600\">{}</td><td>{}</td><td>{}</td></tr>",
                escape(&item.name),
                next_date(item),
                interval(item),
                escape(or_dash(&item.location_name)),
            )
        })
        .collect();

    let body_html = wrap_html(
        "Maintenance reminder",
        &format!(
            "<p>Maintenance is due soon for {} item{}:</p>\
             <table><thead><tr><th>Item</th><th>Next maintenance</th><th>Interval</th><th>Location</th></tr></thead>\
             <tbody>{}</tbody></table>",
            count,
            plural(count),
            rows
        ),
        batch,
    );

    let mut body_text = format!(
        "Maintenance reminder\n\nMaintenance is due soon for {} item{}:\n\n",
        count,
        plural(count)
    );
    for item in &batch.items {
        body_text.push_str(&format!(
            "- {}: due {}, interval {}, location {}\n",
            item.name,
            next_date(item),
            interval(item),
            or_dash(&item.location_name),
        ));
    }

    ComposedAlert {
        subject,
        body_html,
        body_text,
    }
}

/// Outcome message for a single backup run.
pub fn backup_status(success: bool, snapshot_name: Option<&str>, error: Option<&str>) -> ComposedAlert {
    if success {
        let name = snapshot_name.unwrap_or("-");
        ComposedAlert {
            subject: "Backup created successfully".to_string(),
            body_html: format!(
                "<h2 style=\"color:#10b981\">Backup created successfully</h2><p>Snapshot: <strong>{}</strong></p>",
                escape(name)
            ),
            body_text: format!("Backup created successfully\n\nSnapshot: {}\n", name),
        }
    } else {
        let reason = error.unwrap_or("unknown error");
        ComposedAlert {
            subject: "Backup failed".to_string(),
            body_html: format!(
                "<h2 style=\"color:#ef4444\">Backup failed</h2><p>Error: <code>{}</code></p>",
                escape(reason)
            ),
            body_text: format!("Backup failed\n\nError: {}\n", reason),
        }
    }
}

fn wrap_html(title: &str, content: &str, batch: &AlertBatch) -> String {
    format!(
        "<html><body style=\"font-family:sans-serif\"><h2>{}</h2>{}<p style=\"color:#64748b;font-size:12px\">Generated {}</p></body></html>",
        title,
        content,
        batch.generated_at.format("%Y-%m-%d %H:%M UTC")
    )
}

fn next_date(item: &ItemSummary) -> String {
    item.next_maintenance_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn interval(item: &ItemSummary) -> String {
    item.maintenance_interval_days
        .map(|days| format!("{} days", days))
        .unwrap_or_else(|| "-".to_string())
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
