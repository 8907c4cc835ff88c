//! Plain-text rendering for `--once`

use std::fmt::Write;

use super::format::row_columns;
use crate::dashboard::Snapshot;
use crate::data::InstrumentKind;

/// Renders a snapshot as an aligned text table
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    let label_width = [
        InstrumentKind::Stock,
        InstrumentKind::Crypto,
        InstrumentKind::Forex,
    ]
    .iter()
    .flat_map(|kind| snapshot.rows(*kind))
    .map(|row| row.instrument.display_label().chars().count())
    .max()
    .unwrap_or(0);

    for kind in [
        InstrumentKind::Stock,
        InstrumentKind::Crypto,
        InstrumentKind::Forex,
    ] {
        let rows = snapshot.rows(kind);
        if rows.is_empty() {
            continue;
        }

        let _ = writeln!(out, "{}", kind.title());
        for row in rows {
            let (price, change) = row_columns(row);
            let line = format!(
                "  {:<lw$}  {:>14}  {}",
                row.instrument.display_label(),
                price,
                change,
                lw = label_width
            );
            let _ = writeln!(out, "{}", line.trim_end());
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "Updated {}",
        snapshot.refreshed_at.format("%Y-%m-%d %H:%M:%S")
    );
    out
}
