// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tabula_core::validation::format_cents;
use tabula_core::{Dispute, SelectionSet, View};

pub fn render_row(dispute: &Dispute, selected: bool) -> String {
    format!(
        "[{}] {:<9} {:<12} {:<9} {:>13}  {}  {}",
        if selected { "x" } else { " " },
        dispute.reference,
        dispute.status.as_str(),
        dispute.priority.as_str(),
        format_cents(dispute.amount_cents),
        dispute.opened,
        dispute.vendor,
    )
}

/// `selected 3 (1 hidden by filters)`; the hidden part only shows up when
/// the filters hide some selected ids.
pub fn render_selection(selected: usize, hidden: usize) -> String {
    if hidden == 0 {
        format!("selected {selected}")
    } else {
        format!("selected {selected} ({hidden} hidden by filters)")
    }
}

pub fn render_view(view: &View<'_, Dispute>, selection: &SelectionSet) -> String {
    let mut lines: Vec<String> = view
        .page_records
        .iter()
        .map(|dispute| render_row(dispute, selection.contains(dispute.id)))
        .collect();
    lines.push(view.summary().to_string());
    lines.push(render_selection(view.selected_count, view.hidden_selected_count));
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{render_row, render_selection, render_view};
    use tabula_core::{
        Dispute, FilterState, PaginationState, RecordId, SelectionSet, SortState, compute_view,
    };
    use tabula_testkit::{dispute, sample_disputes};

    #[test]
    fn row_marks_selection_and_formats_money() {
        let record = Dispute {
            amount_cents: 123_456,
            ..dispute(3)
        };
        let row = render_row(&record, true);
        assert!(row.starts_with("[x] DSP-0003"), "{row}");
        assert!(row.contains("$1,234.56"), "{row}");
        assert!(row.contains("2025-01-01"), "{row}");
        assert!(row.ends_with("Apex Freight Co"), "{row}");
        assert!(render_row(&record, false).starts_with("[ ] "));
    }

    #[test]
    fn selection_line_mentions_hidden_ids() {
        assert_eq!(render_selection(2, 1), "selected 2 (1 hidden by filters)");
        assert_eq!(render_selection(0, 0), "selected 0");
    }

    #[test]
    fn view_lists_page_then_summary() {
        let records = sample_disputes();
        let selection: SelectionSet = [RecordId::new(6)].into_iter().collect();
        let view = compute_view(
            &records,
            &Dispute::SCHEMA,
            &FilterState::new(),
            &SortState::unsorted(),
            PaginationState::new(2, 5),
            &selection,
        );
        let rendered = render_view(&view, &selection);
        assert!(rendered.ends_with("selected 1\n"), "{rendered}");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("[x] DSP-0006"), "{}", lines[0]);
        assert!(lines[4].starts_with("[ ] DSP-0010"), "{}", lines[4]);
        assert_eq!(lines[5], "page 2/3 | showing 6-10 of 12");
        assert_eq!(lines[6], "selected 1");
    }
}
