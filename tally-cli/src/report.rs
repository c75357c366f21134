//! Plain-text rendering of dashboard pieces for the terminal.

use std::fmt::Write;

use tally_core::insights::compact_dollars;
use tally_core::proportion::{GradientDirection, css_linear_gradient};
use tally_core::{PeriodKind, PeriodWindow, SpendStatus, period_label};
use tally_finance::{Dashboard, SummaryView};
use tally_finance::dashboard::{BudgetCard, GoalCard};

const BAR_CELLS: usize = 20;

fn bar(width_pct: u8) -> String {
    let filled = (usize::from(width_pct) * BAR_CELLS / 100).min(BAR_CELLS);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_CELLS - filled))
}

fn status_mark(status: SpendStatus) -> &'static str {
    match status {
        SpendStatus::OnTrack => " ",
        SpendStatus::NearLimit => "!",
        SpendStatus::OverBudget => "x",
    }
}

pub fn render_window(kind: PeriodKind, offset: i32, window: &PeriodWindow) -> String {
    format!(
        "{} ({kind}, offset {offset}): {} .. {} ({} days)",
        period_label(kind, window),
        window.start,
        window.end,
        window.days()
    )
}

pub fn render_budget(card: &BudgetCard) -> String {
    let b = &card.budget;
    let p = &card.progress;
    let mut line = format!(
        "{} {:<16} {} {:>4}%  ${:.2} / ${:.2}  {}",
        status_mark(p.status),
        b.category_name,
        bar(p.bar_width),
        p.percentage,
        b.spent_amount,
        b.amount,
        p.status.label()
    );
    if p.projection.displayable {
        let _ = write!(
            line,
            "  projected ${:.2} over {} days{}",
            p.projection.projected_spend,
            p.projection.total_days,
            if p.projection.is_over_projected { " (over)" } else { "" }
        );
    } else if p.projection.ended {
        line.push_str("  ended");
    }
    line
}

pub fn render_goal(card: &GoalCard) -> String {
    let g = &card.goal;
    let p = &card.progress;
    let tail = if p.over_limit {
        format!("${:.2} over target", p.difference)
    } else {
        format!("${:.2} left", p.difference)
    };
    format!(
        "{} {:<10} {} {:>4}%  ${:.2} / ${:.2}  {}",
        status_mark(p.status),
        g.month,
        bar(p.bar_width),
        p.percentage,
        g.current_amount,
        g.target_amount,
        tail
    )
}

pub fn render_dashboard(dash: &Dashboard) -> String {
    let kind = dash.selection.kind;
    let mut out = String::new();

    let _ = writeln!(out, "{}", dash.label);
    let _ = writeln!(
        out,
        "offset {} of [{}, {}]  {}{}",
        dash.selection.offset,
        dash.bounds.min_offset,
        dash.bounds.max_offset,
        if dash.can_go_back { "<older " } else { "" },
        if dash.can_go_forward { "newer>" } else { "" }
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Spent ${:.2}  (daily average ${:.2})", dash.total_spent, dash.daily_average);
    if let Some(cmp) = &dash.comparison {
        let _ = writeln!(out, "{}", cmp.sentence(kind));
    }
    if let Some(day) = &dash.highest_day {
        let _ = writeln!(out, "Highest day: {} (${:.2})", day.date.format("%a %b %-d"), day.total);
    }
    if kind != PeriodKind::Week {
        if let Some(week) = &dash.highest_week {
            let _ = writeln!(out, "Highest week: of {} (${:.2})", week.date.format("%b %-d"), week.total);
        }
    }

    if !dash.shares.is_empty() {
        let _ = writeln!(out, "\nCategories");
        for s in &dash.shares {
            let _ = writeln!(
                out,
                "  {:<16} ${:>9.2} {:>4}%  {} receipt{}",
                s.category,
                s.total,
                s.display_pct(),
                s.count,
                if s.count == 1 { "" } else { "s" }
            );
        }
        if let Some(css) = css_linear_gradient(&dash.category_stops, GradientDirection::ToRight) {
            let _ = writeln!(out, "  {css}");
        }
    }

    if dash.chart.iter().any(|c| c.total > 0.0) {
        let top = dash.chart_ticks.last().copied().unwrap_or(0).max(1) as f64;
        let _ = writeln!(
            out,
            "\nChart (axis {})",
            dash.chart_ticks.iter().map(|t| compact_dollars(*t)).collect::<Vec<_>>().join(" ")
        );
        for c in &dash.chart {
            let cells = ((c.total / top) * BAR_CELLS as f64).round() as usize;
            let label = match kind {
                PeriodKind::Week => c.date.format("%a").to_string(),
                PeriodKind::Month => c.date.format("%b %-d").to_string(),
                PeriodKind::Year => c.date.format("%b").to_string(),
            };
            let _ = writeln!(out, "  {:<7} {:<20} ${:.2}", label, "#".repeat(cells.min(BAR_CELLS)), c.total);
        }
    }

    if !dash.merchants.is_empty() {
        let _ = writeln!(out, "\nMerchants");
        for m in dash.merchants.iter().take(5) {
            let _ = writeln!(out, "  {:<24} ${:.2}", m.label(), m.total);
        }
        match (&dash.most_spent_store, &dash.most_visited_store) {
            (Some(spent), Some(visited)) if spent == visited => {
                let _ = writeln!(out, "  {spent} is both your top spend and most visited");
            }
            (Some(spent), Some(visited)) => {
                let _ = writeln!(out, "  Most spent: {spent}; most visited: {visited}");
            }
            _ => {}
        }
    }

    if !dash.alerts.is_empty() {
        let _ = writeln!(out, "\nBudget alerts");
        for card in &dash.alerts {
            let _ = writeln!(out, "{}", render_budget(card));
        }
    }

    if !dash.goals.is_empty() {
        let _ = writeln!(out, "\nGoals");
        for card in &dash.goals {
            let _ = writeln!(out, "{}", render_goal(card));
        }
    }

    out
}

pub fn render_summary(view: &SummaryView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.label);
    let _ = writeln!(out, "Spent ${:.2}  (daily average ${:.2})", view.total_spent, view.daily_average);
    if let Some(cmp) = &view.comparison {
        let _ = writeln!(out, "{}", cmp.sentence(view.kind));
    }
    if let Some(day) = &view.highest_day {
        let _ = writeln!(out, "Highest day: {} (${:.2})", day.date.format("%a %b %-d"), day.total);
    }
    for s in &view.shares {
        let _ = writeln!(out, "  {:<16} ${:>9.2} {:>4}%", s.category, s.total, s.display_pct());
    }
    if let (Some(spent), Some(visited)) = (&view.most_spent_store, &view.most_visited_store) {
        let _ = writeln!(out, "Most spent: {spent}; most visited: {visited}");
    }
    if !view.subscriptions.is_empty() {
        let _ = writeln!(out, "Subscriptions: {}", view.subscriptions.join(", "));
    }
    out
}
