use unicode_width::UnicodeWidthStr;

use llm_compare::pricing::format_cost;
use llm_compare::ModelResult;

const HEADERS: [&str; 5] = ["Model", "Status", "Time (s)", "Tokens", "Cost"];

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

const ALIGN: [Align; 5] = [
    Align::Left,
    Align::Center,
    Align::Right,
    Align::Right,
    Align::Right,
];

fn row(result: &ModelResult) -> [String; 5] {
    [
        result.model().to_string(),
        if result.is_success() { "✓" } else { "✗" }.to_string(),
        result
            .response_time()
            .map_or_else(|| "N/A".to_string(), |t| format!("{t:.2}")),
        result
            .total_tokens()
            .map_or_else(|| "N/A".to_string(), |t| t.to_string()),
        format_cost(result.estimated_cost()),
    ]
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let gap = width.saturating_sub(text.width());
    let (left, right) = match align {
        Align::Left => (0, gap),
        Align::Right => (gap, 0),
        Align::Center => (gap / 2, gap - gap / 2),
    };
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

fn border(widths: &[usize; 5], left: &str, mid: &str, right: &str) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(mid))
}

fn line(cells: &[String; 5], widths: &[usize; 5], align: Option<Align>) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(ALIGN)
        .map(|((cell, width), default)| pad(cell, *width, align.unwrap_or(default)))
        .collect();
    format!("│ {} │", padded.join(" │ "))
}

/// Renders one row per result in a boxed table; widths follow the display
/// width of each cell.
pub fn render_table(results: &[ModelResult]) -> String {
    let header = HEADERS.map(str::to_string);
    let rows: Vec<[String; 5]> = results.iter().map(row).collect();

    let mut widths = HEADERS.map(UnicodeWidthStr::width);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = vec![
        border(&widths, "┌", "┬", "┐"),
        line(&header, &widths, Some(Align::Center)),
        border(&widths, "├", "┼", "┤"),
    ];
    out.extend(rows.iter().map(|cells| line(cells, &widths, None)));
    out.push(border(&widths, "└", "┴", "┘"));
    out.join("\n")
}
