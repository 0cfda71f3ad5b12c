use crate::calendar::Language;
use crate::colorize::{LegendEntry, StyledTable};
use crate::month::MonthKey;
use std::fmt::Write;

fn width(s: &str) -> usize {
    s.chars().count()
}

fn push_padded(out: &mut String, text: &str, column_width: usize) {
    out.push(' ');
    out.push_str(text);
    out.push_str(&" ".repeat(column_width.saturating_sub(width(text))));
    out.push_str(" |");
}

/// Bordered plain-text table. Colors cannot be shown, so the row category is
/// printed in a trailing column and cells styled differently from their row
/// (the vacation override) are marked with `*`.
pub fn render_text_table(table: &StyledTable) -> String {
    let mut headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    headers.push("style");

    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row
                .cells
                .iter()
                .map(|cell| {
                    if cell.category != row.category {
                        format!("{}*", cell.text)
                    } else {
                        cell.text.clone()
                    }
                })
                .collect();
            cells.push(row.category.as_str().to_string());
            cells
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    for cells in &body {
        for (ci, text) in cells.iter().enumerate() {
            if let Some(w) = widths.get_mut(ci) {
                *w = (*w).max(width(text));
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push('|');
    for (name, w) in headers.iter().zip(&widths) {
        push_padded(&mut out, name, *w);
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for cells in &body {
        out.push('|');
        for (text, w) in cells.iter().zip(&widths) {
            push_padded(&mut out, text, *w);
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Inputs of the dashboard page besides the styled rows.
pub struct PageContext<'a> {
    pub title: &'a str,
    pub language: Language,
    pub months: &'a [MonthKey],
    pub selected: Option<MonthKey>,
    pub legend: &'a [LegendEntry],
}

/// Self-contained HTML page: month selector, styled table and legend.
pub fn render_html_page(table: &StyledTable, ctx: &PageContext<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <h1>{title}</h1>
    {selector}
    {table}
    {legend}
</body>
</html>"#,
        lang = match ctx.language {
            Language::French => "fr",
            Language::English => "en",
        },
        title = escape_html(ctx.title),
        css = PAGE_CSS,
        selector = render_month_selector(ctx),
        table = render_html_table(table),
        legend = render_legend(ctx.legend),
    )
}

const PAGE_CSS: &str = "body { font-family: sans-serif; margin: 1.5rem; } \
table { border-collapse: collapse; width: 100%; } \
th, td { border: 1px solid #ccc; padding: 0.3rem 0.6rem; text-align: left; } \
th { background: #f5f5f5; } \
.legend span { display: inline-block; padding: 0.2rem 0.6rem; margin-right: 0.4rem; border: 1px solid #ccc; }";

fn render_month_selector(ctx: &PageContext<'_>) -> String {
    let mut options = String::new();
    for month in ctx.months {
        let selected = if ctx.selected == Some(*month) { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{code}"{selected}>{label}</option>"#,
            code = month.code(),
            label = escape_html(&month.label(ctx.language)),
        );
    }
    let label = match ctx.language {
        Language::French => "Mois",
        Language::English => "Month",
    };
    format!(
        r#"<form method="get" action="/"><label>{label} <select name="month" onchange="this.form.submit()">{options}</select></label></form>"#
    )
}

pub fn render_html_table(table: &StyledTable) -> String {
    let mut out = String::from("<table>\n<thead><tr>");
    for header in &table.headers {
        let _ = write!(out, "<th>{}</th>", escape_html(header));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        let _ = write!(out, r#"<tr class="{}">"#, row.category.as_str());
        for cell in &row.cells {
            let css = cell.style.to_css();
            if css.is_empty() {
                let _ = write!(out, "<td>{}</td>", escape_html(&cell.text));
            } else {
                let _ = write!(out, r#"<td style="{css}">{}</td>"#, escape_html(&cell.text));
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>");
    out
}

fn render_legend(entries: &[LegendEntry]) -> String {
    let mut out = String::from(r#"<p class="legend">"#);
    for entry in entries {
        let _ = write!(
            out,
            r#"<span style="{}">{}</span>"#,
            entry.style.to_css(),
            escape_html(&entry.label)
        );
    }
    out.push_str("</p>");
    out
}
