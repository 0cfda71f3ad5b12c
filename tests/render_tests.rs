use chrono::NaiveDate;
use custody_calendar::colorize::legend;
use custody_calendar::render::{
    PageContext, escape_html, render_html_page, render_html_table, render_text_table,
};
use custody_calendar::{
    CalendarConfig, ColumnRole, CustodyTable, Language, MonthKey, Palette, RowColorizer,
    ScheduleRow, StyledTable,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn styled_sample() -> StyledTable {
    let rows = vec![
        ScheduleRow::new(d(2025, 12, 30), Language::French).with_parent("Sanou"),
        ScheduleRow::new(d(2025, 12, 31), Language::French)
            .with_parent("Jerome")
            .with_vacation("Vacances de Noël"),
    ];
    let table = CustodyTable::from_rows(
        &rows,
        vec![
            ColumnRole::Date,
            ColumnRole::Weekday,
            ColumnRole::Parent,
            ColumnRole::Vacation,
        ],
    )
    .unwrap();
    let config = CalendarConfig::default();
    StyledTable::build(
        &table,
        &RowColorizer::from_config(&config),
        &Palette::default(),
        Language::French,
    )
    .unwrap()
}

#[test]
fn text_table_lists_rows_with_their_category() {
    let text = render_text_table(&styled_sample());
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with('+'));
    assert!(lines[1].contains("Vacances scolaires"));
    assert!(lines[1].contains("style"));
    assert!(lines[3].contains("2025-12-30"));
    assert!(lines[3].contains("parent_b"));
    assert!(lines[4].contains("Vacances de Noël*"));
    assert!(lines[4].contains("| vacation"));

    let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
    assert!(widths.iter().all(|w| *w == widths[0]), "rows are aligned: {text}");
}

#[test]
fn html_escape_covers_markup_characters() {
    assert_eq!(
        escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
        "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
    );
}

#[test]
fn html_table_carries_inline_styles() {
    let html = render_html_table(&styled_sample());
    assert!(html.contains("<th>Vacances scolaires</th>"));
    assert!(html.contains(r#"<tr class="parent_b">"#));
    assert!(html.contains(r#"<td style="background-color: #BDD7EE">Sanou</td>"#));
    assert!(html.contains(
        r#"<td style="background-color: #D9C3E9; color: #7030A0; font-weight: bold">Vacances de Noël</td>"#
    ));
}

#[test]
fn neutral_cells_have_no_style_attribute() {
    let rows = vec![ScheduleRow::new(d(2025, 9, 2), Language::French)];
    let table = CustodyTable::from_rows(&rows, vec![ColumnRole::Date]).unwrap();
    let styled = StyledTable::build(
        &table,
        &RowColorizer::from_config(&CalendarConfig::default()),
        &Palette::default(),
        Language::French,
    )
    .unwrap();
    assert!(render_html_table(&styled).contains("<td>2025-09-02</td>"));
}

#[test]
fn page_has_selector_table_and_legend() {
    let config = CalendarConfig::default();
    let months = vec![
        MonthKey::new(2025, 11).unwrap(),
        MonthKey::new(2025, 12).unwrap(),
    ];
    let legend = legend(&config);
    let page = render_html_page(
        &styled_sample(),
        &PageContext {
            title: "Garde <2025>",
            language: Language::French,
            months: &months,
            selected: Some(months[1]),
            legend: &legend,
        },
    );

    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains(r#"<html lang="fr">"#));
    assert!(page.contains("<title>Garde &lt;2025&gt;</title>"));
    assert!(page.contains(r#"<select name="month""#));
    assert!(page.contains(r#"<option value="2025-11">novembre 2025</option>"#));
    assert!(page.contains(r#"<option value="2025-12" selected>décembre 2025</option>"#));
    assert!(page.contains(r#"<p class="legend">"#));
    assert!(page.contains("Jour de passage"));
}
