use chrono::NaiveDate;
use custody_calendar::normalize::{is_identifier_header, reorder_columns};
use custody_calendar::{
    CalendarConfig, ColumnRole, LoadError, RawTable, canonical_label, normalize,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

#[test]
fn sentinels_become_canonical_empty() {
    for value in ["", "   ", "None", "none", "NONE", "nan", "NaN", "NaT", "nat", " None ", "null", "NULL"] {
        assert_eq!(canonical_label(value), None, "value {value:?} should be empty");
    }
}

#[test]
fn present_labels_are_trimmed() {
    assert_eq!(canonical_label("  Noël "), Some("Noël".to_string()));
    assert_eq!(
        canonical_label("Vacances de la Toussaint"),
        Some("Vacances de la Toussaint".to_string())
    );
}

#[test]
fn unknown_sentinel_spellings_are_kept_as_text() {
    assert_eq!(canonical_label("N/A"), Some("N/A".to_string()));
    assert_eq!(canonical_label("-"), Some("-".to_string()));
}

#[test]
fn identifier_headers_are_recognised() {
    assert!(is_identifier_header("Observations"));
    assert!(is_identifier_header("observation"));
    assert!(is_identifier_header("Unnamed: 0"));
    assert!(is_identifier_header(""));
    assert!(!is_identifier_header("date"));
    assert!(!is_identifier_header("parent"));
}

#[test]
fn normalized_labels_never_hold_sentinel_text() {
    let table = normalize(
        raw(
            &["date", "parent", "nom_ferie", "Vacances_scolaires"],
            &[
                &["2025-09-01", "Jerome", "nan", "None"],
                &["2025-09-02", "Jerome", "NaT", ""],
                &["2025-09-03", "nan", " Fête ", "  Toussaint "],
            ],
        ),
        &CalendarConfig::default(),
    )
    .unwrap();

    let rows = table.rows().unwrap();
    for row in &rows {
        for label in [&row.holiday_name, &row.school_vacation_label] {
            if let Some(text) = label {
                assert!(!text.is_empty());
                assert_eq!(text.trim(), text);
                assert!(!["none", "nan", "nat"].contains(&text.to_lowercase().as_str()));
            }
        }
    }
    assert_eq!(rows[0].holiday_name, None);
    assert_eq!(rows[1].school_vacation_label, None);
    assert_eq!(rows[2].assigned_parent, None);
    assert_eq!(rows[2].holiday_name.as_deref(), Some("Fête"));
    assert_eq!(rows[2].school_vacation_label.as_deref(), Some("Toussaint"));
}

#[test]
fn rows_are_sorted_and_dates_strictly_increase() {
    let table = normalize(
        raw(
            &["date", "parent"],
            &[
                &["2025-09-05", "Jerome"],
                &["2025-09-01", "Sanou"],
                &["2025-09-03", "Jerome"],
            ],
        ),
        &CalendarConfig::default(),
    )
    .unwrap();

    let dates = table.dates().unwrap();
    assert_eq!(dates, vec![d(2025, 9, 1), d(2025, 9, 3), d(2025, 9, 5)]);
    assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn duplicate_dates_are_rejected() {
    let result = normalize(
        raw(
            &["date", "parent"],
            &[&["2025-09-01", "Jerome"], &["2025-09-01", "Sanou"]],
        ),
        &CalendarConfig::default(),
    );
    match result {
        Err(LoadError::DuplicateDate(date)) => assert_eq!(date, d(2025, 9, 1)),
        other => panic!("expected DuplicateDate, got {other:?}"),
    }
}

#[test]
fn unparseable_date_fails_the_whole_load() {
    let result = normalize(
        raw(
            &["date", "parent"],
            &[&["2025-09-01", "Jerome"], &["pas une date", "Sanou"]],
        ),
        &CalendarConfig::default(),
    );
    match result {
        Err(LoadError::InvalidDate { row, value }) => {
            assert_eq!(row, 2);
            assert_eq!(value, "pas une date");
        }
        other => panic!("expected InvalidDate, got {other:?}"),
    }
}

#[test]
fn empty_date_cell_is_fatal() {
    let result = normalize(
        raw(&["date", "parent"], &[&["", "Jerome"]]),
        &CalendarConfig::default(),
    );
    assert!(matches!(result, Err(LoadError::InvalidDate { row: 1, .. })));
}

#[test]
fn missing_date_column_is_fatal() {
    let result = normalize(
        raw(&["jour", "parent"], &[&["lundi", "Jerome"]]),
        &CalendarConfig::default(),
    );
    assert!(matches!(result, Err(LoadError::MissingColumn("date"))));
}

#[test]
fn header_only_source_is_an_empty_table_error() {
    let result = normalize(raw(&["date", "parent"], &[]), &CalendarConfig::default());
    assert!(matches!(result, Err(LoadError::EmptyTable)));
}

#[test]
fn accepts_several_date_spellings() {
    let table = normalize(
        raw(
            &["date"],
            &[
                &["2025-09-01"],
                &["02/09/2025"],
                &["2025-09-03 00:00:00"],
                &["2025-09-04T00:00:00"],
                &["45905"],
            ],
        ),
        &CalendarConfig::default(),
    )
    .unwrap();
    assert_eq!(
        table.dates().unwrap(),
        vec![
            d(2025, 9, 1),
            d(2025, 9, 2),
            d(2025, 9, 3),
            d(2025, 9, 4),
            d(2025, 9, 5)
        ]
    );
}

#[test]
fn identifier_and_year_columns_are_dropped_and_columns_reordered() {
    let table = normalize(
        raw(
            &[
                "Observations",
                "date",
                "jour",
                "annee",
                "parent",
                "mois",
                "nom_ferie",
                "Vacances_scolaires",
                "jour_num",
            ],
            &[&[
                "1",
                "2025-09-01",
                "lundi",
                "2025",
                "Jerome",
                "septembre",
                "",
                "",
                "1",
            ]],
        ),
        &CalendarConfig::default(),
    )
    .unwrap();

    assert_eq!(
        table.columns(),
        &[
            ColumnRole::Date,
            ColumnRole::Weekday,
            ColumnRole::Day,
            ColumnRole::Month,
            ColumnRole::Parent,
            ColumnRole::Holiday,
            ColumnRole::Vacation,
        ]
    );
}

#[test]
fn column_cleanup_can_be_disabled() {
    let mut config = CalendarConfig::default();
    config.normalize.drop_identifier_column = false;
    config.normalize.reorder_columns = false;

    let table = normalize(
        raw(
            &["date", "jour", "parent", "mois", "jour_num"],
            &[&["2025-09-01", "lundi", "Jerome", "septembre", "1"]],
        ),
        &config,
    )
    .unwrap();

    assert_eq!(
        table.columns(),
        &[
            ColumnRole::Date,
            ColumnRole::Weekday,
            ColumnRole::Parent,
            ColumnRole::Month,
            ColumnRole::Day,
        ]
    );
}

#[test]
fn weekday_is_derived_when_the_source_has_none() {
    let table = normalize(
        raw(&["date", "parent"], &[&["2025-09-05", "Jerome"]]),
        &CalendarConfig::default(),
    )
    .unwrap();

    assert_eq!(table.columns(), &[ColumnRole::Date, ColumnRole::Weekday, ColumnRole::Parent]);
    let row = table.row(0).unwrap();
    assert_eq!(row.weekday_name, "vendredi");
    assert_eq!(row.month_label, "septembre");
}

#[test]
fn missing_optional_columns_leave_fields_absent() {
    let table = normalize(
        raw(&["date", "jour"], &[&["2025-09-01", "lundi"]]),
        &CalendarConfig::default(),
    )
    .unwrap();
    let row = table.row(0).unwrap();
    assert_eq!(row.assigned_parent, None);
    assert_eq!(row.holiday_name, None);
    assert_eq!(row.school_vacation_label, None);
}

#[test]
fn reorder_places_day_after_weekday_and_parent_after_month() {
    let mut columns = vec![
        ColumnRole::Parent,
        ColumnRole::Date,
        ColumnRole::Month,
        ColumnRole::Weekday,
        ColumnRole::Day,
    ];
    reorder_columns(&mut columns);
    assert_eq!(
        columns,
        vec![
            ColumnRole::Date,
            ColumnRole::Weekday,
            ColumnRole::Day,
            ColumnRole::Month,
            ColumnRole::Parent,
        ]
    );
}
