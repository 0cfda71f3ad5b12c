use chrono::NaiveDate;
use custody_calendar::source::file::read_csv_bytes;
use custody_calendar::source::SourceFormat;
use custody_calendar::{
    CalendarConfig, ColumnRole, LoadError, TableCache, TableSource, load_table, read_raw_table,
};
use std::io::Write;
use tempfile::NamedTempFile;

const CALENDAR_CSV: &str = "\
Observations,date,jour,annee,parent,mois,nom_ferie,Vacances_scolaires,jour_num
1,2025-09-01,lundi,2025,Jerome,septembre,,,1
2,2025-09-04,jeudi,2025,Sanou,septembre,None,nan,4
3,2025-09-05,vendredi,2025,Jerome,septembre,,,5
4,2025-11-11,mardi,2025,Sanou,novembre,Armistice,,11
5,2025-12-31,mercredi,2025,Jerome,décembre,,Vacances de Noël,31
6,2026-01-01,jeudi,2026,Jerome,janvier,Jour de l'an,Vacances de Noël,1
";

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_and_normalizes_a_csv_file() {
    let file = write_csv(CALENDAR_CSV);
    let source = TableSource::from(file.path());
    let table = load_table(&source, &CalendarConfig::default()).unwrap();

    assert_eq!(table.height(), 6);
    assert_eq!(table.dates().unwrap().first(), Some(&d(2025, 9, 1)));
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

    let thursday = table.row(1).unwrap();
    assert_eq!(thursday.assigned_parent.as_deref(), Some("Sanou"));
    assert_eq!(thursday.holiday_name, None);
    assert_eq!(thursday.school_vacation_label, None);

    let new_year = table.row(5).unwrap();
    assert_eq!(new_year.holiday_name.as_deref(), Some("Jour de l'an"));
    assert_eq!(new_year.school_vacation_label.as_deref(), Some("Vacances de Noël"));
}

#[test]
fn semicolon_exports_are_detected() {
    let raw = read_csv_bytes(
        "date;jour;parent\n2025-09-01;lundi;Jerome\n2025-09-02;mardi;Sanou\n".as_bytes(),
    )
    .unwrap();
    assert_eq!(raw.headers, vec!["date", "jour", "parent"]);
    assert_eq!(raw.rows.len(), 2);
    assert_eq!(raw.cell(1, 2), "Sanou");
}

#[test]
fn byte_order_mark_and_blank_lines_are_ignored() {
    let raw = read_csv_bytes(
        "\u{feff}date,parent\n2025-09-01,Jerome\n,\n2025-09-02,Sanou\n".as_bytes(),
    )
    .unwrap();
    assert_eq!(raw.headers[0], "date");
    assert_eq!(raw.rows.len(), 2);
}

#[test]
fn invalid_date_in_file_fails_the_load() {
    let file = write_csv("date,parent\n2025-09-01,Jerome\n2025-13-45,Sanou\n");
    let err = load_table(&TableSource::from(file.path()), &CalendarConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::InvalidDate { row: 2, .. }));
    assert!(err.to_string().contains("2025-13-45"));
}

#[test]
fn missing_file_is_an_io_error() {
    let source = TableSource::parse("/definitely/not/here/calendar.csv");
    let err = read_raw_table(&source).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn sources_are_classified_by_location_and_extension() {
    assert_eq!(
        TableSource::parse("https://example.org/garde.xlsx?download=1"),
        TableSource::Url("https://example.org/garde.xlsx?download=1".into())
    );
    assert_eq!(
        TableSource::parse("https://example.org/garde.xlsx?download=1").format(),
        SourceFormat::Spreadsheet
    );
    assert_eq!(TableSource::parse("data/garde.CSV").format(), SourceFormat::Csv);
    assert_eq!(TableSource::parse("garde.ods").format(), SourceFormat::Spreadsheet);
    assert_eq!(TableSource::parse("garde").format(), SourceFormat::Csv);
}

#[test]
fn cache_loads_once_and_serves_the_same_table() {
    let file = write_csv(CALENDAR_CSV);
    let source = TableSource::from(file.path());
    let cache = TableCache::new(CalendarConfig::default());
    assert!(cache.is_empty());

    let first = cache.get_or_load(&source).unwrap();
    // The source may change on disk; the cached table is kept.
    std::fs::write(file.path(), "date\n2030-01-01\n").unwrap();
    let second = cache.get_or_load(&source).unwrap();

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(second.height(), 6);
    assert_eq!(cache.len(), 1);
    assert!(cache.contains(&source));
}

#[test]
fn cache_does_not_keep_failed_loads() {
    let file = write_csv("date\nnot-a-date\n");
    let source = TableSource::from(file.path());
    let cache = TableCache::new(CalendarConfig::default());

    assert!(cache.get_or_load(&source).is_err());
    assert!(!cache.contains(&source));

    std::fs::write(file.path(), "date\n2025-09-01\n").unwrap();
    let table = cache.get_or_load(&source).unwrap();
    assert_eq!(table.height(), 1);
}

#[test]
fn loaded_table_exposes_typed_dataframe_columns() {
    use polars::prelude::DataType;

    let file = write_csv(CALENDAR_CSV);
    let table = load_table(&TableSource::from(file.path()), &CalendarConfig::default()).unwrap();
    let df = table.dataframe();

    assert_eq!(df.height(), 6);
    assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    assert_eq!(df.column("day").unwrap().dtype(), &DataType::Int32);
    assert_eq!(df.column("holiday").unwrap().dtype(), &DataType::String);
    assert_eq!(df.column("holiday").unwrap().null_count(), 4);
}
