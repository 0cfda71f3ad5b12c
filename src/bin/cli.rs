use chrono::NaiveDate;
use custody_calendar::{
    CalendarConfig, CustodyTable, MonthKey, RowColorizer, StyledTable, TableCache, TableSource,
    colorize::legend, render::render_text_table,
};
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const SOURCE_ENV: &str = "CUSTODY_CALENDAR_SOURCE";

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  months                             List available months\n  show [YYYY-MM]                     Show one month (default: current or latest)\n  today [YYYY-MM-DD]                 Show the rows around today (or the given date)\n  legend                             Show the color legend\n  load <path|url>                    Load a calendar (csv, xlsx, ods)\n  quit|exit                          Exit"
    );
}

fn print_months(table: &CustodyTable, config: &CalendarConfig) {
    match table.months() {
        Ok(months) => {
            println!("Available months:");
            for month in months {
                println!("  {}  {}", month.code(), month.label(config.language));
            }
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn print_table(table: &CustodyTable, config: &CalendarConfig, today: NaiveDate) {
    let colorizer = RowColorizer::anchored(config, today);
    match StyledTable::build(table, &colorizer, &config.palette, config.language) {
        Ok(styled) => {
            if styled.is_empty() {
                println!("(no rows)");
            }
            println!("{}", render_text_table(&styled));
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn print_legend(config: &CalendarConfig) {
    for entry in legend(config) {
        println!("  {:<20} {}", entry.label, entry.style.to_css());
    }
}

fn load(cache: &TableCache, source: &TableSource) -> Option<Arc<CustodyTable>> {
    match cache.get_or_load(source) {
        Ok(table) => {
            println!("Loaded {} rows from {}", table.height(), source);
            Some(table)
        }
        Err(e) => {
            println!("Load error: {}", e);
            None
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match CalendarConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let cache = TableCache::new(config);
    let config = cache.config();

    let initial = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(SOURCE_ENV).ok())
        .map(|s| TableSource::parse(&s));

    println!("Custody Calendar (CLI) - type 'help' for commands\n");
    let mut table = initial.as_ref().and_then(|source| load(&cache, source));
    let mut today = chrono::Local::now().date_naive();

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "legend" => print_legend(config),
            "load" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    println!("Usage: load <path|url>");
                    continue;
                }
                let source = TableSource::parse(&rest.join(" "));
                if let Some(loaded) = load(&cache, &source) {
                    table = Some(loaded);
                }
            }
            "months" | "show" | "today" => {
                let Some(current) = table.as_ref() else {
                    println!("No calendar loaded. Use 'load <path|url>'.");
                    continue;
                };
                match cmd {
                    "months" => print_months(current, config),
                    "show" => {
                        let month = match parts.next() {
                            Some(code) => match code.parse::<MonthKey>() {
                                Ok(month) => Some(month),
                                Err(e) => {
                                    println!("Error: {}", e);
                                    continue;
                                }
                            },
                            None => current.default_month(today).ok().flatten(),
                        };
                        let Some(month) = month else {
                            println!("(no rows)");
                            continue;
                        };
                        println!("{}", month.label(config.language));
                        match current.filter_month(month) {
                            Ok(filtered) => print_table(&filtered, config, today),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => {
                        if let Some(date_s) = parts.next() {
                            match NaiveDate::parse_from_str(date_s, "%Y-%m-%d") {
                                Ok(d) => today = d,
                                Err(_) => {
                                    println!("Invalid date (YYYY-MM-DD)");
                                    continue;
                                }
                            }
                        }
                        let window = config.window;
                        match current.window_around(today, window.before, window.after) {
                            Ok(slice) => print_table(&slice, config, today),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
