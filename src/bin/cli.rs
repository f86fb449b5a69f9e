use chrono::{Duration, NaiveDate};
use clap::Parser;
use deadline_planner::{
    DateFormat, Schedule, ScheduleConfig, load_holiday_feed, load_holiday_feed_or_empty,
    load_plan_from_csv, load_plan_from_json, parse_plan_date, save_plan_to_csv,
    save_plan_to_json,
};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cli", about = "Plan sequential tasks backward from a deadline")]
struct Args {
    /// iCalendar holiday feed to load at startup
    #[arg(long)]
    holidays: Option<PathBuf>,
    /// Plan file (.json or .csv) to import at startup
    #[arg(long)]
    plan: Option<PathBuf>,
    /// Schedule config JSON
    #[arg(long)]
    config: Option<PathBuf>,
}

fn format_cell(av: &AnyValue, format: DateFormat) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Date(days) => NaiveDate::default()
            .checked_add_signed(Duration::days(*days as i64))
            .map(|date| format.format(date))
            .unwrap_or_default(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame, format: DateFormat) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| {
                col.get(row_idx)
                    .map(|av| format_cell(&av, format))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            let pad = widths[ci].saturating_sub(value.chars().count());
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the current plan\n  deadline <YYYY-MM-DD>              Set the deadline\n  deadline clear                     Remove the deadline\n  add <duration> <name...>           Append a task (duration in working days)\n  format <token>                     Set date format (see 'formats')\n  formats                            List available date formats\n  holidays load <path>               Load an iCalendar holiday feed\n  holidays on|off                    Exclude holidays from working days\n  holidays show                      List loaded holidays\n  weekends on|off                    Skip weekends (on by default)\n  summary                            Show plan summary\n  save <json|csv> <path>             Export the plan\n  load <json|csv> <path>             Import a plan and recompute it\n  quit|exit                          Exit"
    );
}

fn print_formats() {
    println!("Available date formats:");
    for (token, sample) in DateFormat::variants() {
        println!("  {:<14} {}", token, sample);
    }
}

fn print_plan(schedule: &Schedule) {
    let format = schedule.date_format();
    let Some(deadline) = schedule.deadline() else {
        println!("Please set a deadline first.");
        return;
    };
    println!("Deadline: {}", format.format(deadline));
    if schedule.tasks().is_empty() {
        println!("No tasks added yet.");
        return;
    }
    match schedule.dataframe() {
        Ok(df) => println!("{}", render_df_as_text_table(&df, format)),
        Err(e) => println!("Error rendering plan: {}", e),
    }
}

fn print_holidays(schedule: &Schedule) {
    if schedule.holidays().is_empty() {
        println!("No holidays loaded.");
        return;
    }
    let format = schedule.date_format();
    let excluded = if schedule.config().exclude_holidays {
        "excluded"
    } else {
        "not excluded"
    };
    println!("{} holidays loaded ({}):", schedule.holidays().len(), excluded);
    for holiday in schedule.holidays() {
        println!("  {}  {}", format.format(holiday.date), holiday.label);
    }
}

fn parse_switch(value: Option<&str>) -> Option<bool> {
    match value {
        Some("on") => Some(true),
        Some("off") => Some(false),
        _ => None,
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut schedule = match args.config.as_ref() {
        Some(path) => match ScheduleConfig::from_json_file(path).map(Schedule::with_config) {
            Ok(Ok(schedule)) => schedule,
            Ok(Err(e)) => {
                eprintln!("Config {} cannot be scheduled: {}", path.display(), e);
                Schedule::new()
            }
            Err(e) => {
                eprintln!("Unable to read config {}: {}", path.display(), e);
                Schedule::new()
            }
        },
        None => Schedule::new(),
    };

    if let Some(path) = args.holidays.as_ref() {
        let holidays = load_holiday_feed_or_empty(path);
        if let Err(e) = schedule.load_holidays(holidays) {
            eprintln!("Unable to apply holidays: {}", e);
        }
    }

    if let Some(path) = args.plan.as_ref() {
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let res = if is_csv {
            load_plan_from_csv(&mut schedule, path)
        } else {
            load_plan_from_json(&mut schedule, path)
        };
        if let Err(e) = res {
            eprintln!("Unable to load plan {}: {}", path.display(), e);
        }
    }

    println!("Deadline Planner (CLI) - type 'help' for commands\n");
    print_plan(&schedule);

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
            "show" => print_plan(&schedule),
            "formats" => print_formats(),
            "summary" => match schedule.refresh() {
                Ok(summary) => println!("Plan ({})", summary.to_cli_summary()),
                Err(e) => println!("Error: {}", e),
            },
            "deadline" => match parts.next() {
                Some("clear") => match schedule.clear_deadline() {
                    Ok(_) => println!("Deadline cleared."),
                    Err(e) => println!("Error: {}", e),
                },
                Some(date_s) => {
                    let date = match parse_plan_date(date_s) {
                        Ok(d) => d,
                        Err(_) => {
                            println!("Please pick a valid date (YYYY-MM-DD).");
                            continue;
                        }
                    };
                    match schedule.set_deadline(date) {
                        Ok(_) => print_plan(&schedule),
                        Err(e) => println!("Error: {}", e),
                    }
                }
                None => println!("Usage: deadline <YYYY-MM-DD>|clear"),
            },
            "add" => {
                let dur_s = parts.next();
                let name = parts.collect::<Vec<_>>().join(" ");
                let duration_days = match dur_s.map(str::parse::<i64>) {
                    Some(Ok(v)) if !name.is_empty() => v,
                    _ => {
                        println!("Enter valid task name & duration.");
                        println!("Usage: add <duration> <name...>");
                        continue;
                    }
                };
                match schedule.add_task(&name, duration_days) {
                    Ok(_) => {
                        println!("Task added.");
                        print_plan(&schedule);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "format" => {
                let token = parts.collect::<Vec<_>>().join(" ");
                match token.parse::<DateFormat>() {
                    Ok(format) => {
                        schedule.set_date_format(format);
                        print_plan(&schedule);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "holidays" => match parts.next() {
                Some("load") => match parts.next() {
                    Some(path) => match load_holiday_feed(path) {
                        Ok(holidays) => {
                            let count = holidays.len();
                            match schedule.load_holidays(holidays) {
                                Ok(_) => println!("Loaded {} holidays from {}", count, path),
                                Err(e) => println!("Error: {}", e),
                            }
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    None => println!("Usage: holidays load <path>"),
                },
                Some("show") => print_holidays(&schedule),
                other => match parse_switch(other) {
                    Some(exclude) => match schedule.set_exclude_holidays(exclude) {
                        Ok(_) => {
                            println!(
                                "Holiday exclusion {}.",
                                if exclude { "enabled" } else { "disabled" }
                            );
                            print_plan(&schedule);
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    None => println!("Usage: holidays load <path>|on|off|show"),
                },
            },
            "weekends" => match parse_switch(parts.next()) {
                Some(skip) => match schedule.set_skip_weekends(skip) {
                    Ok(_) => print_plan(&schedule),
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: weekends on|off"),
            },
            "save" | "load" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some(fmt @ ("json" | "csv")), Some(path)) => {
                        if cmd == "save" {
                            let res = if fmt == "json" {
                                save_plan_to_json(&schedule, path)
                            } else {
                                save_plan_to_csv(&schedule, path)
                            };
                            match res {
                                Ok(_) => println!("Plan saved to {}", path),
                                Err(e) => println!("Error saving plan: {}", e),
                            }
                        } else {
                            let res = if fmt == "json" {
                                load_plan_from_json(&mut schedule, path)
                            } else {
                                load_plan_from_csv(&mut schedule, path)
                            };
                            match res {
                                Ok(_) => {
                                    println!("Plan loaded from {}", path);
                                    print_plan(&schedule);
                                }
                                Err(e) => println!("Error loading plan: {}", e),
                            }
                        }
                    }
                    _ => println!("Usage: {} <json|csv> <path>", cmd),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
