// Entry point and high-level CLI flow.
//
// Without a subcommand the binary runs an interactive menu:
// - Option [1] loads and normalizes the CSV, printing diagnostics.
// - Option [2] asks for a selection and prints the yearly series.
// - Option [3] lists the region and city options.
// Subcommands run a single step and exit.
use clap::{Parser, Subcommand};
use incident_timeline::output::{self, QueryView};
use incident_timeline::session::{LoadSummary, Session};
use incident_timeline::util::format_int;
use incident_timeline::{query, Dataset, Selection};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const YEARLY_FILE: &str = "yearly_counts.csv";
const VIEW_FILE: &str = "query.json";

#[derive(Parser)]
#[command(name = "incident_timeline", about = "Yearly incident counts by region and city")]
struct Cli {
    /// Source CSV (Latin-1 encoded)
    #[arg(long, default_value = "data/terrorism.csv")]
    data: PathBuf,
    /// Directory for exported files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the distinct regions
    Regions,
    /// List the distinct cities
    Cities,
    /// Count incidents per year for a selection
    Query {
        /// Region to include (repeatable)
        #[arg(long = "region")]
        regions: Vec<String>,
        /// City to include (repeatable)
        #[arg(long = "city")]
        cities: Vec<String>,
        /// First year, inclusive. Defaults to the start of the initial window
        #[arg(long)]
        from: Option<i32>,
        /// Last year, inclusive. Defaults to the latest year, or --from if later
        #[arg(long)]
        to: Option<i32>,
        /// Write the yearly series and the full view to --out-dir
        #[arg(long)]
        export: bool,
    },
}

/// Read one trimmed line. `None` once the input is closed or unreadable.
fn read_trimmed_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut buf = String::new();
    match reader.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn prompt(label: &str) -> Option<String> {
    print!("{label}");
    let _ = io::stdout().flush();
    read_trimmed_line(&mut io::stdin().lock())
}

/// Ask whether to go back to the menu after a query. Closed input counts
/// as `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(resp) = prompt("Back to menu (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `"2010-2016"` or a single year.
fn parse_year_range(s: &str) -> Option<(i32, i32)> {
    match s.split_once('-') {
        Some((a, b)) => Some((a.trim().parse().ok()?, b.trim().parse().ok()?)),
        None => {
            let y = s.trim().parse().ok()?;
            Some((y, y))
        }
    }
}

fn print_load_summary(summary: &LoadSummary) {
    let r = &summary.report;
    println!(
        "Processing dataset... ({} rows read, {} kept)",
        format_int(r.total_rows),
        format_int(r.kept_rows)
    );
    println!(
        "Note: {} rows dropped for unknown month, {} unparseable, {} malformed.",
        format_int(r.unknown_month_rows),
        format_int(r.unparseable_rows),
        format_int(summary.malformed_rows)
    );
    if r.rejected_dates > 0 {
        println!("Note: {} rows rejected for impossible dates.", format_int(r.rejected_dates));
    }
    if r.imputed_days > 0 {
        println!("Info: Imputed day 15 for {} rows.", format_int(r.imputed_days));
    }
    println!();
}

fn ensure_loaded(session: &Session) -> Option<&Dataset> {
    match session.load() {
        Ok(Some(summary)) => print_load_summary(&summary),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Failed to load {}: {e}\n", session.data_path().display());
            return None;
        }
    }
    session.dataset()
}

fn print_options(title: &str, options: &[String]) {
    println!("{title} ({}):", format_int(options.len()));
    for o in options {
        println!("  {o}");
    }
    println!();
}

fn run_query(dataset: &Dataset, selection: &Selection, out_dir: Option<&Path>) -> bool {
    let result = match query(dataset, selection) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}\n");
            return false;
        }
    };

    println!("Yearly Attacks ({}-{})\n", selection.year_min, selection.year_max);
    let bars = output::year_bar_rows(&result.yearly);
    output::preview_table_rows(&bars, bars.len());
    println!("Matching incidents: {}\n", format_int(result.matches.len()));
    output::preview_table_rows(&output::incident_rows(&result.matches), 5);

    let Some(dir) = out_dir else {
        return true;
    };
    let yearly_path = dir.join(YEARLY_FILE);
    if let Err(e) = output::write_csv(&yearly_path, &result.yearly) {
        eprintln!("Write error: {e}");
        return false;
    }
    let view_path = dir.join(VIEW_FILE);
    if let Err(e) = output::write_json(&view_path, &QueryView::new(selection, &result)) {
        eprintln!("Write error: {e}");
        return false;
    }
    println!(
        "(Exported to {} and {})\n",
        yearly_path.display(),
        view_path.display()
    );
    true
}

/// Fill in missing `--from`/`--to` from the initial selection without
/// producing an inverted range.
fn resolve_years(initial: &Selection, from: Option<i32>, to: Option<i32>) -> (i32, i32) {
    match (from, to) {
        (Some(from), Some(to)) => (from, to),
        (Some(from), None) => (from, from.max(initial.year_max)),
        (None, Some(to)) => (to.min(initial.year_min), to),
        (None, None) => (initial.year_min, initial.year_max),
    }
}

/// Returns `false` when the input closed mid-way.
fn handle_interactive_query(dataset: &Dataset, out_dir: &Path) -> bool {
    let initial = Selection::initial(dataset);
    let Some(regions) = prompt("Regions (comma-separated): ") else {
        return false;
    };
    let Some(cities) = prompt("Cities (comma-separated): ") else {
        return false;
    };
    let Some(years) = prompt(&format!(
        "Years [{}-{}]: ",
        initial.year_min, initial.year_max
    )) else {
        return false;
    };
    let (from, to) = if years.is_empty() {
        (initial.year_min, initial.year_max)
    } else if let Some(range) = parse_year_range(&years) {
        range
    } else {
        println!("Invalid year range. Use e.g. 2010-2016.\n");
        return true;
    };

    let mut selection = Selection::new(split_list(&regions), split_list(&cities), from, to);
    if let Some(bounds) = dataset.year_bounds() {
        selection = selection.clamp_years(bounds);
    }
    println!();
    run_query(dataset, &selection, Some(out_dir));
    true
}

fn interactive(session: &Session, out_dir: &Path) {
    loop {
        println!("Select an option:");
        println!("[1] Load the file");
        println!("[2] Yearly counts for a selection");
        println!("[3] List regions and cities\n");
        let Some(choice) = prompt("Enter choice: ") else {
            println!("\nInput closed. Exiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => {
                if session.dataset().is_some() {
                    println!("Dataset already loaded.\n");
                } else {
                    ensure_loaded(session);
                }
            }
            "2" => {
                println!();
                let Some(dataset) = session.dataset() else {
                    println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
                    continue;
                };
                if !handle_interactive_query(dataset, out_dir) || !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                let Some(dataset) = session.dataset() else {
                    println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
                    continue;
                };
                print_options("Regions", dataset.region_options());
                print_options("Cities", dataset.city_options());
            }
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let session = Session::new(cli.data);

    let Some(command) = cli.command else {
        interactive(&session, &cli.out_dir);
        return ExitCode::SUCCESS;
    };

    let Some(dataset) = ensure_loaded(&session) else {
        return ExitCode::FAILURE;
    };

    let ok = match command {
        Commands::Regions => {
            print_options("Regions", dataset.region_options());
            true
        }
        Commands::Cities => {
            print_options("Cities", dataset.city_options());
            true
        }
        Commands::Query {
            regions,
            cities,
            from,
            to,
            export,
        } => {
            let (from, to) = resolve_years(&Selection::initial(dataset), from, to);
            let selection = Selection::new(regions, cities, from, to);
            run_query(dataset, &selection, export.then_some(cli.out_dir.as_path()))
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
