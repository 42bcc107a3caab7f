use std::path::Path;
use timetable_viewer::client::GenerationClient;
use timetable_viewer::config::ViewerConfig;
use timetable_viewer::display::{print_schedule, render};
use timetable_viewer::form::{to_csv, write_artifact, CSV_FILE_NAME};
use timetable_viewer::parser::{load_grid, load_request};
use timetable_viewer::schedule::{AssignmentGrid, ScheduleRequest};
use timetable_viewer::summary::summarize;
use timetable_viewer::web;

const USAGE: &str = "Usage:
  timetable-viewer web [port]
  timetable-viewer render <request.json> <schedule.json> [out.csv]
  timetable-viewer generate <request.json> [out.csv]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("web") => {
            let config = ViewerConfig::from_env(args.get(2).map(String::as_str));
            println!("Starting web server on {}:{}...", config.bind_addr, config.port);
            println!("Access the site at http://localhost:{}", config.port);
            web::start_server(config).await?;
        }
        Some("render") if args.len() >= 4 => {
            let request = load_request(&args[2])?;
            let grid = load_grid(&args[3])?;
            report(&request, &grid, args.get(4).map(String::as_str))?;
        }
        Some("generate") if args.len() >= 3 => {
            let request = load_request(&args[2])?;
            if request.people.is_empty() {
                return Err("Register at least one student".into());
            }
            let config = ViewerConfig::from_env(None);
            let client = GenerationClient::new(&config)?;
            println!("Requesting timetable from {}...", client.url());
            let grid = client.generate(&request).await?;
            report(&request, &grid, args.get(3).map(String::as_str))?;
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

// Prints the timetable and summary, then writes the CSV
fn report(
    request: &ScheduleRequest,
    grid: &AssignmentGrid,
    csv_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let slots = &request.calendar.slots_per_day;
    let table = render(grid, slots);
    print_schedule(&table, &summarize(grid));

    let csv_path = csv_path.unwrap_or(CSV_FILE_NAME);
    write_artifact(Path::new(csv_path), &to_csv(grid, slots)?)?;
    println!("\nTimetable saved to {}", csv_path);
    Ok(())
}
