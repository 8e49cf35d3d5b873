use chrono::Utc;
use tracing_subscriber::EnvFilter;

use railbird::config::Config;
use railbird::pipeline;
use railbird::ranking::RankedRace;
use railbird::scoring::ScoreConfig;
use railbird::tracks;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(track) = args.get(1).map(String::as_str) else {
        print_usage();
        std::process::exit(2);
    };
    if tracks::display_name(track).is_none() {
        eprintln!("unknown track slug '{track}'\n");
        print_usage();
        std::process::exit(2);
    }
    let date = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string());

    let config = Config::from_env();
    let score_cfg = ScoreConfig::default();

    match pipeline::run(&config, track, &date, &score_cfg)? {
        Some(races) => print_rankings(track, &date, &races),
        None => println!(
            "No races listed at {} on {date}.",
            tracks::display_name(track).unwrap_or(track)
        ),
    }
    Ok(())
}

fn print_rankings(track: &str, date: &str, races: &[RankedRace]) {
    let name = tracks::display_name(track).unwrap_or(track);
    println!("{name}, {date}");

    let mut complete = 0usize;
    let mut total = 0usize;
    for race in races {
        println!("\nRace {}", race.key.race_number);
        println!(
            "  {:<4} {:<3} {:<24} {:>8}  {}",
            "Rank", "PP", "Horse", "Score", "Last race"
        );
        for (position, entry) in race.entries.iter().enumerate() {
            total += 1;
            let score = match entry.performance_score.value() {
                Some(value) => {
                    complete += 1;
                    format!("{value:.3}")
                }
                None => "--".to_string(),
            };
            let last = if entry.latest_time.is_empty() {
                entry.calculation_status.clone()
            } else {
                format!(
                    "{} {} in {}",
                    entry.latest_distance, entry.latest_surface, entry.latest_time
                )
            };
            println!(
                "  {:<4} {:<3} {:<24} {:>8}  {}",
                position + 1,
                entry.program_number,
                entry.horse_name,
                score,
                last
            );
        }
    }
    println!("\nScored {complete} of {total} entries.");
}

fn print_usage() {
    eprintln!("usage: railbird <track-slug> [YYYY-MM-DD]");
    eprintln!("known tracks:");
    for (slug, name) in tracks::all() {
        eprintln!("  {slug:<18} {name}");
    }
}
