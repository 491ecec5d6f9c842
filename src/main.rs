use std::process::ExitCode;

use anyhow::{Context, Result};
use rusty_merge::config::Config;
use rusty_merge::data::filter::{contains_any, equals, year_equals, TableView};
use rusty_merge::data::{aggregate, transform};
use rusty_merge::report::{render_record, render_view};
use rusty_merge::series::Series;
use rusty_merge::{build_index, extract_archive, merge_fragments, MergedTable};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Process stopped: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = Config::load()?;
    let options = config.load_options();

    // ---- Extraction ----
    if config.archive.exists() {
        extract_archive(&config.archive, &config.data_dir)
            .with_context(|| format!("extracting {}", config.archive.display()))?;
        println!("Extraction finished\n");
    } else {
        log::warn!(
            "Archive {} not found, reading {} as is",
            config.archive.display(),
            config.data_dir.display()
        );
    }

    // ---- Column merge ----
    let merged = merge_fragments(&config.data_dir, &options)?;
    println!("Merging the fragments took {:.4} seconds.\n", merged.elapsed);
    let table = merged.value;
    println!("{}\n", render_view(&TableView::new(&table).head(config.head_rows))?);

    // ---- Record index ----
    let index = build_index::<Series>(&config.data_dir, &options)?;
    println!("Building the index took {:.4} seconds.\n", index.elapsed);
    match index.value.get(config.sample_key) {
        Some(record) => {
            println!("Record for key {}:\n", config.sample_key);
            println!("{}\n", render_record(config.sample_key, record)?);
        }
        None => println!("Key {} is not in the index.\n", config.sample_key),
    }

    airing(&table, &config)?;
    filters(&table, &config)?;
    charts(&table);
    Ok(())
}

/// Longest running series and poster URLs
fn airing(table: &MergedTable, config: &Config) -> Result<()> {
    let longest = transform::longest_running(table, "first_air_date", "last_air_date", 10);
    println!("The 10 series with the longest airing span are:\n");
    let rows = longest.iter().map(|span| span.row).collect();
    let view = TableView::from_rows(table, rows).select(&["name", "first_air_date", "last_air_date"]);
    println!("{}", render_view(&view)?);
    for span in &longest {
        println!("  {}: {} days", span.key, span.days);
    }

    let urls = transform::poster_urls(table, "name", "homepage", "poster_path");
    println!("\nThe first {} names with their poster URL are:", config.head_rows);
    for entry in urls.iter().take(config.head_rows) {
        println!("{}: {}", entry.name, entry.url);
    }
    Ok(())
}

/// Language, genre and status filters
fn filters(table: &MergedTable, config: &Config) -> Result<()> {
    let mask = equals(table, "original_language", "en")
        .and(&contains_any(table, "overview", &["mystery", "crime"]));
    println!("\nSeries originally in English mentioning mystery or crime:");
    for name in TableView::filtered(table, &mask).to_list("name") {
        println!("{name}");
    }

    let mask = year_equals(table, "first_air_date", 2023)
        .and(&contains_any(table, "status", &["canceled"]));
    println!("\nThe first {} series started in 2023 and canceled:", config.top_n);
    for name in TableView::filtered(table, &mask).head(config.top_n).to_list("original_name") {
        println!("{name}");
    }

    let view = TableView::filtered(table, &contains_any(table, "languages", &["ja"]))
        .select(&["name", "original_name", "networks", "production_companies"])
        .head(config.top_n);
    println!("\nSeries available in Japanese:\n{}", render_view(&view)?);
    Ok(())
}

/// Series behind the descriptive charts
fn charts(table: &MergedTable) {
    println!("\nSeries per start year:");
    for (year, count) in aggregate::count_by_year(table, "first_air_date") {
        println!("  {year}: {count}");
    }

    println!("\nSeries per decade and type (since 1940):");
    for ((decade, kind), count) in aggregate::count_by_decade(table, "first_air_date", "type", 1940) {
        println!("  {decade}s {kind}: {count}");
    }

    println!("\nShare of series per genre:");
    for share in aggregate::genre_shares(table, "genres", ", ", 1.0) {
        println!("  {}: {:.1}%", share.label, share.percent);
    }
}
