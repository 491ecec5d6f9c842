//! Write a small, deterministic TMDB-like fragment bundle to `./data/TMDB.zip`
//! (or the path given as first argument) so the demo can run offline.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.below(100) < percent
    }
}

const WORDS: &[&str] = &[
    "Shadow", "River", "Crown", "Night", "Harbor", "Echo", "Garden", "Signal", "Empire", "Winter",
];
const LANGUAGES: &[&str] = &["en", "en", "en", "es", "fr", "ja", "ko", "de"];
const STATUSES: &[&str] = &["Returning Series", "Ended", "Canceled", "In Production"];
const KINDS: &[&str] = &["Scripted", "Reality", "Documentary", "Miniseries", "Talk Show"];
const GENRES: &[&str] = &[
    "Drama", "Comedy", "Crime", "Mystery", "Animation", "Documentary", "Reality", "Western",
];
const THEMES: &[&str] = &[
    "a mystery in a small town",
    "a crime family on the rise",
    "friends sharing a flat",
    "life in the wild",
    "a kitchen under pressure",
];
const NETWORKS: &[&str] = &["Netflix", "HBO", "BBC One", "NHK", "Fuji TV", "ABC"];

/// One CSV fragment, built in memory
struct Fragment {
    name: &'static str,
    writer: csv::Writer<Vec<u8>>,
}

impl Fragment {
    fn new(name: &'static str, header: &[&str]) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(header)?;
        Ok(Fragment { name, writer })
    }
}

fn main() -> Result<()> {
    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./data/TMDB.zip"));
    let mut rng = SimpleRng::new(42);

    let mut info = Fragment::new(
        "TMDB_info.csv",
        &[
            "id", "name", "original_name", "number_of_seasons", "number_of_episodes", "status",
            "type", "first_air_date", "last_air_date", "homepage", "poster_path",
        ],
    )?;
    let mut overview = Fragment::new(
        "TMDB_overview.csv",
        &["id", "overview", "original_language", "languages"],
    )?;
    let mut distribution = Fragment::new(
        "TMDB_distribution.csv",
        &["id", "genres", "networks", "production_companies"],
    )?;

    let mut ids: Vec<i64> = (0..300).map(|i| 60000 + i * 7).collect();
    ids.push(60140);
    ids.sort_unstable();
    ids.dedup();

    for &id in &ids {
        let name = format!("{} {}", rng.pick(WORDS), rng.pick(WORDS));
        let language = rng.pick(LANGUAGES);
        let start_year = 1945 + rng.below(79) as i64;
        let end_year = (start_year + rng.below(12) as i64).min(2024);
        let first = format!("{start_year}-{:02}-{:02}", 1 + rng.below(12), 1 + rng.below(28));
        let last = format!("{end_year}-{:02}-{:02}", 1 + rng.below(12), 1 + rng.below(28));
        let seasons = 1 + rng.below(8);
        let homepage = if rng.chance(70) {
            format!("https://example.com/{id}/")
        } else {
            String::new()
        };
        let poster = if rng.chance(85) {
            format!("poster_{id}.jpg")
        } else {
            String::new()
        };
        info.writer.write_record([
            id.to_string(),
            name.clone(),
            if language == "en" { name.clone() } else { format!("{name} ({language})") },
            seasons.to_string(),
            (seasons * (6 + rng.below(10))).to_string(),
            rng.pick(STATUSES).to_string(),
            rng.pick(KINDS).to_string(),
            first,
            if rng.chance(90) { last } else { String::new() },
            homepage,
            poster,
        ])?;

        let languages = if rng.chance(20) {
            format!("{language}, ja")
        } else {
            language.to_string()
        };
        overview.writer.write_record([
            id.to_string(),
            format!("The story of {}.", rng.pick(THEMES)),
            language.to_string(),
            languages,
        ])?;

        let mut genres = vec![rng.pick(GENRES)];
        if rng.chance(50) {
            let second = rng.pick(GENRES);
            if second != genres[0] {
                genres.push(second);
            }
        }
        distribution.writer.write_record([
            id.to_string(),
            genres.join(", "),
            rng.pick(NETWORKS).to_string(),
            format!("{} Studios", rng.pick(WORDS)),
        ])?;
    }

    if let Some(dir) = output.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let file = File::create(&output).with_context(|| format!("creating {}", output.display()))?;
    let mut zip = zip::ZipWriter::new(file);
    for fragment in [info, overview, distribution] {
        let bytes = fragment
            .writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("flushing {}: {}", fragment.name, e.error()))?;
        zip.start_file(fragment.name, SimpleFileOptions::default())?;
        zip.write_all(&bytes)?;
    }
    zip.finish()?;

    println!("Wrote {} series in 3 fragments to {}", ids.len(), output.display());
    Ok(())
}
