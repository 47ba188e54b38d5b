use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::records::PlayerRecord;

const FIRST_NAMES: &[&str] = &[
    "Reece", "Levi", "Enzo", "Moises", "Cole", "Nicolas", "Marc", "Malo", "Romeo", "Noni",
    "Christopher", "Pedro", "Tosin", "Benoit", "Wesley", "Mykhailo", "Kiernan", "Axel",
    "Trevoh", "Lesley", "Carney", "Filip", "Jadon", "Tyrique",
];

const LAST_NAMES: &[&str] = &[
    "James", "Colwill", "Fernandez", "Caicedo", "Palmer", "Jackson", "Cucurella", "Gusto",
    "Lavia", "Madueke", "Nkunku", "Neto", "Adarabioyo", "Badiashile", "Fofana", "Mudryk",
    "Dewsbury-Hall", "Disasi", "Chalobah", "Ugochukwu", "Chukwuemeka", "Jorgensen", "Sancho",
    "George",
];

const NATIONALITIES: &[&str] = &[
    "eng ENG", "eng ENG", "eng ENG", "fra FRA", "esp ESP", "arg ARG", "ecu ECU", "bra BRA",
    "por POR", "ukr UKR", "sen SEN", "ned NED", "den DEN", "bel BEL", "wal WAL", "civ CIV",
];

// Weighted toward outfield roles; one keeper in roughly eight players.
const POSITIONS: &[&str] = &[
    "GK", "DF", "DF", "DF", "DF,MF", "MF", "MF", "MF,FW", "FW", "FW,MF", "DF", "MF",
];

const MAX_SEASON_MINUTES: f64 = 38.0 * 90.0;
const FIRST_SEASON_START: i32 = 2019;

/// Deterministic synthetic squad: `players` players over `seasons` seasons.
///
/// Minutes follow a per-player sine-wave form curve with clamped noise, so the
/// same seed always yields the same squad.
pub fn generate(seed: u64, players: usize, seasons: usize) -> Vec<PlayerRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(players * seasons);

    for idx in 0..players {
        let name = player_name(idx);
        let nationality = NATIONALITIES[rng.gen_range(0..NATIONALITIES.len())];
        let position = if idx % 8 == 0 {
            "GK"
        } else {
            POSITIONS[rng.gen_range(1..POSITIONS.len())]
        };
        let debut_age: i64 = rng.gen_range(17..=30);
        let phase: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
        let level: f64 = rng.gen_range(0.35..0.85);

        for season_idx in 0..seasons {
            let wave = (phase + season_idx as f64 * 0.9).sin() * 0.25;
            let noise: f64 = rng.gen_range(-0.12..0.12);
            let share = (level + wave + noise).clamp(0.0, 1.0);
            let minutes = (share * MAX_SEASON_MINUTES).round() as i64;

            let games = if minutes == 0 {
                0
            } else {
                (minutes / 75 + rng.gen_range(0..4)).clamp(1, 38)
            };
            let starts = (minutes / 90).min(games);
            let start_year = FIRST_SEASON_START + season_idx as i32;

            out.push(PlayerRecord {
                season: format!("{}-{}", start_year, start_year + 1),
                player: name.clone(),
                nationality: nationality.to_string(),
                position: position.to_string(),
                age: (debut_age + season_idx as i64).to_string(),
                games: games.to_string(),
                games_starts: starts.to_string(),
                minutes: minutes.to_string(),
                minutes_90s: format!("{:.1}", minutes as f64 / 90.0),
            });
        }
    }

    out
}

fn player_name(idx: usize) -> String {
    let first = FIRST_NAMES[idx % FIRST_NAMES.len()];
    let last = LAST_NAMES[(idx * 7 + idx / LAST_NAMES.len()) % LAST_NAMES.len()];
    let round = idx / FIRST_NAMES.len();
    if round == 0 {
        format!("{first} {last}")
    } else {
        format!("{first} {last} {}", round + 1)
    }
}
