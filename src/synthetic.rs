use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::Dataset;
use crate::match_record::MatchRecord;
use crate::provider::Fixture;

const TEAM_NAMES: &[&str] = &[
    "Alcione", "Arzignano", "Caldiero", "Giana Erminio", "Lecco", "Lumezzane", "Novara",
    "Pergolettese", "Pro Patria", "Pro Vercelli", "Renate", "Trento", "Triestina", "Virtus Verona",
];

#[derive(Debug, Clone)]
pub struct SyntheticLeague {
    pub name: String,
    pub teams: usize,
    /// Full double round-robins already played.
    pub seasons: usize,
    pub seed: u64,
    pub first_kickoff: DateTime<Utc>,
}

impl SyntheticLeague {
    pub fn new(name: &str, teams: usize, seed: u64, first_kickoff: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            teams: teams.clamp(2, TEAM_NAMES.len()),
            seasons: 1,
            seed,
            first_kickoff,
        }
    }

    /// Played history for every team plus one upcoming round of fixtures.
    pub fn build(&self) -> Dataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let names = TEAM_NAMES[..self.teams]
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();
        let strength = names
            .iter()
            .map(|_| (rng.gen_range(0.6..1.8), rng.gen_range(0.6..1.6)))
            .collect::<Vec<(f64, f64)>>();

        let mut played: Vec<(usize, usize, u32, u32)> = Vec::new();
        for _ in 0..self.seasons {
            for h in 0..names.len() {
                for a in 0..names.len() {
                    if h == a {
                        continue;
                    }
                    let lambda_home = (strength[h].0 * strength[a].1 * 1.1).max(0.05);
                    let lambda_away = (strength[a].0 * strength[h].1 * 0.9).max(0.05);
                    played.push((
                        h,
                        a,
                        sample_poisson(&mut rng, lambda_home),
                        sample_poisson(&mut rng, lambda_away),
                    ));
                }
            }
        }

        let mut ds = Dataset::new();
        for (idx, team) in names.iter().enumerate() {
            // The source hands histories over newest-first.
            let history = played
                .iter()
                .rev()
                .filter(|(h, a, _, _)| *h == idx || *a == idx)
                .map(|(h, a, hg, ag)| MatchRecord::new(&names[*h], &names[*a], *hg, *ag))
                .collect::<Vec<_>>();
            ds.insert_history(&self.name, team, &history);
        }

        for (slot, pair) in names.chunks(2).enumerate() {
            let [home, away] = pair else {
                continue;
            };
            ds.push_fixture(Fixture {
                home_team: home.clone(),
                away_team: away.clone(),
                league: self.name.clone(),
                kickoff: self.first_kickoff + ChronoDuration::minutes(150 * slot as i64),
            });
        }
        ds
    }
}

/// Knuth's multiplication method; fine for the small rates used here.
pub fn sample_poisson(rng: &mut impl Rng, lambda: f64) -> u32 {
    let limit = (-lambda.max(0.0)).exp();
    let mut k = 0u32;
    let mut p = rng.r#gen::<f64>();
    while p > limit {
        k += 1;
        p *= rng.r#gen::<f64>();
    }
    k
}
