use serde::Serialize;

/// `P(k; lambda) = lambda^k e^-lambda / k!`. Negative rates are treated as 0,
/// so `poisson_pmf(0, 0.0) == 1`.
pub fn poisson_pmf(k: u32, lambda: f64) -> f64 {
    let lambda = lambda.max(0.0);
    let mut p = (-lambda).exp();
    for i in 1..=k {
        p *= lambda / i as f64;
    }
    p
}

/// Probabilities for `0..=max_k`. The tail above `max_k` is left out, not folded in.
pub fn poisson_distribution(lambda: f64, max_k: u32) -> Vec<f64> {
    let lambda = lambda.max(0.0);
    let mut out = Vec::with_capacity(max_k as usize + 1);
    let mut p = (-lambda).exp();
    out.push(p);
    for k in 1..=max_k {
        p *= lambda / k as f64;
        out.push(p);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
    pub probability: f64,
}

/// Joint scoreline probabilities under independent home/away Poisson goals.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorelineMatrix {
    max_goals: u32,
    // Row-major: index = home * (max_goals + 1) + away.
    cells: Vec<f64>,
}

impl ScorelineMatrix {
    pub fn from_rates(lambda_home: f64, lambda_away: f64, max_goals: u32) -> Self {
        let pmf_h = poisson_distribution(lambda_home, max_goals);
        let pmf_a = poisson_distribution(lambda_away, max_goals);

        let mut cells = Vec::with_capacity(pmf_h.len() * pmf_a.len());
        for p_i in &pmf_h {
            for p_j in &pmf_a {
                cells.push(p_i * p_j);
            }
        }
        Self { max_goals, cells }
    }

    pub fn max_goals(&self) -> u32 {
        self.max_goals
    }

    fn width(&self) -> usize {
        self.max_goals as usize + 1
    }

    pub fn get(&self, home: u32, away: u32) -> Option<f64> {
        if home > self.max_goals || away > self.max_goals {
            return None;
        }
        self.cells
            .get(home as usize * self.width() + away as usize)
            .copied()
    }

    /// Cells in row-major order: home ascending, then away ascending.
    pub fn iter(&self) -> impl Iterator<Item = Scoreline> + '_ {
        let width = self.width();
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, p)| Scoreline {
                home: (idx / width) as u32,
                away: (idx % width) as u32,
                probability: *p,
            })
    }

    pub fn sum_where(&self, pred: impl Fn(u32, u32) -> bool) -> f64 {
        self.iter()
            .filter(|s| pred(s.home, s.away))
            .map(|s| s.probability)
            .sum()
    }

    /// Mass captured by the grid; the remainder sits beyond `max_goals`.
    pub fn total_mass(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// First maximum in row-major order.
    pub fn most_likely(&self) -> Option<Scoreline> {
        let mut best: Option<Scoreline> = None;
        for s in self.iter() {
            match best {
                Some(b) if s.probability <= b.probability => {}
                _ => best = Some(s),
            }
        }
        best
    }

    /// Highest-probability scorelines; equal probabilities keep row-major order.
    pub fn top(&self, n: usize) -> Vec<Scoreline> {
        let mut all = self.iter().collect::<Vec<_>>();
        all.sort_by(|a, b| {
            b.probability
                .total_cmp(&a.probability)
                .then((a.home, a.away).cmp(&(b.home, b.away)))
        });
        all.truncate(n);
        all
    }
}
