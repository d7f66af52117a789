// Judgement tiers and score/combo/accuracy tracking

/// How a hit (or miss) was judged against the timing windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    Perfect,
    Great,
    Good,
    Miss,
}

impl Judgement {
    /// Distance thresholds, as a fraction of the tile approach
    pub const PERFECT_WINDOW: f64 = 0.05;
    pub const GREAT_WINDOW: f64 = 0.10;
    pub const GOOD_WINDOW: f64 = 0.30;

    /// Classify a distance from the ideal hit line
    ///
    /// Returns `None` when the click is a whiff (outside every window);
    /// `Miss` is never produced here, it comes from tiles crossing the
    /// far boundary unhit.
    pub fn classify(distance: f64) -> Option<Self> {
        if distance < Self::PERFECT_WINDOW {
            Some(Judgement::Perfect)
        } else if distance < Self::GREAT_WINDOW {
            Some(Judgement::Great)
        } else if distance < Self::GOOD_WINDOW {
            Some(Judgement::Good)
        } else {
            None
        }
    }

    /// Points awarded for this judgement
    pub fn base_points(&self) -> u32 {
        match self {
            Judgement::Perfect => 300,
            Judgement::Great => 150,
            Judgement::Good => 50,
            Judgement::Miss => 0,
        }
    }

    /// Weight used in the accuracy tally
    fn accuracy_weight(&self) -> f64 {
        match self {
            Judgement::Perfect => 1.0,
            Judgement::Great => 0.75,
            Judgement::Good => 0.5,
            Judgement::Miss => 0.0,
        }
    }
}

/// Running score, combo, and accuracy for one game session
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    pub score: u32,
    pub combo: u32,
    pub best_combo: u32,
    perfect: u32,
    great: u32,
    good: u32,
    missed: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful hit: tier-scaled points, combo up
    pub fn register_hit(&mut self, judgement: Judgement) {
        self.score += judgement.base_points();
        self.combo += 1;
        self.best_combo = self.best_combo.max(self.combo);
        match judgement {
            Judgement::Perfect => self.perfect += 1,
            Judgement::Great => self.great += 1,
            Judgement::Good => self.good += 1,
            Judgement::Miss => self.missed += 1,
        }
    }

    /// Record a tile that crossed the far boundary unhit
    pub fn register_miss(&mut self) {
        self.combo = 0;
        self.missed += 1;
    }

    /// Number of judged tiles (hits and misses, not whiffs)
    pub fn judged(&self) -> u32 {
        self.perfect + self.great + self.good + self.missed
    }

    /// Weighted accuracy in [0, 1]; 1.0 until anything has been judged
    pub fn accuracy(&self) -> f64 {
        let judged = self.judged();
        if judged == 0 {
            return 1.0;
        }
        let weighted = self.perfect as f64 * Judgement::Perfect.accuracy_weight()
            + self.great as f64 * Judgement::Great.accuracy_weight()
            + self.good as f64 * Judgement::Good.accuracy_weight();
        weighted / judged as f64
    }
}
