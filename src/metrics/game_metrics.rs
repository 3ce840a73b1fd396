use std::time::{Duration, Instant};

use crate::game::{Outcome, StepResult};

/// Per-session bookkeeping for the status bar. Nothing here outlives the process.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    clock_running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            clock_running: false,
        }
    }

    /// Refresh the game clock; frozen outside a running game
    pub fn update(&mut self) {
        if self.clock_running {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    /// Feed every engine step through here
    pub fn record(&mut self, step: &StepResult, score: u32) {
        match step.outcome {
            Outcome::Started | Outcome::Restarted => self.on_game_start(),
            Outcome::HitWall => self.on_game_over(score),
            _ => {}
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.clock_running = true;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.clock_running = false;
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
