use std::collections::VecDeque;
use std::time::Instant;

/// Compteur FPS par fenêtre glissante. Zéro allocation après init.
///
/// # Example
/// ```
/// use va_render::fps::FpsCounter;
/// let mut counter = FpsCounter::new(60);
/// counter.tick();
/// assert!(counter.fps() >= 0.0);
/// ```
pub struct FpsCounter {
    /// Timestamps des dernières N frames.
    timestamps: VecDeque<Instant>,
    /// Taille de la fenêtre (nombre de frames à moyenner).
    window: usize,
    /// FPS calculé, mis à jour à chaque tick.
    fps: f64,
    /// Temps de la dernière frame en ms.
    pub frame_time_ms: f64,
}

impl FpsCounter {
    /// Create a new FPS counter with the given averaging window size.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(window + 1),
            window: window.max(2),
            fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// Appeler une fois par frame, APRÈS la présentation.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        if let Some(&last) = self.timestamps.back() {
            self.frame_time_ms = now.duration_since(last).as_secs_f64() * 1000.0;
        }
        self.timestamps.push_back(now);
        if self.timestamps.len() > self.window {
            self.timestamps.pop_front();
        }
        if self.timestamps.len() >= 2 {
            let first = self.timestamps.front().copied().unwrap_or(now);
            let secs = now.duration_since(first).as_secs_f64();
            if secs > 0.0 {
                self.fps = (self.timestamps.len() - 1) as f64 / secs;
            }
        }
    }

    /// FPS moyen sur la fenêtre.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

/// Statistiques cumulées d'une session de lecture.
///
/// # Example
/// ```
/// use va_render::fps::PlaybackStats;
/// let mut stats = PlaybackStats::new();
/// stats.record(28);
/// stats.record(3);
/// assert_eq!(stats.frames(), 2);
/// assert_eq!(stats.rows_rewritten(), 31);
/// ```
pub struct PlaybackStats {
    fps: FpsCounter,
    frames: u64,
    rows_rewritten: u64,
}

impl PlaybackStats {
    /// Fenêtre FPS de 60 frames.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fps: FpsCounter::new(60),
            frames: 0,
            rows_rewritten: 0,
        }
    }

    /// Enregistre une frame présentée et le nombre de lignes réécrites.
    pub fn record(&mut self, rows_rewritten: usize) {
        self.frames += 1;
        self.rows_rewritten += rows_rewritten as u64;
        self.fps.tick();
    }

    /// Frames présentées.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Total de lignes réécrites.
    #[must_use]
    pub fn rows_rewritten(&self) -> u64 {
        self.rows_rewritten
    }

    /// FPS effectif sur la fenêtre glissante.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps.fps()
    }
}

impl Default for PlaybackStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn fps_over_window() {
        let mut counter = FpsCounter::new(10);
        let start = Instant::now();
        for i in 0..5u32 {
            counter.tick_at(start + Duration::from_millis(u64::from(i) * 100));
        }
        assert!((counter.fps() - 10.0).abs() < 1e-6);
        assert!((counter.frame_time_ms - 100.0).abs() < 1e-6);
    }

    #[test]
    fn window_drops_old_samples() {
        let mut counter = FpsCounter::new(3);
        let start = Instant::now();
        // Deux ticks lents puis trois rapides : seule la fin compte.
        counter.tick_at(start);
        counter.tick_at(start + Duration::from_secs(1));
        for i in 1..=3u64 {
            counter.tick_at(start + Duration::from_secs(1) + Duration::from_millis(i * 50));
        }
        assert!((counter.fps() - 20.0).abs() < 1e-6);
    }
}
