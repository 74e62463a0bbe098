use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

const SPARKS: [char; 6] = ['✨', '⭐', '✦', '✓', '*', '+'];
const CHEERS: [&str; 5] = ["BRAVO!", "PARFAIT!", "SUPER!", "GÉNIAL!", "EXCELLENT!"];

/// Fixed animation step, matching the shell's tick rate.
const STEP_SECS: f64 = 0.1;
const GRAVITY: f64 = 12.0;

/// One glyph of the success animation, in surface-local cell coordinates.
#[derive(Debug, Clone)]
pub struct CelebrationParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    /// Letters of the cheer word fly to a fixed slot and stay there.
    pub target: Option<(f64, f64)>,
}

impl CelebrationParticle {
    fn spark<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *SPARKS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..6),
            age: 0.0,
            max_age: rng.gen_range(1.0..2.0),
            target: None,
        }
    }

    fn letter(from: (f64, f64), to: (f64, f64), symbol: char, color_index: usize) -> Self {
        Self {
            x: from.0,
            y: from.1,
            vel_x: to.0 - from.0,
            vel_y: to.1 - from.1,
            symbol,
            color_index,
            age: 0.0,
            max_age: f64::INFINITY,
            target: Some(to),
        }
    }

    pub fn is_letter(&self) -> bool {
        self.target.is_some()
    }

    fn update(&mut self, dt: f64) -> bool {
        match self.target {
            Some((tx, ty)) => {
                let dist = ((tx - self.x).powi(2) + (ty - self.y).powi(2)).sqrt();
                if dist > 0.5 {
                    // close a fixed fraction of the gap each step
                    self.x += (tx - self.x) * 0.4;
                    self.y += (ty - self.y) * 0.4;
                } else {
                    self.x = tx;
                    self.y = ty;
                }
                self.vel_x = tx - self.x;
                self.vel_y = ty - self.y;
            }
            None => {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_y += GRAVITY * dt;
            }
        }
        self.age += dt;
        self.age < self.max_age
    }
}

/// Burst of sparks and a cheer word played over the object after a correct
/// answer.
#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<CelebrationParticle>,
    started_at: Option<Instant>,
    duration: Duration,
    width: f64,
    height: f64,
}

impl Default for CelebrationAnimation {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

impl CelebrationAnimation {
    pub fn new(duration: Duration) -> Self {
        Self {
            particles: Vec::new(),
            started_at: None,
            duration,
            width: 40.0,
            height: 12.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start over in an area of `width` x `height` cells.
    pub fn start(&mut self, width: u16, height: u16, now: Instant) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.started_at = Some(now);
        self.width = width as f64;
        self.height = height as f64;

        let center = (self.width / 2.0, self.height / 2.0);
        let cheer = CHEERS.choose(&mut rng).unwrap_or(&"BRAVO!");
        let letters = cheer.chars().count() as f64;
        let left = center.0 - (letters - 1.0);

        for (i, ch) in cheer.chars().enumerate() {
            let slot = (left + i as f64 * 2.0, 1.0);
            let from = (
                center.0 + rng.gen_range(-6.0..6.0),
                center.1 + rng.gen_range(-3.0..3.0),
            );
            self.particles
                .push(CelebrationParticle::letter(from, slot, ch, rng.gen_range(0..6)));
        }

        for _ in 0..16 {
            let x = center.0 + rng.gen_range(-8.0..8.0);
            let y = center.1 + rng.gen_range(-2.0..2.0);
            self.particles.push(CelebrationParticle::spark(x, y, &mut rng));
        }
    }

    pub fn stop(&mut self) {
        self.started_at = None;
        self.particles.clear();
    }

    /// Advance one fixed step; ends the animation once its duration is over.
    pub fn update(&mut self, now: Instant) {
        let Some(started_at) = self.started_at else {
            return;
        };
        if now.saturating_duration_since(started_at) >= self.duration {
            self.stop();
            return;
        }

        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(STEP_SECS);
            let inside = p.is_letter()
                || (p.y <= height + 2.0 && p.x >= -2.0 && p.x <= width + 2.0);
            alive && inside
        });
    }
}
