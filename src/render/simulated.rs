use std::time::Instant;

use super::{RenderSurface, RenderTarget, SurfaceKind, SurfaceView};
use crate::celebration::CelebrationAnimation;

/// Icon and colour standing in for the 3D model of `object_id`.
pub fn icon_for(object_id: &str) -> (&'static str, (u8, u8, u8)) {
    match object_id {
        "apple" => ("🍎", (0xff, 0x44, 0x44)),
        "chair" => ("🪑", (0x8b, 0x45, 0x13)),
        "book" => ("📚", (0x44, 0x44, 0xff)),
        "car" => ("🚗", (0x44, 0x44, 0x44)),
        "house" => ("🏠", (0x8b, 0x45, 0x13)),
        "tree" => ("🌳", (0x22, 0x8b, 0x22)),
        "dog" => ("🐕", (0xd2, 0x69, 0x1e)),
        "cat" => ("🐱", (0x69, 0x69, 0x69)),
        "table" => ("🪑", (0x8b, 0x45, 0x13)),
        "phone" => ("📱", (0x00, 0x00, 0x00)),
        _ => ("📦", (0x19, 0x76, 0xd2)),
    }
}

/// Icon-based stand-in for AR, always ready.
#[derive(Debug, Default)]
pub struct SimulatedSurface {
    object_id: String,
    celebration: CelebrationAnimation,
    success_since: Option<Instant>,
    now: Option<Instant>,
}

impl SimulatedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn bob(&self) -> i16 {
        match (self.success_since, self.now) {
            (Some(since), Some(now)) => {
                let t = now.saturating_duration_since(since).as_secs_f64();
                (t * 5.0).sin().round() as i16
            }
            _ => 0,
        }
    }
}

impl RenderSurface for SimulatedSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Simulated
    }

    fn show(&mut self, target: &RenderTarget, now: Instant) -> bool {
        self.object_id = target.object_id.clone();
        self.success_since = None;
        self.celebration.stop();
        self.now = Some(now);
        true
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn set_success(&mut self, playing: bool, area: (u16, u16), now: Instant) {
        match (playing, self.success_since) {
            (true, None) => {
                self.success_since = Some(now);
                self.celebration.start(area.0, area.1, now);
            }
            (false, Some(_)) => {
                self.success_since = None;
                self.celebration.stop();
            }
            _ => {}
        }
    }

    fn on_tick(&mut self, now: Instant) {
        self.now = Some(now);
        self.celebration.update(now);
    }

    fn view(&self) -> SurfaceView<'_> {
        let (icon, color) = icon_for(&self.object_id);
        SurfaceView {
            kind: SurfaceKind::Simulated,
            ready: true,
            caption: &self.object_id,
            icon,
            color,
            bob: self.bob(),
            particles: &self.celebration.particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn target(id: &str) -> RenderTarget {
        RenderTarget {
            object_id: id.to_string(),
            asset: format!("models/{id}.glb"),
        }
    }

    #[test]
    fn known_and_unknown_icons() {
        assert_eq!(icon_for("apple").0, "🍎");
        assert_eq!(icon_for("phone").0, "📱");
        assert_eq!(icon_for("spaceship").0, "📦");
    }

    #[test]
    fn ready_as_soon_as_shown() {
        let mut surface = SimulatedSurface::new();
        assert!(surface.show(&target("dog"), Instant::now()));
        assert!(surface.is_ready());

        let view = surface.view();
        assert_eq!(view.caption, "dog");
        assert_eq!(view.icon, "🐕");
        assert_eq!(view.bob, 0);
        assert!(view.particles.is_empty());
    }

    #[test]
    fn success_animation_plays_and_stops() {
        let t0 = Instant::now();
        let mut surface = SimulatedSurface::new();
        surface.show(&target("cat"), t0);

        surface.set_success(true, (40, 10), t0);
        surface.on_tick(t0 + Duration::from_millis(300));
        assert!(!surface.view().particles.is_empty());
        // sin(1.5) rounds to 1
        assert_eq!(surface.view().bob, 1);

        surface.set_success(false, (40, 10), t0);
        assert!(surface.view().particles.is_empty());
        assert_eq!(surface.view().bob, 0);
    }

    #[test]
    fn showing_a_new_object_resets_animation() {
        let t0 = Instant::now();
        let mut surface = SimulatedSurface::new();
        surface.show(&target("cat"), t0);
        surface.set_success(true, (40, 10), t0);

        surface.show(&target("tree"), t0 + Duration::from_secs(2));
        assert!(surface.view().particles.is_empty());
        assert_eq!(surface.view().caption, "tree");
    }
}
