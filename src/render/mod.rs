//! Render surfaces: the view that shows the quizzed object.
//!
//! The quiz engine never looks at which surface is active. The shell asks
//! [`select_surface`] once and talks to the returned trait object.

pub mod native;
pub mod simulated;

use std::time::Instant;

use crate::bank::VocabularyEntry;
use crate::celebration::CelebrationParticle;

pub use native::{ArBackend, NativeArSurface};
pub use simulated::{icon_for, SimulatedSurface};

/// The object a surface should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    /// Identifier of the object, the English term.
    pub object_id: String,
    /// Handle to the 3D asset.
    pub asset: String,
}

impl From<&VocabularyEntry> for RenderTarget {
    fn from(entry: &VocabularyEntry) -> Self {
        Self {
            object_id: entry.english.clone(),
            asset: entry.render_ref.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SurfaceKind {
    #[strum(serialize = "AR")]
    NativeAr,
    #[strum(serialize = "AR Simulation")]
    Simulated,
}

/// What the shell draws for the current frame.
#[derive(Debug, Clone)]
pub struct SurfaceView<'a> {
    pub kind: SurfaceKind,
    pub ready: bool,
    pub caption: &'a str,
    pub icon: &'static str,
    pub color: (u8, u8, u8),
    /// Vertical offset in cells while the success animation plays.
    pub bob: i16,
    pub particles: &'a [CelebrationParticle],
}

pub trait RenderSurface {
    fn kind(&self) -> SurfaceKind;

    /// Display `target`. Returns the ready signal.
    fn show(&mut self, target: &RenderTarget, now: Instant) -> bool;

    fn is_ready(&self) -> bool;

    /// Start or stop the success animation within an area of `area` cells.
    fn set_success(&mut self, playing: bool, area: (u16, u16), now: Instant);

    fn on_tick(&mut self, now: Instant);

    fn view(&self) -> SurfaceView<'_>;
}

/// Native AR when a backend is present and available, the simulation
/// otherwise.
pub fn select_surface(backend: Option<Box<dyn ArBackend>>) -> Box<dyn RenderSurface> {
    match backend {
        Some(backend) if backend.is_available() => Box::new(NativeArSurface::new(backend)),
        _ => Box::new(SimulatedSurface::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    struct StubBackend {
        available: bool,
    }

    impl ArBackend for StubBackend {
        fn is_available(&self) -> bool {
            self.available
        }

        fn load(&mut self, _asset: &str) -> Result<(), RenderError> {
            Ok(())
        }

        fn set_animation(&mut self, _playing: bool) {}
    }

    #[test]
    fn no_backend_selects_simulation() {
        assert_eq!(select_surface(None).kind(), SurfaceKind::Simulated);
    }

    #[test]
    fn unavailable_backend_selects_simulation() {
        let surface = select_surface(Some(Box::new(StubBackend { available: false })));
        assert_eq!(surface.kind(), SurfaceKind::Simulated);
    }

    #[test]
    fn available_backend_selects_native() {
        let surface = select_surface(Some(Box::new(StubBackend { available: true })));
        assert_eq!(surface.kind(), SurfaceKind::NativeAr);
    }

    #[test]
    fn target_from_entry() {
        let entry = VocabularyEntry {
            id: "1".into(),
            english: "apple".into(),
            french: "pomme".into(),
            render_ref: "models/apple.glb".into(),
            category: "food".into(),
        };
        let target = RenderTarget::from(&entry);
        assert_eq!(target.object_id, "apple");
        assert_eq!(target.asset, "models/apple.glb");
    }
}
