use std::time::Instant;

use tracing::warn;

use super::simulated::SimulatedSurface;
use super::{RenderSurface, RenderTarget, SurfaceKind, SurfaceView};
use crate::error::RenderError;

/// Opaque AR rendering engine provided by the host platform.
pub trait ArBackend {
    /// Whether camera and 3D support are present on this device.
    fn is_available(&self) -> bool;

    /// Load and place the asset. The surface is ready once this returns Ok.
    fn load(&mut self, asset: &str) -> Result<(), RenderError>;

    fn set_animation(&mut self, playing: bool);
}

/// Surface backed by a native AR engine.
///
/// When the engine cannot load an asset, that object is shown through the
/// simulated view instead.
pub struct NativeArSurface {
    backend: Box<dyn ArBackend>,
    fallback: SimulatedSurface,
    ready: bool,
    degraded: bool,
    object_id: String,
}

impl NativeArSurface {
    pub fn new(backend: Box<dyn ArBackend>) -> Self {
        Self {
            backend,
            fallback: SimulatedSurface::new(),
            ready: false,
            degraded: false,
            object_id: String::new(),
        }
    }

    /// True while the current object is shown through the simulation.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

impl RenderSurface for NativeArSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::NativeAr
    }

    fn show(&mut self, target: &RenderTarget, now: Instant) -> bool {
        self.object_id = target.object_id.clone();
        self.backend.set_animation(false);

        match self.backend.load(&target.asset) {
            Ok(()) => {
                self.degraded = false;
                self.ready = true;
            }
            Err(e) => {
                warn!(error = %e, object = %target.object_id, "AR load failed, using simulation");
                self.degraded = true;
                self.ready = self.fallback.show(target, now);
            }
        }
        self.ready
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn set_success(&mut self, playing: bool, area: (u16, u16), now: Instant) {
        if self.degraded {
            self.fallback.set_success(playing, area, now);
        } else {
            self.backend.set_animation(playing);
        }
    }

    fn on_tick(&mut self, now: Instant) {
        if self.degraded {
            self.fallback.on_tick(now);
        }
    }

    fn view(&self) -> SurfaceView<'_> {
        if self.degraded {
            return self.fallback.view();
        }
        SurfaceView {
            kind: SurfaceKind::NativeAr,
            ready: self.ready,
            caption: &self.object_id,
            icon: "",
            color: (0x19, 0x76, 0xd2),
            bob: 0,
            particles: &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        loaded: Vec<String>,
        animating: bool,
    }

    struct RecordingBackend {
        calls: Arc<Mutex<Calls>>,
        broken_asset: Option<&'static str>,
    }

    impl ArBackend for RecordingBackend {
        fn is_available(&self) -> bool {
            true
        }

        fn load(&mut self, asset: &str) -> Result<(), RenderError> {
            if self.broken_asset == Some(asset) {
                return Err(RenderError::AssetUnavailable(asset.to_string()));
            }
            self.calls.lock().unwrap().loaded.push(asset.to_string());
            Ok(())
        }

        fn set_animation(&mut self, playing: bool) {
            self.calls.lock().unwrap().animating = playing;
        }
    }

    fn surface(broken_asset: Option<&'static str>) -> (NativeArSurface, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let backend = RecordingBackend {
            calls: Arc::clone(&calls),
            broken_asset,
        };
        (NativeArSurface::new(Box::new(backend)), calls)
    }

    fn target(id: &str) -> RenderTarget {
        RenderTarget {
            object_id: id.to_string(),
            asset: format!("models/{id}.glb"),
        }
    }

    #[test]
    fn not_ready_before_first_object() {
        let (surface, _) = surface(None);
        assert!(!surface.is_ready());
        assert!(!surface.view().ready);
    }

    #[test]
    fn loads_asset_and_forwards_animation() {
        let (mut surface, calls) = surface(None);
        let now = Instant::now();

        assert!(surface.show(&target("car"), now));
        assert_eq!(calls.lock().unwrap().loaded, vec!["models/car.glb"]);

        surface.set_success(true, (40, 10), now);
        assert!(calls.lock().unwrap().animating);

        let view = surface.view();
        assert_eq!(view.kind, SurfaceKind::NativeAr);
        assert_eq!(view.caption, "car");
    }

    #[test]
    fn failed_load_degrades_to_simulation() {
        let (mut surface, calls) = surface(Some("models/house.glb"));
        let now = Instant::now();

        assert!(surface.show(&target("house"), now));
        assert!(surface.is_degraded());
        assert_eq!(surface.view().kind, SurfaceKind::Simulated);
        assert_eq!(surface.view().icon, "🏠");

        surface.set_success(true, (40, 10), now);
        assert!(!calls.lock().unwrap().animating);

        // next object loads natively again
        assert!(surface.show(&target("dog"), now));
        assert!(!surface.is_degraded());
        assert_eq!(surface.view().kind, SurfaceKind::NativeAr);
    }
}
