//! Per-frame snapshot handed from the simulation to the renderer

use crate::particle::{PointSprite, RingInstance, SphereImpostor};

/// GPU-ready instances for one frame
#[derive(Debug, Clone, Default)]
pub struct SceneFrame {
    pub stars: Vec<PointSprite>,
    pub nebula: Vec<PointSprite>,
    /// Nebula rings followed by the shock wave (if still visible)
    pub rings: Vec<RingInstance>,
    pub glow: SphereImpostor,
    pub core: SphereImpostor,
}

impl SceneFrame {
    /// Empty the instance lists, keeping their allocations
    pub fn clear(&mut self) {
        self.stars.clear();
        self.nebula.clear();
        self.rings.clear();
    }
}
