//! Which ground surfaces leave skid marks

use serde::{Deserialize, Serialize};

/// Ground surface under a wheel, as reported by the terrain system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Asphalt,
    Concrete,
    Gravel,
    Grass,
    Dirt,
    Sand,
    Snow,
    Ice,
}

impl SurfaceKind {
    pub fn is_paved(self) -> bool {
        matches!(self, SurfaceKind::Asphalt | SurfaceKind::Concrete)
    }
}

/// Skid-eligibility predicate supplied by the vehicle/terrain system
pub trait SkidEligibility {
    fn allows_skid(&self, surface: SurfaceKind) -> bool;
}

impl<F> SkidEligibility for F
where
    F: Fn(SurfaceKind) -> bool,
{
    fn allows_skid(&self, surface: SurfaceKind) -> bool {
        self(surface)
    }
}

/// Common eligibility rules
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfacePolicy {
    /// Road surfaces only
    #[default]
    PavedOnly,
    All,
    Only(Vec<SurfaceKind>),
}

impl SkidEligibility for SurfacePolicy {
    fn allows_skid(&self, surface: SurfaceKind) -> bool {
        match self {
            SurfacePolicy::PavedOnly => surface.is_paved(),
            SurfacePolicy::All => true,
            SurfacePolicy::Only(kinds) => kinds.contains(&surface),
        }
    }
}
