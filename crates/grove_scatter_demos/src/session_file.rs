use std::path::Path;

use glam::Vec2;
use grove_scatter::prelude::{Catalog, DecorationConfig, HeightfieldSurface, RoundConfig};
use serde::{Deserialize, Serialize};

/// Ground the demos scatter over.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TerrainDef {
    Flat {
        extent: f32,
        height: f32,
    },
    /// Gentle hills with a pond (a hole) of `pond_radius` at `pond_center`.
    Rolling {
        extent: f32,
        cell_size: f32,
        amplitude: f32,
        pond_center: (f32, f32),
        pond_radius: f32,
    },
}

impl TerrainDef {
    pub fn extent(&self) -> f32 {
        match self {
            TerrainDef::Flat { extent, .. } | TerrainDef::Rolling { extent, .. } => *extent,
        }
    }

    pub fn build(&self) -> HeightfieldSurface {
        match *self {
            TerrainDef::Flat { extent, height } => {
                HeightfieldSurface::from_fn(extent, 1.0, |_| Some(height))
            }
            TerrainDef::Rolling {
                extent,
                cell_size,
                amplitude,
                pond_center,
                pond_radius,
            } => {
                let pond = Vec2::new(pond_center.0, pond_center.1);
                HeightfieldSurface::from_fn(extent, cell_size, |p| {
                    (p.distance(pond) > pond_radius).then(|| {
                        amplitude * ((p.x * 0.11).sin() + (p.y * 0.07).cos()) * 0.5
                    })
                })
            }
        }
    }
}

/// Everything a demo session needs, loaded from RON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionFile {
    pub seed: u64,
    pub terrain: TerrainDef,
    pub catalog: Catalog,
    #[serde(default)]
    pub decoration: DecorationConfig,
    #[serde(default)]
    pub rounds: RoundConfig,
}

pub fn load_session_file(path: impl AsRef<Path>) -> anyhow::Result<SessionFile> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let session: SessionFile = ron::from_str(&text)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    session.rounds.validate()?;
    Ok(session)
}
