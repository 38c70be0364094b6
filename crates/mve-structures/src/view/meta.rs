//! The `meta.json` file of a view directory.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use glam::{Vec2, Vec3};
use mve_core::{CameraInfo, MveError, Result};
use serde::{Deserialize, Serialize};

/// File name of the view metadata inside a view directory.
pub const META_FILE: &str = "meta.json";

/// Persisted metadata of a view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ViewMeta {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<PersistedCamera>,
    #[serde(default)]
    pub embeddings: Vec<String>,
}

/// Camera layout in `meta.json`. The rotation is row-major, as in bundle files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct PersistedCamera {
    pub flen: f32,
    pub ppoint: [f32; 2],
    pub paspect: f32,
    pub dist: [f32; 2],
    pub trans: [f32; 3],
    pub rot: [f32; 9],
}

impl From<&CameraInfo> for PersistedCamera {
    fn from(camera: &CameraInfo) -> Self {
        Self {
            flen: camera.flen,
            ppoint: camera.ppoint.to_array(),
            paspect: camera.paspect,
            dist: camera.dist.to_array(),
            trans: camera.trans.to_array(),
            rot: camera.rotation_rows(),
        }
    }
}

impl From<PersistedCamera> for CameraInfo {
    fn from(persisted: PersistedCamera) -> Self {
        let mut camera = CameraInfo {
            flen: persisted.flen,
            ppoint: Vec2::from_array(persisted.ppoint),
            paspect: persisted.paspect,
            dist: Vec2::from_array(persisted.dist),
            trans: Vec3::from_array(persisted.trans),
            ..CameraInfo::default()
        };
        camera.set_rotation_rows(&persisted.rot);
        camera
    }
}

pub(crate) fn read_meta(dir: &Path) -> Result<ViewMeta> {
    let path = dir.join(META_FILE);
    let file = File::open(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MveError::parse(&path, 0, "view metadata is missing"),
        _ => MveError::io(&path, e),
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| MveError::parse(&path, e.line(), e.to_string()))
}

pub(crate) fn write_meta(dir: &Path, meta: &ViewMeta) -> Result<()> {
    let path = dir.join(META_FILE);
    let file = File::create(&path).map_err(|e| MveError::write(&path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, meta)
        .map_err(|e| MveError::write(&path, e.into()))?;
    writer.flush().map_err(|e| MveError::write(&path, e))
}
