//! Text codec for MVE bundle files.
//!
//! A bundle file stores the camera list followed by the feature tracks:
//!
//! ```text
//! MVE_BUNDLE v1.0
//! <num_cameras> <num_features>
//! <flen> <ppoint.x> <ppoint.y> <paspect> <dist.0> <dist.1>   (per camera)
//! <rotation row 0>
//! <rotation row 1>
//! <rotation row 2>
//! <translation>
//! <x> <y> <z>                                                (per feature)
//! <r> <g> <b>
//! <num_refs> [<view_id> <feature_id> <x> <y>]...
//! ```
//!
//! Floats are written in their shortest round-trip form, so values reload
//! exactly, including the zero focal length of cameras that were not
//! reconstructed.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use glam::{Vec2, Vec3};
use mve_core::{CameraInfo, MveError, Result};
use tempfile::NamedTempFile;

use crate::bundle::{Bundle, Feature2D, Feature3D};

const MAGIC: &str = "MVE_BUNDLE";
const VERSION: &str = "v1.0";

/// Upper bound for preallocation from untrusted counts.
const MAX_PREALLOC: usize = 1 << 16;

/// Loads a bundle from a file.
///
/// Returns [`MveError::NotFound`] if the file does not exist and
/// [`MveError::Parse`] if its content is malformed.
pub fn load_mve_bundle(path: impl AsRef<Path>) -> Result<Bundle> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MveError::io(path, e))?;
    let bundle = read_mve_bundle(file, path)?;
    log::debug!(
        "loaded bundle '{}': {} cameras, {} features",
        path.display(),
        bundle.num_cameras(),
        bundle.num_features()
    );
    Ok(bundle)
}

/// Saves a bundle to a file, replacing any previous content.
///
/// The bundle is written to a temporary file next to `path` which is then
/// renamed over it, so a failed save leaves the previous file intact.
/// Failures are reported as [`MveError::Io`].
pub fn save_mve_bundle(bundle: &Bundle, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| MveError::write(path, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write_mve_bundle(bundle, &mut writer).map_err(|e| MveError::write(path, e))?;
        writer.flush().map_err(|e| MveError::write(path, e))?;
    }
    temp.persist(path).map_err(|e| MveError::write(path, e.error))?;
    log::debug!(
        "saved bundle '{}': {} cameras, {} features",
        path.display(),
        bundle.num_cameras(),
        bundle.num_features()
    );
    Ok(())
}

/// Reads a bundle from any reader.
///
/// `source` is only used to label errors.
pub fn read_mve_bundle<R: Read>(mut reader: R, source: &Path) -> Result<Bundle> {
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            MveError::parse(source, 0, "bundle file is not valid UTF-8")
        } else {
            MveError::io(source, e)
        }
    })?;
    parse_bundle(&text, source)
}

/// Writes a bundle to any writer.
pub fn write_mve_bundle<W: Write>(bundle: &Bundle, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{MAGIC} {VERSION}")?;
    writeln!(writer, "{} {}", bundle.num_cameras(), bundle.num_features())?;

    for cam in bundle.cameras() {
        writeln!(
            writer,
            "{} {} {} {} {} {}",
            cam.flen, cam.ppoint.x, cam.ppoint.y, cam.paspect, cam.dist.x, cam.dist.y
        )?;
        for row in 0..3 {
            let r = cam.rot.row(row);
            writeln!(writer, "{} {} {}", r.x, r.y, r.z)?;
        }
        writeln!(writer, "{} {} {}", cam.trans.x, cam.trans.y, cam.trans.z)?;
    }

    for feature in bundle.features() {
        writeln!(writer, "{} {} {}", feature.pos.x, feature.pos.y, feature.pos.z)?;
        writeln!(
            writer,
            "{} {} {}",
            feature.color.x, feature.color.y, feature.color.z
        )?;
        write!(writer, "{}", feature.refs.len())?;
        for r in &feature.refs {
            write!(
                writer,
                " {} {} {} {}",
                r.view_id, r.feature_id, r.pos.x, r.pos.y
            )?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn parse_bundle(text: &str, source: &Path) -> Result<Bundle> {
    let mut tokens = Tokens::new(text, source);

    let magic = tokens.next_token().unwrap_or_default();
    if magic != MAGIC {
        return Err(tokens.error("missing bundle file signature"));
    }
    let version = tokens.next_token().unwrap_or_default();
    if version != VERSION {
        return Err(tokens.error(format!("unsupported bundle version '{version}'")));
    }

    let num_cameras: usize = tokens.value("camera count")?;
    let num_features: usize = tokens.value("feature count")?;

    let mut cameras = Vec::with_capacity(num_cameras.min(MAX_PREALLOC));
    for _ in 0..num_cameras {
        cameras.push(parse_camera(&mut tokens)?);
    }

    let mut features = Vec::with_capacity(num_features.min(MAX_PREALLOC));
    for _ in 0..num_features {
        features.push(parse_feature(&mut tokens)?);
    }

    if let Some(extra) = tokens.next_token() {
        return Err(tokens.error(format!("unexpected trailing content '{extra}'")));
    }

    Ok(Bundle::from_parts(cameras, features))
}

fn parse_camera(tokens: &mut Tokens<'_>) -> Result<CameraInfo> {
    let [flen, ppx, ppy, paspect, d0, d1] = tokens.values::<6>("camera intrinsics")?;
    let rows = tokens.values::<9>("camera rotation")?;
    let trans = tokens.values::<3>("camera translation")?;

    let mut camera = CameraInfo {
        flen,
        ppoint: Vec2::new(ppx, ppy),
        paspect,
        dist: Vec2::new(d0, d1),
        trans: Vec3::from_array(trans),
        ..CameraInfo::default()
    };
    camera.set_rotation_rows(&rows);
    Ok(camera)
}

fn parse_feature(tokens: &mut Tokens<'_>) -> Result<Feature3D> {
    let pos = Vec3::from_array(tokens.values::<3>("feature position")?);
    let color = Vec3::from_array(tokens.values::<3>("feature color")?);
    let num_refs: usize = tokens.value("reference count")?;

    let mut refs = Vec::with_capacity(num_refs.min(MAX_PREALLOC));
    for _ in 0..num_refs {
        let view_id = tokens.value("view id")?;
        let feature_id = tokens.value("feature id")?;
        let [x, y] = tokens.values::<2>("reference position")?;
        refs.push(Feature2D::new(view_id, feature_id, Vec2::new(x, y)));
    }

    Ok(Feature3D { pos, color, refs })
}

/// Whitespace tokenizer that remembers the current line for error reporting.
struct Tokens<'a> {
    source: &'a Path,
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    current: std::str::SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str, source: &'a Path) -> Self {
        Self {
            source,
            lines: text.lines().enumerate(),
            current: "".split_whitespace(),
            line: 0,
        }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        loop {
            if let Some(token) = self.current.next() {
                return Some(token);
            }
            let (index, line) = self.lines.next()?;
            self.line = index + 1;
            self.current = line.split_whitespace();
        }
    }

    fn error(&self, message: impl Into<String>) -> MveError {
        MveError::parse(self.source, self.line, message)
    }

    fn value<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self
            .next_token()
            .ok_or_else(|| self.error(format!("unexpected end of file, expected {what}")))?;
        token
            .parse()
            .map_err(|_| self.error(format!("invalid {what} '{token}'")))
    }

    fn values<const N: usize>(&mut self, what: &str) -> Result<[f32; N]> {
        let mut out = [0.0; N];
        for v in &mut out {
            *v = self.value(what)?;
        }
        Ok(out)
    }
}
