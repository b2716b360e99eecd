//! Scene directories, their file layout and their sweep locations.

pub mod layout;

pub use layout::*;

use crate::error::Error;
use std::{fmt, fs};

/// A panorama sweep location of a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Viewpoint {
    /// The viewpoint uuid.
    pub uuid: String,
    /// `[x, y, z]`
    pub position: [f64; 3],
    /// `[w, x, y, z]` as stored.
    pub quaternion: [f64; 4],
}

impl Viewpoint {
    /// The Euclidean distance between the positions.
    #[inline]
    pub fn distance(
        &self,
        other: &Self,
    ) -> f64 {
        self.position
            .iter()
            .zip(other.position.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

/// The viewpoints of a scene which own a points file.
#[derive(Clone, Default, PartialEq)]
pub struct SweepScene {
    /// The scene directory name.
    pub name: String,
    /// In the order of `sweep_locations.csv`.
    pub viewpoints: Vec<Viewpoint>,
}

impl SweepScene {
    /// Loading the sweep locations of the scene `name`.
    pub fn load(
        layout: &SceneLayout,
        name: &str,
    ) -> Result<Self, Error> {
        let text = fs::read_to_string(layout.sweep_locations(name))?;
        let viewpoints = parse_sweep_locations(&text)?
            .into_iter()
            .filter(|viewpoint| layout.points(name, &viewpoint.uuid).is_file())
            .collect();

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "realenv_dataset::scene",
            "SweepScene::load > {name}",
        );

        Ok(Self {
            name: name.to_owned(),
            viewpoints,
        })
    }

    /// The number of viewpoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.viewpoints.len()
    }

    /// Checking if there is no viewpoint.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.viewpoints.is_empty()
    }
}

impl fmt::Debug for SweepScene {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SweepScene")
            .field("name", &self.name)
            .field("viewpoints.len()", &self.viewpoints.len())
            .finish()
    }
}

/// Parsing the rows of `uuid,x,y,z,q0,q1,q2,q3`.
///
/// A repeated uuid takes the values of its last row
/// at the position of its first row.
pub fn parse_sweep_locations(text: &str) -> Result<Vec<Viewpoint>, Error> {
    let mut viewpoints = Vec::<Viewpoint>::new();

    for (line_index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let line_number = line_index + 1;
        let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
        if fields.len() < 8 {
            return Err(Error::MalformedSweepLocation {
                line: line_number,
                reason: format!("expected 8 fields, found {}", fields.len()),
            });
        }

        let mut values = [0.0; 7];
        for (value, field) in values.iter_mut().zip(&fields[1..8]) {
            *value = field.parse().map_err(|_| Error::MalformedSweepLocation {
                line: line_number,
                reason: format!("invalid number {field:?}"),
            })?;
        }

        let viewpoint = Viewpoint {
            uuid: fields[0].to_owned(),
            position: [values[0], values[1], values[2]],
            quaternion: [values[3], values[4], values[5], values[6]],
        };
        match viewpoints.iter_mut().find(|v| v.uuid == viewpoint.uuid) {
            Some(existing) => *existing = viewpoint,
            None => viewpoints.push(viewpoint),
        }
    }

    Ok(viewpoints)
}

/// Sorted names of the scene directories under the root.
///
/// Directories lacking the sweep locations or panoramas are skipped.
pub fn list_scenes(layout: &SceneLayout) -> Result<Vec<String>, Error> {
    let mut scenes = fs::read_dir(layout.root())?
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| layout.is_scene(name))
        .collect::<Vec<_>>();
    scenes.sort();
    Ok(scenes)
}

/// Taking the first `floor(len * ratio)` scenes for training,
/// or all scenes otherwise.
pub fn split_scenes(
    mut scenes: Vec<String>,
    train: bool,
    ratio: f64,
) -> Vec<String> {
    if train {
        scenes.truncate(split_count(scenes.len(), ratio));
    }
    scenes
}

/// `floor(len * ratio)`, at most `len`.
#[inline]
pub fn split_count(
    len: usize,
    ratio: f64,
) -> usize {
    ((len as f64 * ratio).floor() as usize).min(len)
}
