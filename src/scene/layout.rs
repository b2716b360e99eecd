//! File paths of the assets under a dataset root.

use std::path::{Path, PathBuf};

/// The file name of the sweep locations in a scene directory.
pub const SWEEP_LOCATIONS_FILE_NAME: &str = "sweep_locations.csv";

/// Resolving asset paths from a scene name and a viewpoint uuid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneLayout {
    root: PathBuf,
}

impl SceneLayout {
    /// Resolving paths under `root`.
    #[inline]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding the scenes.
    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<scene>`
    #[inline]
    pub fn scene_dir(
        &self,
        scene: &str,
    ) -> PathBuf {
        self.root.join(scene)
    }

    /// `<root>/<scene>/sweep_locations.csv`
    #[inline]
    pub fn sweep_locations(
        &self,
        scene: &str,
    ) -> PathBuf {
        self.scene_dir(scene).join(SWEEP_LOCATIONS_FILE_NAME)
    }

    /// `<root>/<scene>/pano`
    #[inline]
    pub fn pano_dir(
        &self,
        scene: &str,
    ) -> PathBuf {
        self.scene_dir(scene).join("pano")
    }

    /// `<root>/<scene>/pano/points`
    #[inline]
    pub fn points_dir(
        &self,
        scene: &str,
    ) -> PathBuf {
        self.pano_dir(scene).join("points")
    }

    /// The RGB panorama of a viewpoint.
    pub fn rgb(
        &self,
        scene: &str,
        uuid: &str,
    ) -> PathBuf {
        self.pano_dir(scene)
            .join("rgb")
            .join(equirectangular_file_name(uuid, "rgb"))
    }

    /// The mist panorama of a viewpoint.
    pub fn mist(
        &self,
        scene: &str,
        uuid: &str,
    ) -> PathBuf {
        self.pano_dir(scene)
            .join("mist")
            .join(equirectangular_file_name(uuid, "mist"))
    }

    /// The normal panorama of a viewpoint.
    pub fn normal(
        &self,
        scene: &str,
        uuid: &str,
    ) -> PathBuf {
        self.pano_dir(scene)
            .join("normal")
            .join(equirectangular_file_name(uuid, "normal"))
    }

    /// `<root>/<scene>/pano/points/point_<uuid>.json`
    pub fn points(
        &self,
        scene: &str,
        uuid: &str,
    ) -> PathBuf {
        self.points_dir(scene).join(format!("point_{uuid}.json"))
    }

    /// `<root>/<scene>/modeldata/out_z_up.obj`
    pub fn model_obj(
        &self,
        scene: &str,
    ) -> PathBuf {
        self.scene_dir(scene).join("modeldata").join("out_z_up.obj")
    }

    /// A scene is a directory with the sweep locations file and the panoramas.
    pub fn is_scene(
        &self,
        scene: &str,
    ) -> bool {
        self.scene_dir(scene).is_dir()
            && self.sweep_locations(scene).is_file()
            && self.pano_dir(scene).is_dir()
    }
}

#[inline]
fn equirectangular_file_name(
    uuid: &str,
    domain: &str,
) -> String {
    format!("point_{uuid}_view_equirectangular_domain_{domain}.png")
}
