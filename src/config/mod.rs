//! Options of the datasets.

pub use burn::config::Config;

use crate::error::Error;
use std::path::{Path, PathBuf};

/// Options of [`ViewDataset3d`](crate::dataset::view_3d::ViewDataset3d).
#[derive(Config, Debug, PartialEq)]
pub struct ViewDataset3dConfig {
    /// The directory holding the scene directories.
    pub root: PathBuf,

    /// Keeping only the train split if `true`, otherwise all scenes.
    #[config(default = false)]
    pub train: bool,

    /// The fraction of the sorted scenes assigned to the train split.
    #[config(default = 0.9)]
    pub train_ratio: f64,

    /// The number of views in a sample, the target included.
    #[config(default = 5)]
    pub seqlen: usize,

    /// Loading only the first `debug_scene_count` scenes.
    #[config(default = false)]
    pub debug: bool,

    /// The number of scenes loaded in debug mode.
    #[config(default = 35)]
    pub debug_scene_count: usize,

    /// Keeping a neighborhood only if the nearest other viewpoint
    /// is closer than this distance.
    pub distance_filter: Option<f64>,

    /// Loading mist and normal maps.
    #[config(default = false)]
    pub load_3d: bool,

    /// Synthesizing a view with the point-cloud renderer.
    #[config(default = false)]
    pub render_point_cloud: bool,

    /// The dynamic library of the native renderer.
    pub renderer_library: Option<PathBuf>,
}

impl ViewDataset3dConfig {
    /// Checking the options before indexing.
    pub fn validate(&self) -> Result<&Self, Error> {
        if self.seqlen < 2 {
            return Err(Error::Config(
                "seqlen should be at least 2".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.train_ratio) {
            return Err(Error::Config(
                "train_ratio should be in the range [0, 1]".into(),
            ));
        }
        if let Some(distance_filter) = self.distance_filter {
            if distance_filter.is_nan() || distance_filter <= 0.0 {
                return Err(Error::Config(
                    "distance_filter should be positive".into(),
                ));
            }
        }
        if self.render_point_cloud && !self.load_3d {
            return Err(Error::Config(
                "render_point_cloud requires load_3d".into(),
            ));
        }
        Ok(self)
    }

    /// The configured renderer library, or `render` in the current directory.
    pub fn renderer_library_path(&self) -> PathBuf {
        self.renderer_library.to_owned().unwrap_or_else(|| {
            Path::new(".").join(libloading::library_filename("render"))
        })
    }
}

/// Options of the legacy file-list datasets.
#[derive(Config, Debug, PartialEq)]
pub struct FileListConfig {
    /// The directory walked for files.
    pub root: PathBuf,

    /// Keeping the train split of each directory if `true`, otherwise the test split.
    #[config(default = true)]
    pub train: bool,

    /// The directory of the file list cache, the current directory by default.
    pub cache_dir: Option<PathBuf>,
}

impl FileListConfig {
    /// `<cache_dir>/<basename(root)>_<kind>_fofn<0|1>.json`
    ///
    /// `kind` names the files kept in the list.
    pub fn cache_path(
        &self,
        kind: &str,
    ) -> PathBuf {
        let root_name = self
            .root
            .components()
            .next_back()
            .map(|name| name.as_os_str().to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name =
            format!("{root_name}_{kind}_fofn{}.json", u8::from(self.train));

        match &self.cache_dir {
            Some(cache_dir) => cache_dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn default_view_3d() {
        use super::*;

        let config = ViewDataset3dConfig::new("data".into());
        assert_eq!(config.seqlen, 5);
        assert_eq!(config.train_ratio, 0.9);
        assert_eq!(config.debug_scene_count, 35);
        assert_eq!(config.distance_filter, None);
        assert!(!config.train);
        assert!(!config.load_3d);
        assert!(!config.render_point_cloud);
        config.validate().unwrap();
    }

    #[test]
    fn validate_view_3d_err() {
        use super::*;

        let config = ViewDataset3dConfig::new("data".into()).with_seqlen(1);
        config.validate().unwrap_err();

        let config = ViewDataset3dConfig::new("data".into())
            .with_distance_filter(Some(-1.0));
        config.validate().unwrap_err();

        let config = ViewDataset3dConfig::new("data".into())
            .with_render_point_cloud(true);
        config.validate().unwrap_err();

        let config = ViewDataset3dConfig::new("data".into())
            .with_render_point_cloud(true)
            .with_load_3d(true);
        config.validate().unwrap();
    }

    #[test]
    fn renderer_library_path() {
        use super::*;

        let config = ViewDataset3dConfig::new("data".into());
        let path = config.renderer_library_path();
        assert!(path.starts_with("."), "{path:?}");

        let config = config.with_renderer_library(Some("/opt/render.so".into()));
        assert_eq!(config.renderer_library_path(), Path::new("/opt/render.so"));
    }

    #[test]
    fn cache_path() {
        use super::*;

        let config = FileListConfig::new("/data/places365/".into());
        assert_eq!(
            config.cache_path("image"),
            Path::new("places365_image_fofn1.json")
        );
        assert_ne!(config.cache_path("image"), config.cache_path("npz"));

        let config = config.with_train(false).with_cache_dir(Some("/tmp".into()));
        assert_eq!(
            config.cache_path("npz"),
            Path::new("/tmp/places365_npz_fofn0.json")
        );
    }
}
