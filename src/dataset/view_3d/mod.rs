//! Nearby panoramas of a scene with their relative poses.

pub mod sample;

pub use crate::{
    config::ViewDataset3dConfig,
    error::Error,
    index::{Neighbor, Neighborhood},
    render::{NativeRenderer, PointCloudRenderer},
    transform::{DepthTransform, ImageTransform, Transform},
};
pub use burn::data::dataset::Dataset;
pub use sample::*;

use crate::{
    index::build_index,
    pose::{load_camera_pose, relative_pose_in_consumer_frame, to_consumer_frame},
    scene::{list_scenes, split_count, split_scenes, SceneLayout, SweepScene},
    view::{load_mist, load_rgb},
};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::{fmt, path::PathBuf};

/// Samples of nearby panoramas with their relative poses.
pub struct ViewDataset3d {
    /// The options used to index the dataset.
    pub config: ViewDataset3dConfig,
    layout: SceneLayout,
    scenes: Vec<String>,
    sweeps: Vec<SweepScene>,
    neighborhoods: Vec<Neighborhood>,
    transform: Option<ImageTransform>,
    depth_transform: Option<DepthTransform>,
    renderer: Option<Box<dyn PointCloudRenderer>>,
}

/// An anchor viewpoint of a scene and its pose.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneViewpoint {
    /// The viewpoint uuid.
    pub uuid: String,
    /// The index of the sample anchored at the viewpoint.
    pub index: usize,
    /// In the consumer frame.
    pub pose: Pose,
}

impl ViewDataset3d {
    /// Indexing the dataset and loading the native renderer if needed.
    pub fn init(config: ViewDataset3dConfig) -> Result<Self, Error> {
        config.validate()?;

        let renderer = if config.render_point_cloud {
            let renderer = NativeRenderer::load(&config.renderer_library_path())?;
            Some(Box::new(renderer) as Box<dyn PointCloudRenderer>)
        } else {
            None
        };

        Self::init_with_renderer(config, renderer)
    }

    /// Indexing the dataset with the given renderer.
    pub fn init_with_renderer(
        config: ViewDataset3dConfig,
        renderer: Option<Box<dyn PointCloudRenderer>>,
    ) -> Result<Self, Error> {
        config.validate()?;
        if config.render_point_cloud && renderer.is_none() {
            return Err(Error::Config(
                "render_point_cloud requires a renderer".into(),
            ));
        }
        let renderer = renderer.filter(|_| config.render_point_cloud);

        let layout = SceneLayout::new(&config.root);
        let scenes = list_scenes(&layout)?;
        let count = scenes.len();
        let count_train = split_count(count, config.train_ratio);
        log::info!(
            target: "realenv_dataset::dataset::view_3d",
            "Total {count} scenes {count_train} train {} test",
            count - count_train,
        );

        let scenes = split_scenes(scenes, config.train, config.train_ratio);
        let scenes_loaded = if config.debug {
            &scenes[..config.debug_scene_count.min(scenes.len())]
        } else {
            &scenes[..]
        };

        let sweeps = scenes_loaded
            .par_iter()
            .map(|name| Ok((name.to_owned(), SweepScene::load(&layout, name)?)))
            .collect::<Result<dashmap::DashMap<_, _>, Error>>()?;
        let sweeps = scenes_loaded
            .iter()
            .filter_map(|name| sweeps.remove(name).map(|(_, sweep)| sweep))
            .filter(|sweep| !sweep.is_empty())
            .collect::<Vec<_>>();

        log::info!(target: "realenv_dataset::dataset::view_3d", "Indexing");
        let neighborhoods =
            build_index(&sweeps, config.seqlen, config.distance_filter);

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "realenv_dataset::dataset::view_3d",
            "ViewDataset3d::init_with_renderer",
        );

        Ok(Self {
            config,
            layout,
            scenes,
            sweeps,
            neighborhoods,
            transform: None,
            depth_transform: None,
            renderer,
        })
    }

    /// Applying to the source, target, normal and rendered images.
    pub fn with_transform(
        mut self,
        transform: ImageTransform,
    ) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Applying to the source, target and rendered depth maps.
    pub fn with_depth_transform(
        mut self,
        transform: DepthTransform,
    ) -> Self {
        self.depth_transform = Some(transform);
        self
    }

    /// The scenes of the split, including those without any neighborhood.
    #[inline]
    pub fn scenes(&self) -> &[String] {
        &self.scenes
    }

    /// The scenes loaded into the index.
    #[inline]
    pub fn sweeps(&self) -> &[SweepScene] {
        &self.sweeps
    }

    /// The neighborhoods of all loaded scenes, one per sample.
    #[inline]
    pub fn neighborhoods(&self) -> &[Neighborhood] {
        &self.neighborhoods
    }

    /// The asset paths under the root.
    #[inline]
    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// Loading the sample at `index`.
    pub fn load_sample(
        &self,
        index: usize,
    ) -> Result<ViewSample, Error> {
        let neighborhood =
            self.neighborhoods
                .get(index)
                .ok_or(Error::IndexOutOfBounds {
                    index,
                    len: self.neighborhoods.len(),
                })?;
        let scene = neighborhood.scene.as_str();
        let uuids = neighborhood.uuids().collect::<Vec<_>>();

        // Poses
        let poses = uuids
            .par_iter()
            .map(|uuid| load_camera_pose(&self.layout.points(scene, uuid)))
            .collect::<Result<Vec<_>, Error>>()?;
        let (target_pose, source_poses) = poses
            .split_first()
            .ok_or(Error::EmptyNeighborhood(index))?;
        let poses_relative = source_poses
            .iter()
            .map(|source_pose| {
                relative_pose_in_consumer_frame(target_pose, source_pose)
            })
            .collect::<Vec<_>>();

        // Images
        let (mut target, mut sources) = split_target(
            uuids
                .par_iter()
                .map(|uuid| load_rgb(&self.layout.rgb(scene, uuid)))
                .collect::<Result<Vec<_>, Error>>()?,
            index,
        )?;

        let geometry = if self.config.load_3d {
            let (mist_target, mist_sources) = split_target(
                uuids
                    .par_iter()
                    .map(|uuid| load_mist(&self.layout.mist(scene, uuid)))
                    .collect::<Result<Vec<_>, Error>>()?,
                index,
            )?;
            let (normal_target, normal_sources) = split_target(
                uuids
                    .par_iter()
                    .map(|uuid| load_rgb(&self.layout.normal(scene, uuid)))
                    .collect::<Result<Vec<_>, Error>>()?,
                index,
            )?;
            Some(ViewGeometry {
                mist_sources,
                mist_target,
                normal_sources,
                normal_target,
            })
        } else {
            None
        };

        // The renderer takes the first source before any transform
        let render_input = match (&self.renderer, &geometry) {
            (Some(_), Some(geometry)) => sources
                .first()
                .cloned()
                .zip(geometry.mist_sources.first().cloned()),
            _ => None,
        };

        // Transforms
        if let Some(transform) = &self.transform {
            sources = sources.into_iter().map(|s| transform.apply(s)).collect();
            target = transform.apply(target);
        }
        let geometry = geometry.map(|geometry| {
            let ViewGeometry {
                mut mist_sources,
                mut mist_target,
                mut normal_sources,
                mut normal_target,
            } = geometry;
            if let Some(transform) = &self.depth_transform {
                mist_sources =
                    mist_sources.into_iter().map(|m| transform.apply(m)).collect();
                mist_target = transform.apply(mist_target);
            }
            if let Some(transform) = &self.transform {
                normal_sources = normal_sources
                    .into_iter()
                    .map(|n| transform.apply(n))
                    .collect();
                normal_target = transform.apply(normal_target);
            }
            ViewGeometry {
                mist_sources,
                mist_target,
                normal_sources,
                normal_target,
            }
        });

        // Rendering
        let rendered = match (&self.renderer, render_input, poses_relative.first())
        {
            (Some(renderer), Some((image, depth)), Some(pose)) => {
                let mut rendered = renderer.render(&image, &depth, pose)?;
                if let Some(transform) = &self.transform {
                    rendered.image = transform.apply(rendered.image);
                }
                if let Some(transform) = &self.depth_transform {
                    rendered.depth = transform.apply(rendered.depth);
                }
                Some(rendered)
            },
            _ => None,
        };

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "realenv_dataset::dataset::view_3d",
            "ViewDataset3d::load_sample > {index}",
        );

        Ok(ViewSample {
            sources,
            target,
            poses_relative,
            geometry,
            rendered,
        })
    }

    /// The anchors of the scene at `index` with their poses.
    pub fn scene_info(
        &self,
        index: usize,
    ) -> Result<Vec<SceneViewpoint>, Error> {
        let scene = self.scenes.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.scenes.len(),
        })?;

        self.neighborhoods
            .iter()
            .enumerate()
            .filter(|(_, neighborhood)| &neighborhood.scene == scene)
            .filter_map(|(index, neighborhood)| {
                Some((index, neighborhood.anchor()?))
            })
            .map(|(index, anchor)| {
                let pose =
                    load_camera_pose(&self.layout.points(scene, &anchor.uuid))?;
                Ok(SceneViewpoint {
                    uuid: anchor.uuid.to_owned(),
                    index,
                    pose: to_consumer_frame(&pose),
                })
            })
            .collect()
    }

    /// The model mesh of the scene at `index`.
    pub fn model_obj_path(
        &self,
        index: usize,
    ) -> Result<PathBuf, Error> {
        self.scenes
            .get(index)
            .map(|scene| self.layout.model_obj(scene))
            .ok_or(Error::IndexOutOfBounds {
                index,
                len: self.scenes.len(),
            })
    }
}

impl Dataset<ViewSample> for ViewDataset3d {
    fn get(
        &self,
        index: usize,
    ) -> Option<ViewSample> {
        if index >= self.neighborhoods.len() {
            return None;
        }
        self.load_sample(index)
            .inspect_err(|error| {
                log::error!(
                    target: "realenv_dataset::dataset::view_3d",
                    "ViewDataset3d::get({index}) > {error}",
                )
            })
            .ok()
    }

    #[inline]
    fn len(&self) -> usize {
        self.neighborhoods.len()
    }
}

impl fmt::Debug for ViewDataset3d {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ViewDataset3d")
            .field("config", &self.config)
            .field("scenes.len()", &self.scenes.len())
            .field("sweeps.len()", &self.sweeps.len())
            .field("neighborhoods.len()", &self.neighborhoods.len())
            .field("transform.is_some()", &self.transform.is_some())
            .field("depth_transform.is_some()", &self.depth_transform.is_some())
            .field("renderer.is_some()", &self.renderer.is_some())
            .finish()
    }
}

/// Splitting into the first item and the rest.
fn split_target<T>(
    mut items: Vec<T>,
    index: usize,
) -> Result<(T, Vec<T>), Error> {
    if items.is_empty() {
        return Err(Error::EmptyNeighborhood(index));
    }
    let target = items.remove(0);
    Ok((target, items))
}
