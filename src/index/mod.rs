//! Neighborhoods of viewpoints by the distance between their positions.

pub use crate::scene::SweepScene;

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::fmt;

/// A viewpoint and its distance to the anchor of a [`Neighborhood`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Neighbor {
    /// The viewpoint uuid.
    pub uuid: String,
    /// The distance between the positions.
    pub distance: f64,
}

/// An anchor viewpoint followed by its nearest viewpoints in the same scene.
///
/// `neighbors[0]` is the anchor with a distance of `0`,
/// and the distances are non-decreasing.
#[derive(Clone, Default, PartialEq)]
pub struct Neighborhood {
    /// The scene of every viewpoint.
    pub scene: String,
    /// The anchor followed by the others.
    pub neighbors: Vec<Neighbor>,
}

impl Neighborhood {
    /// The target viewpoint.
    #[inline]
    pub fn anchor(&self) -> Option<&Neighbor> {
        self.neighbors.first()
    }

    /// The source viewpoints.
    #[inline]
    pub fn sources(&self) -> &[Neighbor] {
        self.neighbors.get(1..).unwrap_or_default()
    }

    /// The viewpoint uuids in order.
    pub fn uuids(&self) -> impl Iterator<Item = &str> {
        self.neighbors.iter().map(|neighbor| neighbor.uuid.as_str())
    }
}

impl fmt::Debug for Neighborhood {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Neighborhood")
            .field("scene", &self.scene)
            .field(
                "neighbors",
                &self
                    .neighbors
                    .iter()
                    .map(|n| (&n.uuid, n.distance))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Selecting the `seqlen`-view neighborhood of every viewpoint in the scene.
///
/// ## Details
///
/// The other viewpoints are sorted by distance in a stable manner,
/// so the ties keep their order in the scene.
/// A scene having fewer than `seqlen` viewpoints yields nothing.
/// With `distance_filter`, a neighborhood is kept only if
/// its nearest other viewpoint is closer than the filter.
pub fn select_neighborhoods(
    scene: &SweepScene,
    seqlen: usize,
    distance_filter: Option<f64>,
) -> Vec<Neighborhood> {
    let viewpoints = &scene.viewpoints;
    if seqlen == 0 || viewpoints.len() < seqlen {
        return vec![];
    }

    viewpoints
        .iter()
        .enumerate()
        .filter_map(|(anchor_index, anchor)| {
            let mut others = viewpoints
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != anchor_index)
                .map(|(_, other)| Neighbor {
                    uuid: other.uuid.to_owned(),
                    distance: anchor.distance(other),
                })
                .collect::<Vec<_>>();
            others.sort_by(|a, b| a.distance.total_cmp(&b.distance));

            if let Some(distance_filter) = distance_filter {
                let nearest = others.first()?;
                if nearest.distance >= distance_filter {
                    return None;
                }
            }

            let mut neighbors = Vec::with_capacity(seqlen);
            neighbors.push(Neighbor {
                uuid: anchor.uuid.to_owned(),
                distance: 0.0,
            });
            neighbors.extend(others.into_iter().take(seqlen - 1));

            Some(Neighborhood {
                scene: scene.name.to_owned(),
                neighbors,
            })
        })
        .collect()
}

/// Selecting the neighborhoods of all scenes in their order.
pub fn build_index(
    scenes: &[SweepScene],
    seqlen: usize,
    distance_filter: Option<f64>,
) -> Vec<Neighborhood> {
    let bar = ProgressBar::new(scenes.len() as u64).with_style(
        ProgressStyle::with_template(" [{elapsed_precise}] {wide_bar} ({eta}) ")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let neighborhoods = scenes
        .par_iter()
        .progress_with(bar.to_owned())
        .map(|scene| select_neighborhoods(scene, seqlen, distance_filter))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    bar.finish_and_clear();

    #[cfg(all(debug_assertions, not(test)))]
    log::debug!(
        target: "realenv_dataset::index",
        "build_index > {} neighborhoods",
        neighborhoods.len(),
    );

    neighborhoods
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Viewpoint;

    fn scene_on_x_axis(
        name: &str,
        xs: &[f64],
    ) -> SweepScene {
        SweepScene {
            name: name.into(),
            viewpoints: xs
                .iter()
                .enumerate()
                .map(|(i, x)| Viewpoint {
                    uuid: format!("v{i}"),
                    position: [*x, 0.0, 0.0],
                    quaternion: [1.0, 0.0, 0.0, 0.0],
                })
                .collect(),
        }
    }

    #[test]
    fn nearest_is_selected() {
        let scene = scene_on_x_axis("s", &[0.0, 1.0, 5.0]);
        let neighborhoods = select_neighborhoods(&scene, 2, None);
        assert_eq!(neighborhoods.len(), 3);

        let first = &neighborhoods[0];
        assert_eq!(first.scene, "s");
        assert_eq!(first.uuids().collect::<Vec<_>>(), ["v0", "v1"]);
        assert_eq!(first.neighbors[1].distance, 1.0);

        let last = &neighborhoods[2];
        assert_eq!(last.uuids().collect::<Vec<_>>(), ["v2", "v1"]);
        assert_eq!(last.neighbors[1].distance, 4.0);
    }

    #[test]
    fn distances_are_non_decreasing() {
        let scene = scene_on_x_axis("s", &[3.0, -1.0, 0.5, 8.0, 2.0, 2.5]);
        let neighborhoods = select_neighborhoods(&scene, 4, None);
        assert_eq!(neighborhoods.len(), 6);

        for neighborhood in neighborhoods {
            assert_eq!(neighborhood.neighbors.len(), 4);
            assert_eq!(neighborhood.anchor().unwrap().distance, 0.0);
            assert_eq!(neighborhood.sources().len(), 3);
            neighborhood.neighbors.windows(2).for_each(|pair| {
                assert!(pair[0].distance <= pair[1].distance, "{neighborhood:?}");
            });
        }
    }

    #[test]
    fn small_scene_is_excluded() {
        let scene = scene_on_x_axis("s", &[0.0, 1.0]);
        assert!(select_neighborhoods(&scene, 3, None).is_empty());
        assert_eq!(select_neighborhoods(&scene, 2, None).len(), 2);
    }

    #[test]
    fn distance_filter() {
        let scene = scene_on_x_axis("s", &[0.0, 0.5, 5.0]);

        let neighborhoods = select_neighborhoods(&scene, 2, Some(0.8));
        let anchors = neighborhoods
            .iter()
            .map(|n| n.anchor().unwrap().uuid.as_str())
            .collect::<Vec<_>>();
        assert_eq!(anchors, ["v0", "v1"]);

        // Strictly below the filter
        let neighborhoods = select_neighborhoods(&scene, 2, Some(0.5));
        assert!(neighborhoods.is_empty(), "{neighborhoods:?}");
    }

    #[test]
    fn ties_keep_scene_order() {
        let scene = scene_on_x_axis("s", &[0.0, -1.0, 1.0]);
        let neighborhoods = select_neighborhoods(&scene, 3, None);
        assert_eq!(
            neighborhoods[0].uuids().collect::<Vec<_>>(),
            ["v0", "v1", "v2"]
        );
    }

    #[test]
    fn build_index_in_scene_order() {
        let scenes = [
            scene_on_x_axis("a", &[0.0, 1.0, 5.0]),
            scene_on_x_axis("b", &[0.0]),
            scene_on_x_axis("c", &[0.0, 2.0]),
        ];
        let neighborhoods = build_index(&scenes, 2, None);
        let names = neighborhoods
            .iter()
            .map(|n| n.scene.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["a", "a", "a", "c", "c"]);
    }
}
