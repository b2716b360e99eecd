use clap::{Parser, ValueEnum};
use realenv_dataset::{
    config::{FileListConfig, ViewDataset3dConfig},
    dataset::{Dataset, PairDataset, Places365Dataset, ViewDataset3d},
    error::Error,
};
use std::path::PathBuf;

/// Loading a sample from a panorama dataset.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The dataset type.
    #[arg(long, value_enum)]
    dataset: DatasetKind,

    /// The path to the dataset.
    #[arg(long)]
    dataroot: PathBuf,

    /// Loading only the first scenes.
    #[arg(long)]
    debug: bool,

    /// The native renderer library. Rendering is enabled if present.
    #[arg(long)]
    renderer: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DatasetKind {
    #[value(name = "view3d")]
    View3d,
    Places365,
    Pair,
}

fn main() {
    env_logger::init();

    if let Err(error) = run(Args::parse()) {
        log::error!(target: "realenv_dataset", "{error}");
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    match args.dataset {
        DatasetKind::View3d => {
            let config = ViewDataset3dConfig::new(args.dataroot)
                .with_debug(args.debug)
                .with_seqlen(2)
                .with_distance_filter(Some(0.8))
                .with_load_3d(true)
                .with_render_point_cloud(args.renderer.is_some())
                .with_renderer_library(args.renderer);
            let dataset = ViewDataset3d::init(config)?;
            println!("{}", dataset.len());

            let sample = dataset.load_sample(sample_index(dataset.len()))?;
            println!("{sample:?}");
            println!("3d test passed");

            let viewpoints = dataset.scene_info(0)?;
            println!("{viewpoints:?}");
        },
        DatasetKind::Places365 => {
            let dataset = Places365Dataset::init(FileListConfig::new(args.dataroot))?;
            println!("{}", dataset.len());

            let sample = dataset.load_sample(0)?;
            println!("{:?}", sample.dimensions());
            println!("places 365 test passed");
        },
        DatasetKind::Pair => {
            let dataset = PairDataset::init(FileListConfig::new(args.dataroot))?;
            println!("{}", dataset.len());

            let sample = dataset.load_sample(0)?;
            println!("{sample:?}");
            println!("pair test passed");
        },
    }

    Ok(())
}

/// The second sample, or the first one if it is the only one.
fn sample_index(len: usize) -> usize {
    if len == 1 {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path};

    /// Writing a scene whose viewpoints have poses but no panoramas.
    fn write_scene_without_panoramas(root: &Path) {
        let points = root.join("s0/pano/points");
        fs::create_dir_all(&points).unwrap();
        fs::write(
            root.join("s0/sweep_locations.csv"),
            "v0,0,0,0,1,0,0,0\nv1,0.5,0,0,1,0,0,0\n",
        )
        .unwrap();
        for uuid in ["v0", "v1"] {
            fs::write(
                points.join(format!("point_{uuid}.json")),
                r#"[
                    {"camera_rt_matrix": [[1,0,0,0],[0,1,0,0],[0,0,1,0]]},
                    {"camera_rt_matrix": [[1,0,0,0],[0,1,0,0],[0,0,1,0]]}
                ]"#,
            )
            .unwrap();
        }
    }

    #[test]
    fn run_view_3d_fails_on_missing_panorama() {
        let root = tempfile::tempdir().unwrap();
        write_scene_without_panoramas(root.path());

        let args = Args {
            dataset: DatasetKind::View3d,
            dataroot: root.path().to_owned(),
            debug: false,
            renderer: None,
        };
        let error = run(args).unwrap_err();
        assert!(matches!(error, Error::Image(_)), "{error:?}");
    }

    #[test]
    fn sample_index_of_single_sample() {
        assert_eq!(sample_index(1), 0);
        assert_eq!(sample_index(2), 1);
        assert_eq!(sample_index(0), 1);
    }
}
