//! Source and target image pairs stored as `.npz` archives.

pub use crate::{
    config::FileListConfig,
    error::Error,
    transform::{ImageTransform, Transform},
    view::{DepthMap, RgbImage},
};
pub use burn::data::dataset::Dataset;

use crate::dataset::file_list::load_or_list_files;
use ndarray::{Array, Array2, Array3, Dimension};
use ndarray_npy::{NpzReader, ReadableElement};
use std::{
    fmt, fs,
    io::{Read, Seek},
    path::{Path, PathBuf},
};

/// The height of the placeholders of an incomplete archive.
pub const PLACEHOLDER_HEIGHT: u32 = 1024;

/// The width of the placeholders of an incomplete archive.
pub const PLACEHOLDER_WIDTH: u32 = 2048;

/// Image pairs with the source depth, stored as `.npz` archives.
pub struct PairDataset {
    /// The options used to list the archives.
    pub config: FileListConfig,
    files: Vec<PathBuf>,
    transform: Option<ImageTransform>,
}

/// The arrays of an archive.
#[derive(Clone, PartialEq)]
pub struct PairSample {
    /// `[H, W, 3]`
    pub source: RgbImage,
    /// `[H, W]`
    pub depth: DepthMap,
    /// `[H, W, 3]`
    pub target: RgbImage,
}

impl PairDataset {
    /// Listing the archives, or reusing the cached list.
    pub fn init(config: FileListConfig) -> Result<Self, Error> {
        let files = load_or_list_files(&config, "npz", is_npz_file)?;

        log::info!(
            target: "realenv_dataset::dataset::pair",
            "Total {} archives",
            files.len(),
        );

        Ok(Self {
            config,
            files,
            transform: None,
        })
    }

    /// Applying to the source and target images.
    pub fn with_transform(
        mut self,
        transform: ImageTransform,
    ) -> Self {
        self.transform = Some(transform);
        self
    }

    /// The archives in the split.
    #[inline]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Loading the archive at `index`.
    ///
    /// ## Details
    ///
    /// An archive missing any of `source`, `depth` or `target` yields
    /// zeroed placeholders.
    pub fn load_sample(
        &self,
        index: usize,
    ) -> Result<PairSample, Error> {
        let path = self.files.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.files.len(),
        })?;
        let mut archive = NpzReader::new(fs::File::open(path)?)?;

        let sample = read_pair(&mut archive).unwrap_or_else(|error| {
            log::warn!(
                target: "realenv_dataset::dataset::pair",
                "PairDataset::load_sample({index}) > {path:?} > {error}",
            );
            PairSample::placeholder()
        });

        Ok(match &self.transform {
            Some(transform) => {
                let PairSample {
                    source,
                    depth,
                    target,
                } = sample;
                PairSample {
                    source: transform.apply(source),
                    depth,
                    target: transform.apply(target),
                }
            },
            None => sample,
        })
    }
}

impl PairSample {
    /// Zeroed images and depth map of 1024x2048.
    pub fn placeholder() -> Self {
        Self {
            source: RgbImage::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT),
            depth: DepthMap::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT),
            target: RgbImage::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT),
        }
    }
}

/// Checking the `.npz` extension.
#[inline]
pub fn is_npz_file(path: &Path) -> bool {
    path.extension().is_some_and(|extension| extension == "npz")
}

fn read_pair<R: Read + Seek>(
    archive: &mut NpzReader<R>
) -> Result<PairSample, Error> {
    let source = rgb_from_array(read_array(archive, "source")?)?;
    let depth = read_array::<_, _, f32>(archive, "depth")
        .map(depth_from_array)
        .or_else(|_| {
            read_array::<_, _, f64>(archive, "depth")
                .map(|depth| depth_from_array(depth.mapv(|v| v as f32)))
        })??;
    let target = rgb_from_array(read_array(archive, "target")?)?;

    Ok(PairSample {
        source,
        depth,
        target,
    })
}

/// Reading the array by its name with or without the `.npy` suffix.
fn read_array<R, D, T>(
    archive: &mut NpzReader<R>,
    name: &str,
) -> Result<Array<T, D>, Error>
where
    R: Read + Seek,
    D: Dimension,
    T: ReadableElement,
{
    Ok(archive
        .by_name(name)
        .or_else(|_| archive.by_name(&format!("{name}.npy")))?)
}

fn rgb_from_array(array: Array3<u8>) -> Result<RgbImage, Error> {
    let (height, width, channels) = array.dim();
    if channels != 3 {
        return Err(Error::MismatchedBufferSize {
            expected: height * width * 3,
            found: array.len(),
        });
    }

    let values = array.iter().copied().collect::<Vec<_>>();
    let found = values.len();
    RgbImage::from_raw(width as u32, height as u32, values).ok_or(
        Error::MismatchedBufferSize {
            expected: height * width * 3,
            found,
        },
    )
}

fn depth_from_array(array: Array2<f32>) -> Result<DepthMap, Error> {
    let (height, width) = array.dim();
    let values = array.iter().copied().collect::<Vec<_>>();
    let found = values.len();
    DepthMap::from_raw(width as u32, height as u32, values).ok_or(
        Error::MismatchedBufferSize {
            expected: height * width,
            found,
        },
    )
}

impl Dataset<PairSample> for PairDataset {
    fn get(
        &self,
        index: usize,
    ) -> Option<PairSample> {
        if index >= self.len() {
            return None;
        }

        self.load_sample(index)
            .inspect_err(|error| {
                log::error!(
                    target: "realenv_dataset::dataset::pair",
                    "PairDataset::get({index}) > {error}",
                )
            })
            .ok()
    }

    #[inline]
    fn len(&self) -> usize {
        self.files.len()
    }
}

impl fmt::Debug for PairDataset {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("PairDataset")
            .field("config", &self.config)
            .field("files.len()", &self.files.len())
            .field("transform.is_some()", &self.transform.is_some())
            .finish()
    }
}

impl fmt::Debug for PairSample {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("PairSample")
            .field("source.dimensions()", &self.source.dimensions())
            .field("depth.dimensions()", &self.depth.dimensions())
            .field("target.dimensions()", &self.target.dimensions())
            .finish()
    }
}
