//! File lists of the legacy datasets, cached on disk.

pub use crate::config::FileListConfig;

use crate::error::Error;
use std::{
    fs,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Loading the cached file list, or listing the files and caching them.
///
/// `kind` names the files kept by `filter` and tells the caches apart.
pub fn load_or_list_files(
    config: &FileListConfig,
    kind: &str,
    filter: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>, Error> {
    let cache_path = config.cache_path(kind);
    if cache_path.is_file() {
        let reader = BufReader::new(fs::File::open(&cache_path)?);
        let files = serde_json::from_reader(reader)?;

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "realenv_dataset::dataset::file_list",
            "load_or_list_files > {cache_path:?}",
        );

        return Ok(files);
    }

    let files = list_files(&config.root, config.train, filter)?;
    let writer = BufWriter::new(fs::File::create(&cache_path)?);
    serde_json::to_writer(writer, &files)?;

    log::info!(
        target: "realenv_dataset::dataset::file_list",
        "Cached {} files at {cache_path:?}",
        files.len(),
    );

    Ok(files)
}

/// Listing the files of every directory under the root.
///
/// ## Details
///
/// Each directory contributes its first `len / 10 * 9` files to the train split
/// and the others to the test split. The split is taken before filtering.
pub fn list_files(
    root: &Path,
    train: bool,
    filter: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>, Error> {
    let mut files = vec![];

    for directory in WalkDir::new(root).sort_by_file_name() {
        let directory = directory?;
        if !directory.file_type().is_dir() {
            continue;
        }

        log::debug!(
            target: "realenv_dataset::dataset::file_list",
            "{:?}",
            directory.path(),
        );

        let mut directory_files = WalkDir::new(directory.path())
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| Ok(entry?))
            .filter(|entry: &Result<walkdir::DirEntry, Error>| {
                entry.as_ref().map_or(true, |entry| !entry.file_type().is_dir())
            })
            .map(|entry| entry.map(walkdir::DirEntry::into_path))
            .collect::<Result<Vec<_>, Error>>()?;

        let count_train = directory_files.len() / 10 * 9;
        let directory_files = if train {
            directory_files.truncate(count_train);
            directory_files
        } else {
            directory_files.split_off(count_train)
        };

        files.extend(directory_files.into_iter().filter(|path| filter(path)));
    }

    Ok(files)
}
