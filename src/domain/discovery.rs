use super::{FolderLayout, ReviewSession};
use crate::error::{ApproveError, Result};
use chrono::{DateTime, Utc};
use image::ImageReader;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An image found directly in the selected folder
#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub modified_date: DateTime<Utc>,
}

impl ImageEntry {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let modified_date: DateTime<Utc> = metadata.modified()?.into();

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "non UTF-8 file name"))?
            .to_string();

        Ok(ImageEntry {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            modified_date,
        })
    }
}

/// Options for image discovery
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Include files whose names start with '.'
    pub show_hidden: bool,
    pub sort_by: SortBy,
    pub reverse: bool,
}

/// Order in which images enter the review queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Case-insensitive file name
    #[default]
    Name,
    /// Modification date, oldest first
    Date,
    /// File size, smallest first
    Size,
}

/// What a folder selection hands to a new session
#[derive(Debug, Clone)]
pub struct Discovery {
    pub layout: FolderLayout,
    pub items: Vec<String>,
}

/// Checks that the file header identifies an image format the decoder supports.
/// Only the header is read, not the pixel data.
pub fn is_decodable_image(path: &Path) -> bool {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .ok()
        .and_then(|reader| reader.into_dimensions().ok())
        .is_some()
}

/// Scans `root` for images and prepares the destination folders.
///
/// # Behavior
/// - Creates `approved/` and `disapproved/` under `root` if missing
/// - Does not recurse; subdirectories (including the destinations) are skipped
/// - Skips hidden files unless `show_hidden` is set
/// - Skips files that do not decode as images and names that are not UTF-8
/// - Unreadable entries are skipped rather than failing the scan
pub fn discover_images(root: &Path, options: &DiscoveryOptions) -> Result<Discovery> {
    let root = fs::canonicalize(root)?;
    let layout = FolderLayout::for_root(&root);
    layout.ensure_destinations()?;

    let mut images = Vec::new();

    for entry_result in fs::read_dir(&root)? {
        let entry = match entry_result {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };

        if !options.show_hidden && file_name.starts_with('.') {
            continue;
        }

        match fs::metadata(&path) {
            Ok(m) if m.is_file() => {}
            _ => continue,
        }

        if !is_decodable_image(&path) {
            debug!(file = file_name, "skipping non-image file");
            continue;
        }

        if let Ok(image) = ImageEntry::from_path(&path) {
            images.push(image);
        }
    }

    match options.sort_by {
        SortBy::Name => images.sort_by_key(|i| i.name.to_lowercase()),
        SortBy::Date => images.sort_by(|a, b| a.modified_date.cmp(&b.modified_date)),
        SortBy::Size => images.sort_by_key(|i| i.size),
    }

    if options.reverse {
        images.reverse();
    }

    info!(folder = %root.display(), found = images.len(), "image discovery finished");

    Ok(Discovery {
        layout,
        items: images.into_iter().map(|i| i.name).collect(),
    })
}

/// Selects a folder: discovers its images and starts a fresh session over them.
///
/// Fails with `NoImagesFound` when the folder holds no reviewable images.
pub fn open_session(
    root: &Path,
    options: &DiscoveryOptions,
    history_depth: usize,
) -> Result<ReviewSession> {
    let discovery = discover_images(root, options)?;
    if discovery.items.is_empty() {
        return Err(ApproveError::NoImagesFound(discovery.layout.original));
    }
    ReviewSession::new(discovery.items, discovery.layout, history_depth)
}
