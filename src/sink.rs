//! Write extracted images to files, one artifact per sub-image.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::reader::{unpack, BfbError, Extraction};

/// Default artifact prefix; images are written as `image_<name>`.
pub const DEFAULT_PREFIX: &str = "image_";

/// What to do when two records resolve to the same artifact name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DuplicatePolicy {
    /// Later records replace earlier ones.
    #[default]
    Overwrite,
    /// Repeats are written as `<artifact>.1`, `<artifact>.2`, ...
    Suffix,
}

/// Options for extracting a container to a directory.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Directory the artifacts are created in.
    pub output_dir: PathBuf,
    /// Prefix prepended to every image name.
    pub prefix: String,
    pub duplicates: DuplicatePolicy,
    /// If non-empty, only images with these names are written.
    pub only: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            prefix: DEFAULT_PREFIX.to_string(),
            duplicates: DuplicatePolicy::Overwrite,
            only: Vec::new(),
        }
    }
}

/// An artifact written by [`extract_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenImage {
    pub name: &'static str,
    pub path: PathBuf,
    pub len: usize,
}

/// Assigns artifact file names to extractions according to a [`DuplicatePolicy`].
#[derive(Debug, Default)]
struct ArtifactNamer {
    seen: HashMap<String, usize>,
}

impl ArtifactNamer {
    fn name(&mut self, base: String, policy: DuplicatePolicy) -> String {
        let count = self.seen.entry(base.clone()).or_insert(0);
        let repeat = *count;
        *count += 1;
        match (repeat, policy) {
            (0, _) => base,
            (_, DuplicatePolicy::Overwrite) => {
                warn!("{base} appears {} times in the container; keeping the last", repeat + 1);
                base
            }
            (n, DuplicatePolicy::Suffix) => format!("{base}.{n}"),
        }
    }
}

/// Validate the whole container, then write each selected image to
/// `output_dir/<prefix><name>`.
///
/// Nothing is written if the container is malformed. Files are created or
/// truncated.
pub fn extract_all(buf: &[u8], options: &ExtractOptions) -> Result<Vec<WrittenImage>, BfbError> {
    let extractions = unpack(buf)?;
    let only: HashSet<&str> = options.only.iter().map(String::as_str).collect();

    let mut namer = ArtifactNamer::default();
    let mut written = Vec::with_capacity(extractions.len());
    for x in extractions.iter().filter(|x| only.is_empty() || only.contains(x.name)) {
        let file_name = namer.name(format!("{}{}", options.prefix, x.name), options.duplicates);
        let path = options.output_dir.join(file_name);
        write_image(&path, x)?;
        info!("wrote {} ({} bytes)", path.display(), x.payload.len());
        written.push(WrittenImage {
            name: x.name,
            path,
            len: x.payload.len(),
        });
    }
    Ok(written)
}

fn write_image(path: &Path, extraction: &Extraction<'_>) -> Result<(), BfbError> {
    let file_err = |source| BfbError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut out = File::create(path).map_err(file_err)?;
    out.write_all(extraction.payload).map_err(file_err)?;
    out.flush().map_err(file_err)?;
    Ok(())
}
