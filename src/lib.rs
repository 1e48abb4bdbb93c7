//! BFB (BlueField boot stream) — unpacker for firmware boot containers.
//!
//! This crate provides:
//! - **Format types** (`format`): sub-image header layout, BFB_IMGHDR_MAGIC, alignment helpers.
//! - **Image registry** (`registry`): the image_id → name table and `image_name` / `image_id` lookups.
//! - **Reader** (`reader`): `BfbReader` walks a container buffer; `unpack(buf)` is the all-or-nothing form.
//! - **Sink** (`sink`): `extract_all` writes each image to `image_<name>` in an output directory.
//! - **Manifest** (`manifest`): `describe(buf)` lists images with header fields and SHA-256.
//! - **Source** (`source`): `BfbSource::open(path)` maps a container file read-only.
//! - **Config** (`config`, feature `serde`): TOML defaults for the `bfb-unpack` binary.

#[cfg(feature = "serde")]
pub mod config;
pub mod format;
pub mod manifest;
pub mod reader;
pub mod registry;
pub mod sink;
pub mod source;

#[cfg(feature = "serde")]
pub use config::{Config, ConfigError, UnpackOverrides};
pub use format::{padding_for, BfbHeader, BFB_ALIGN, BFB_HEADER_LEN, BFB_HEADER_MIN_LEN, BFB_IMGHDR_MAGIC};
pub use manifest::{describe, ImageInfo};
pub use reader::{unpack, BfbError, BfbReader, Extraction};
pub use registry::{image_id, image_name, ImageType, IMAGE_TYPES};
pub use sink::{extract_all, DuplicatePolicy, ExtractOptions, WrittenImage, DEFAULT_PREFIX};
pub use source::BfbSource;
