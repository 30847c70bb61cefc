//! The crop-and-rename batch job.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use log::{info, warn};
use stroke_fit_core::GrayRasterView;

use crate::segment::{dark_foreground_mask, largest_region, otsu_threshold};

const REG_SUBDIR: &str = "reg_stroke";
const STYLE_SUBDIR: &str = "style_stroke";

/// Parameters of the dataset normalization batch job.
#[derive(Clone, Debug)]
pub struct NormalizeParams {
    /// Raw capture tree: `<raw>/<char>/{reg_stroke,style_stroke}/`.
    pub raw_dir: PathBuf,
    /// Output tree: `<out>/<base64(char)>/s{0|1}_<idx>_{crop,full}.png`.
    pub out_dir: PathBuf,
    /// Margin in pixels added around the stroke bounding box.
    pub margin: u32,
    /// Filename prefix of raw stroke captures (`<prefix><idx>.jpg`).
    pub file_prefix: String,
}

impl NormalizeParams {
    pub fn new(raw_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            out_dir: out_dir.into(),
            margin: 5,
            file_prefix: "tmp1_".to_string(),
        }
    }
}

/// Counters reported by [`normalize_dataset`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Character directories with both stroke sequences present.
    pub characters: usize,
    /// Stroke pairs fully written (4 files each).
    pub pairs_written: usize,
    /// Entries skipped as malformed or corrupted.
    pub skipped: usize,
}

#[derive(thiserror::Error, Debug)]
pub enum NormalizeError {
    #[error("raw directory {0} does not exist")]
    MissingRawDir(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Run the batch job over the whole raw tree.
///
/// Malformed entries (missing stroke subdirectories, unparsable or
/// mismatched stroke indices, images without a stroke foreground) are
/// logged, counted and skipped; only I/O and decoding failures on data we
/// actually committed to write abort the batch.
pub fn normalize_dataset(params: &NormalizeParams) -> Result<NormalizeReport, NormalizeError> {
    if !params.raw_dir.is_dir() {
        return Err(NormalizeError::MissingRawDir(params.raw_dir.clone()));
    }
    fs::create_dir_all(&params.out_dir)?;

    let mut char_dirs: Vec<PathBuf> = fs::read_dir(&params.raw_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    char_dirs.sort();

    let mut report = NormalizeReport::default();
    for char_dir in char_dirs {
        let Some(name) = char_dir.file_name().and_then(|n| n.to_str()) else {
            warn!("skipping undecodable entry {}", char_dir.display());
            report.skipped += 1;
            continue;
        };
        if !char_dir.is_dir() {
            info!("skipping file {name}");
            report.skipped += 1;
            continue;
        }

        let reg_dir = char_dir.join(REG_SUBDIR);
        let style_dir = char_dir.join(STYLE_SUBDIR);
        if !reg_dir.is_dir() || !style_dir.is_dir() {
            warn!("corrupted capture {name}: missing stroke subdirectories");
            report.skipped += 1;
            continue;
        }
        report.characters += 1;

        let reg_files = stroke_files(&reg_dir, &params.file_prefix)?;
        let style_files = stroke_files(&style_dir, &params.file_prefix)?;
        let char_out = params.out_dir.join(URL_SAFE.encode(name.as_bytes()));

        for (reg_file, style_file) in reg_files.iter().zip(style_files.iter()) {
            let indices = (
                stroke_index(reg_file, &params.file_prefix),
                stroke_index(style_file, &params.file_prefix),
            );
            let (Some(reg_idx), Some(style_idx)) = indices else {
                warn!("corrupted capture {name}: unparsable stroke filename");
                report.skipped += 1;
                continue;
            };
            if reg_idx != style_idx {
                warn!("corrupted capture {name}: stroke indices {reg_idx} and {style_idx} differ");
                report.skipped += 1;
                continue;
            }

            fs::create_dir_all(&char_out)?;
            let mut complete = true;
            for (slot, file) in [(0usize, reg_file), (1usize, style_file)] {
                complete &= write_stroke(file, &char_out, slot, reg_idx, params.margin)?;
            }
            if complete {
                report.pairs_written += 1;
            } else {
                report.skipped += 1;
            }
        }
    }

    info!(
        "normalized {} stroke pairs from {} characters ({} skipped)",
        report.pairs_written, report.characters, report.skipped
    );
    Ok(report)
}

/// Stroke capture files in `dir` matching `<prefix>*.jpg`, sorted by name.
fn stroke_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, NormalizeError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix) && n.ends_with(".jpg"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Stroke index parsed from `<prefix><idx>.jpg`.
fn stroke_index(path: &Path, prefix: &str) -> Option<u32> {
    path.file_name()?
        .to_str()?
        .strip_prefix(prefix)?
        .strip_suffix(".jpg")?
        .parse()
        .ok()
}

/// Crop one stroke photo to its foreground and write the crop/full pair.
///
/// Returns `Ok(false)` when the photo has no usable stroke foreground.
fn write_stroke(
    src: &Path,
    out_dir: &Path,
    slot: usize,
    index: u32,
    margin: u32,
) -> Result<bool, NormalizeError> {
    let original = image::open(src)?;
    let gray = original.to_luma8();
    let view = GrayRasterView {
        width: gray.width() as usize,
        height: gray.height() as usize,
        data: gray.as_raw(),
    };

    let threshold = otsu_threshold(&view);
    let mask = dark_foreground_mask(&view, threshold);
    let Some(bbox) = largest_region(&mask, view.width, view.height) else {
        warn!("no stroke foreground in {}", src.display());
        return Ok(false);
    };
    let bbox = bbox.expanded(margin, gray.width(), gray.height());
    if bbox.width == 0 || bbox.height == 0 {
        warn!("empty crop for {}", src.display());
        return Ok(false);
    }

    let crop = image::imageops::crop_imm(&gray, bbox.x, bbox.y, bbox.width, bbox.height).to_image();
    crop.save(out_dir.join(format!("s{slot}_{index}_crop.png")))?;
    original.save(out_dir.join(format!("s{slot}_{index}_full.png")))?;
    Ok(true)
}
