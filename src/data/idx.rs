use std::path::Path;

use log::info;

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};

/// Parse a pair of IDX binary files (image + label) as used by MNIST into a
/// `Dataset` whose inputs are flattened pixels scaled to `[0, 1]` and whose
/// labels are one-hot rows of width `n_classes`.
///
/// # IDX3 image file layout
/// ```text
/// bytes  0-1:   0x00 0x00   (reserved, must be zero)
/// byte   2:     0x08        (dtype = uint8)
/// byte   3:     0x03        (number of dimensions = 3)
/// bytes  4-7:   N           (number of images, big-endian u32)
/// bytes  8-11:  rows        (image height in pixels, big-endian u32)
/// bytes 12-15:  cols        (image width in pixels, big-endian u32)
/// bytes 16..:   N * rows * cols bytes, row-major, uint8
/// ```
///
/// # IDX1 label file layout
/// ```text
/// bytes  0-1:   0x00 0x00   (reserved, must be zero)
/// byte   2:     0x08        (dtype = uint8)
/// byte   3:     0x01        (number of dimensions = 1)
/// bytes  4-7:   N           (number of labels, big-endian u32)
/// bytes  8..:   N bytes, each a class index in [0, n_classes)
/// ```
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8], n_classes: usize) -> Result<Dataset> {
    check_header(image_bytes, 16, 0x03, "image")?;
    check_header(label_bytes, 8, 0x01, "label")?;

    let n_items = read_u32(image_bytes, 4);
    let rows = read_u32(image_bytes, 8);
    let cols = read_u32(image_bytes, 12);

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
        NnError::Data(format!("IDX image file: rows * cols overflows (rows={}, cols={})", rows, cols))
    })?;
    let required_image_len = n_items.checked_mul(n_pixels)
        .and_then(|n| n.checked_add(16))
        .ok_or_else(|| NnError::Data("IDX image file: data length overflows".into()))?;
    if image_bytes.len() < required_image_len {
        return Err(NnError::Data(format!(
            "IDX image file too short: header declares {} items of {}x{} pixels, \
             but file is only {} bytes",
            n_items, rows, cols, image_bytes.len()
        )));
    }

    let label_count = read_u32(label_bytes, 4);
    if label_count != n_items {
        return Err(NnError::Data(format!(
            "IDX file mismatch: image file declares {} items but label file declares {}",
            n_items, label_count
        )));
    }
    if label_bytes.len() < 8 + n_items {
        return Err(NnError::Data(format!(
            "IDX label file too short: header declares {} labels but file is only {} bytes",
            n_items, label_bytes.len()
        )));
    }
    if n_items == 0 || n_pixels == 0 {
        return Err(NnError::Data("IDX files contain no samples".into()));
    }

    let inputs: Vec<Vec<f64>> = image_bytes[16..required_image_len]
        .chunks_exact(n_pixels)
        .map(|chunk| chunk.iter().map(|&px| px as f64 / 255.0).collect())
        .collect();
    let classes: Vec<usize> = label_bytes[8..8 + n_items].iter().map(|&c| c as usize).collect();

    Dataset::from_classes(inputs, &classes, n_classes)
}

fn check_header(bytes: &[u8], header_len: usize, dims: u8, kind: &str) -> Result<()> {
    if bytes.len() < header_len {
        return Err(NnError::Data(format!(
            "IDX {} file too short: expected at least {} header bytes, got {}",
            kind, header_len, bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(NnError::Data(format!(
            "IDX {} file: bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}",
            kind, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(NnError::Data(format!(
            "IDX {} file: dtype byte must be 0x08 (uint8), got 0x{:02X}",
            kind, bytes[2]
        )));
    }
    if bytes[3] != dims {
        return Err(NnError::Data(format!(
            "IDX {} file: expected {} dimensions, got {}",
            kind, dims, bytes[3]
        )));
    }
    Ok(())
}

fn read_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

/// Loads the four standard MNIST files from `dir` as `(train, test)`.
pub fn load_mnist_2d(dir: impl AsRef<Path>) -> Result<(Dataset, Dataset)> {
    let dir = dir.as_ref();
    let read = |name: &str| -> Result<Vec<u8>> {
        std::fs::read(dir.join(name)).map_err(|e| {
            NnError::Data(format!("cannot read {}: {}", dir.join(name).display(), e))
        })
    };

    let train = parse_idx_pair(
        &read("train-images-idx3-ubyte")?,
        &read("train-labels-idx1-ubyte")?,
        10,
    )?;
    let test = parse_idx_pair(
        &read("t10k-images-idx3-ubyte")?,
        &read("t10k-labels-idx1-ubyte")?,
        10,
    )?;
    info!("loaded MNIST from {}: {} train / {} test samples", dir.display(), train.len(), test.len());
    Ok((train, test))
}

/// Encodes a dataset of `u8` images as an IDX3/IDX1 byte pair.
pub fn encode_idx_pair(images: &[Vec<u8>], rows: usize, cols: usize, classes: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut image_bytes = vec![0x00, 0x00, 0x08, 0x03];
    for n in [images.len(), rows, cols] {
        image_bytes.extend_from_slice(&(n as u32).to_be_bytes());
    }
    for image in images {
        image_bytes.extend_from_slice(image);
    }

    let mut label_bytes = vec![0x00, 0x00, 0x08, 0x01];
    label_bytes.extend_from_slice(&(classes.len() as u32).to_be_bytes());
    label_bytes.extend_from_slice(classes);

    (image_bytes, label_bytes)
}
