use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::tags::TagError;
use crate::xdf::locate::locate_metadata;
use crate::xdf::splice::splice_metadata;
use crate::xdf::XdfError;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    Xdf(#[from] XdfError),
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error("output file already exists: {}. Use --overwrite to force-overwrite existing files", .0.display())]
    OutputExists(PathBuf),
}

/// Derive the suffixed output path for an input path: the suffix goes
/// in front of a trailing `.xdf`, or at the very end for other names.
pub fn suffixed_path(inpath: &Path, suffix: &str) -> PathBuf {
    match inpath
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(".xdf"))
    {
        Some(stem) => inpath.with_file_name(format!("{stem}{suffix}.xdf")),
        None => {
            let mut name = inpath.as_os_str().to_owned();
            name.push(suffix);
            PathBuf::from(name)
        }
    }
}

/// Run the locate-transform-splice pipeline on one file.
///
/// The transform is handed the located metadata content exactly once;
/// returning it unchanged selects the verbatim-copy fast path. With no
/// output path (a non-modifying run) processing stops after the
/// transform. Output is written to a temp file next to the destination
/// and only promoted by rename once it is complete, so the input stays
/// intact across any failure.
pub fn process_file<F>(
    inpath: &Path,
    outpath: Option<&Path>,
    overwrite: bool,
    transform: F,
) -> Result<(), ProcessError>
where
    F: FnOnce(&str) -> Result<String, TagError>,
{
    info!("Processing file {}...", inpath.display());

    if let Some(outpath) = outpath {
        // In-place runs overwrite by definition.
        if !overwrite && outpath != inpath && outpath.exists() {
            return Err(ProcessError::OutputExists(outpath.to_path_buf()));
        }
    }

    let file = File::open(inpath)?;
    let in_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let location = locate_metadata(&mut reader, inpath)?;
    let new_content = transform(&location.content)?;

    let outpath = match outpath {
        Some(outpath) => outpath,
        None => return Ok(()),
    };

    let dir = match outpath.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        splice_metadata(&mut reader, &mut writer, in_size, &location, &new_content)?;
        writer.flush()?;
    }
    tmp.persist(outpath).map_err(|err| err.error)?;
    Ok(())
}
