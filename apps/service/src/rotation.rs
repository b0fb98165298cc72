use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::info;

use logger::{LOG_FILE_PREFIX, LOG_FILE_SUFFIX};

/// Gzip-compress dated log files from previous days and delete the
/// uncompressed originals. Returns the number of files rotated.
///
/// Already-rotated files carry a `.gz` suffix and no longer match the dated
/// pattern, so re-running over the same directory is a no-op.
pub fn rotate_logs(directory: &Path, today: NaiveDate) -> io::Result<usize> {
    let mut rotated = 0;

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(date) = embedded_date(name) else { continue };
        if date == today {
            continue;
        }

        compress(&entry.path())?;
        fs::remove_file(entry.path())?;
        info!("Rotated log file {name}");
        rotated += 1;
    }

    Ok(rotated)
}

/// Parse the date out of `<prefix>.<YYYY-MM-DD>.<suffix>` file names.
fn embedded_date(name: &str) -> Option<NaiveDate> {
    let date = name
        .strip_prefix(LOG_FILE_PREFIX)?
        .strip_prefix('.')?
        .strip_suffix(LOG_FILE_SUFFIX)?
        .strip_suffix('.')?;

    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn compress(path: &Path) -> io::Result<()> {
    let mut gz_path = path.as_os_str().to_owned();
    gz_path.push(".gz");

    let mut source = File::open(path)?;
    let mut encoder = GzEncoder::new(File::create(PathBuf::from(gz_path))?, Compression::default());
    io::copy(&mut source, &mut encoder)?;
    encoder.finish()?;

    Ok(())
}
