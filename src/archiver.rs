use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::models::NormalizedDataset;

/// Missing cells become empty fields.
pub fn save_csv(dataset: &NormalizedDataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_str().unwrap_or("")))?;
    }
    writer.flush()?;
    info!("Saved to {}", path.display());
    Ok(())
}

/// Row-oriented JSON; missing cells become `null`.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    info!("Saved to {}", path.display());
    Ok(())
}
