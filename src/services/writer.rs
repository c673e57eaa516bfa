use crate::errors::{Result, SnapshotError};
use crate::models::quote::Snapshot;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// 将快照写入 JSON 文件，覆盖旧文件
///
/// 先写入同目录下的临时文件再重命名，写入失败时不会留下半截文件。
pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;

    // 确保目录存在
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path)?;
    debug!("Writing snapshot to temporary file {}", tmp_path.display());

    if let Err(e) = fs::write(&tmp_path, json.as_bytes()).and_then(|_| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(SnapshotError::IoError(e));
    }

    info!("Saved snapshot with {} quotes and {} errors to {}",
          snapshot.data.len(), snapshot.errors.len(), path.display());
    Ok(())
}

/// 读取已写出的快照文件
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn temp_path(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name()
        .ok_or_else(|| SnapshotError::DataError(format!("Invalid output path: {}", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
