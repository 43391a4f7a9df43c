use crate::types::ClientError;

use super::api::{RawFile, RawFileStat, RawTorrent};
use super::models::{FileRecord, Torrent, TorrentStatus};

const BYTE_UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Human-readable binary size, e.g. `1.50 MiB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, BYTE_UNITS[unit])
}

pub fn torrent_from_raw(raw: &RawTorrent) -> Torrent {
    let percent_done = raw.percent_done.unwrap_or(0.0);
    let status = TorrentStatus::from_rpc(raw.status.unwrap_or(0), percent_done);
    let total = raw.size_when_done.unwrap_or(0);
    let downloaded = raw.downloaded_ever.unwrap_or(0);
    let uploaded = raw.uploaded_ever.unwrap_or(0);
    let download_speed = raw.rate_download.unwrap_or(0);
    let upload_speed = raw.rate_upload.unwrap_or(0);

    let size_formatted = match status {
        TorrentStatus::Downloading => {
            format!("{} / {}", format_bytes(downloaded), format_bytes(total))
        }
        TorrentStatus::Stopped
        | TorrentStatus::Checking
        | TorrentStatus::Queued
        | TorrentStatus::Seeding
        | TorrentStatus::Completed => format_bytes(total),
    };

    let (seeds_total, peers_total) = raw.tracker_stats.iter().fold((0u32, 0u32), |acc, t| {
        (
            acc.0.saturating_add(t.seeder_count.max(0) as u32),
            acc.1.saturating_add(t.leecher_count.max(0) as u32),
        )
    });

    let error = match raw.error {
        Some(code) if code != 0 => raw
            .error_string
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(format!("error {code}"))),
        _ => None,
    };

    Torrent {
        id: raw.id,
        name: raw.name.clone().unwrap_or_else(|| format!("#{}", raw.id)),
        status,
        progress: (percent_done * 100.0).clamp(0.0, 100.0),
        size: total,
        slow_mode: raw.download_limited.unwrap_or(false) || raw.upload_limited.unwrap_or(false),
        size_formatted,
        upload_ratio: raw.upload_ratio.unwrap_or(0.0).max(0.0),
        uploaded_bytes: uploaded,
        uploaded_formatted: format_bytes(uploaded),
        peers_connected: raw.peers_connected.unwrap_or(0),
        seeds_total,
        peers_total,
        download_speed,
        upload_speed,
        download_speed_formatted: format!("{}/s", format_bytes(download_speed)),
        upload_speed_formatted: format!("{}/s", format_bytes(upload_speed)),
        error,
    }
}

/// Pairs `files` with `fileStats`; the file id is its index in the list.
pub fn files_from_raw(
    files: &[RawFile],
    stats: &[RawFileStat],
) -> Result<Vec<FileRecord>, ClientError> {
    if files.len() != stats.len() {
        return Err(ClientError::Rpc(format!(
            "files and file stats count mismatch ({} vs {})",
            files.len(),
            stats.len()
        )));
    }

    Ok(files
        .iter()
        .zip(stats)
        .enumerate()
        .map(|(idx, (file, stat))| {
            let progress = if file.length > 0 {
                (stat.bytes_completed as f64 / file.length as f64 * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            };
            FileRecord::new(idx as i64, file.name.clone(), file.length, progress, stat.wanted)
        })
        .collect())
}
