use serde::Serialize;

/// Daemon-wide figures shown next to the torrent list.
#[derive(Debug, Serialize, Clone, Default)]
pub struct SessionStats {
    pub total_download_speed: u64,
    pub total_upload_speed: u64,
    pub free_space: u64,
    pub transmission_version: String,
    #[serde(skip)]
    pub parsed_version: Option<semver::Version>,
}

impl SessionStats {
    /// Transmission reports versions like `4.0.5 (a6fe2a64aa)`.
    pub fn parse_version(raw: &str) -> Option<semver::Version> {
        let head = raw.split_whitespace().next()?;
        if let Ok(version) = semver::Version::parse(head) {
            return Some(version);
        }
        // Older daemons report two components, e.g. `2.94`.
        let mut parts = head.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        Some(semver::Version::new(major, minor, patch))
    }
}
