//! Patch source identification and URL construction.

/// Identifies a remote patch tree: host, game identifier and version.
///
/// This is process-wide configuration, constructed once at startup and
/// shared read-only; every URL the synchronizer requests is derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSource {
    host: String,
    game: String,
    version: u32,
}

impl PatchSource {
    /// Create a patch source descriptor.
    pub fn new(host: impl Into<String>, game: impl Into<String>, version: u32) -> Self {
        PatchSource {
            host: host.into(),
            game: game.into(),
            version,
        }
    }

    /// The remote host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The game identifier.
    pub fn game(&self) -> &str {
        &self.game
    }

    /// The patch tree version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Base URL of the patch tree.
    pub fn base_url(&self) -> String {
        format!("http://{}/{}/{}/Patch", self.host, self.game, self.version)
    }

    /// URL of the compressed manifest.
    pub fn manifest_url(&self) -> String {
        format!(
            "{}/FileInfoMap_{}_{}.dat.zip",
            self.base_url(),
            self.game,
            self.version
        )
    }

    /// URL of the full-archive torrent. Not used by the sync path.
    pub fn full_archive_url(&self) -> String {
        format!(
            "{}/Full_{}_{}.torrent.zip",
            self.base_url(),
            self.game,
            self.version
        )
    }

    /// URL of a file's whole compressed package.
    pub fn package_url(&self, path: &str) -> String {
        format!("{}/Zip/{}.zip", self.base_url(), normalize(path))
    }

    /// URL of one numbered segment of a file's compressed content.
    ///
    /// Segments are numbered from 1 with a two-digit zero-padded suffix.
    pub fn segment_url(&self, path: &str, index: u32) -> String {
        format!("{}/Zip/{}.z{:02}", self.base_url(), normalize(path), index)
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}
