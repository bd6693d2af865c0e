use std::path::PathBuf;

/// Core error type for the workshop servers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read fixture {}: {source}", path.display())]
    FixtureIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture {}: {source}", path.display())]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
