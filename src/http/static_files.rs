//! Static web bundle with single-page-application fallback.
//!
//! Files under the root are served as-is. Any path that does not resolve to a
//! file is answered with the root document and status 200, so client-side
//! routes survive a page reload.

use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

use crate::config::StaticFilesConfig;

pub fn spa_service(config: &StaticFilesConfig) -> ServeDir<ServeFile> {
    let root = Path::new(&config.root);
    ServeDir::new(root).fallback(ServeFile::new(root.join(&config.index)))
}
