use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

const INDEX_FILE: &str = "index.html";

/// Serves a compiled single-page client from `dir`.
///
/// Paths that do not name a file fall back to `index.html` so the client's
/// own router can resolve them.
pub fn static_files(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(dir.join(INDEX_FILE)))
}
