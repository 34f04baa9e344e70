use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

/// Serves the front-end build. Unknown paths get `index.html` so the
/// client-side router can resolve them.
pub fn spa_service(static_dir: &str) -> ServeDir<ServeFile> {
    let index = Path::new(static_dir).join("index.html");
    ServeDir::new(static_dir).fallback(ServeFile::new(index))
}
