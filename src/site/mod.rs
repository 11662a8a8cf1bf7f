//! Static site generation

pub mod builder;

pub use builder::{build_site, BuildError, BuildOptions, BuildReport};

use rust_embed::Embed;

#[derive(Embed)]
#[folder = "assets/"]
struct Assets;

/// The site stylesheet, written to `styles.css` and served by the server
pub fn stylesheet() -> String {
    Assets::get("styles.css")
        .map(|file| String::from_utf8_lossy(&file.data).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_is_embedded() {
        assert!(stylesheet().contains(".card"));
    }
}
