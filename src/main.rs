use std::path::Path;

use canopy::{CanopyError, Options, Viewer};

/// Build options from the optional command-line argument.
///
/// An image file (`.png`, `.jpg`, `.jpeg`) becomes the diffuse texture on
/// top of default options; anything else is read as an options TOML file.
fn resolve_options(arg: Option<&str>) -> Result<Options, CanopyError> {
    let Some(arg) = arg else {
        return Ok(Options::default());
    };
    let path = Path::new(arg);
    let is_image = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg")
        });
    if is_image {
        let mut options = Options::default();
        options.display.texture_path = Some(path.to_path_buf());
        Ok(options)
    } else {
        Options::load(path)
    }
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let arg = std::env::args().nth(1);
    if matches!(arg.as_deref(), Some("-h" | "--help")) {
        log::info!("Usage: canopy [OPTIONS.toml | TEXTURE.png]");
        return;
    }

    let options = match resolve_options(arg.as_deref()) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = Viewer::builder().with_options(options).build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
