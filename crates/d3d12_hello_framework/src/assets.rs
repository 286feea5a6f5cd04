use std::path::Path;
use std::path::PathBuf;

use eyre::eyre;
use tracing::warn;

use crate::hello_error::HelloResult;

/// Find an asset next to the executable, falling back to `fallback_dir`
/// (a sample's `src` directory) when running from `cargo run`.
pub fn resolve_asset_path(
    name: &str,
    exe_dir: Option<&Path>,
    fallback_dir: &Path,
) -> HelloResult<PathBuf> {
    if let Some(exe_dir) = exe_dir {
        let next_to_exe = exe_dir.join(name);
        if next_to_exe.is_file() {
            return Ok(next_to_exe);
        }
    }

    let fallback = fallback_dir.join(name);
    if fallback.is_file() {
        warn!(
            asset = name,
            path = %fallback.display(),
            "asset not found next to executable, using source copy"
        );
        return Ok(fallback);
    }

    Err(eyre!(
        "{name} not found next to the executable ({:?}) or in {}",
        exe_dir,
        fallback_dir.display()
    )
    .into())
}

/// Directory holding the running executable.
pub fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.parent().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> HelloResult<PathBuf> {
        let dir = std::env::temp_dir().join(format!("d3d12_hello_assets_{name}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).map_err(|error| eyre!(error))?;
        Ok(dir)
    }

    #[test]
    fn prefers_the_copy_next_to_the_executable() -> HelloResult<()> {
        let exe = scratch_dir("exe")?;
        let src = scratch_dir("src")?;
        std::fs::write(exe.join("shaders.hlsl"), "exe").map_err(|error| eyre!(error))?;
        std::fs::write(src.join("shaders.hlsl"), "src").map_err(|error| eyre!(error))?;

        let found = resolve_asset_path("shaders.hlsl", Some(&exe), &src)?;
        assert_eq!(found, exe.join("shaders.hlsl"));
        Ok(())
    }

    #[test]
    fn falls_back_to_the_source_directory() -> HelloResult<()> {
        let exe = scratch_dir("exe_empty")?;
        let src = scratch_dir("src_only")?;
        std::fs::write(src.join("texture.hlsl"), "src").map_err(|error| eyre!(error))?;

        let found = resolve_asset_path("texture.hlsl", Some(&exe), &src)?;
        assert_eq!(found, src.join("texture.hlsl"));
        Ok(())
    }

    #[test]
    fn missing_assets_are_errors() -> HelloResult<()> {
        let src = scratch_dir("nothing")?;
        let result = resolve_asset_path("missing.hlsl", None, &src);
        assert!(result.is_err());
        Ok(())
    }
}
