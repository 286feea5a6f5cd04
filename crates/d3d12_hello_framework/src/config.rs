//! Sample configuration.
//!
//! Every field has a default so a sample runs without any file. An optional
//! `sample.toml` next to the executable (or the file passed with
//! `-config <path>`) overrides the defaults, and `-warp`/`/warp` on the
//! command line selects the software adapter.
//!
//! ```toml
//! width = 1280
//! height = 720
//! title = "D3D12 Hello Window"
//! use_warp_device = false
//! vsync = true
//! log_level = "info"
//! clear_color = [0.0, 0.2, 0.4, 1.0]
//! ```

use std::path::Path;
use std::path::PathBuf;

use eyre::eyre;
use eyre::WrapErr;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::hello_error::HelloResult;

pub const CONFIG_FILE_NAME: &str = "sample.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub use_warp_device: bool,
    pub vsync: bool,
    pub log_level: String,
    pub clear_color: [f32; 4],
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "DXSample".to_string(),
            use_warp_device: false,
            vsync: true,
            log_level: "info".to_string(),
            clear_color: [0.0, 0.2, 0.4, 1.0],
        }
    }
}

/// What was found on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleCommandLine {
    pub use_warp_device: bool,
    pub config_path: Option<PathBuf>,
}

/// Accepts `-warp`/`/warp` and `-config <path>`/`/config <path>`, case insensitive.
/// The first argument is the program name and is skipped.
pub fn parse_command_line<I, S>(args: I) -> HelloResult<SampleCommandLine>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut command_line = SampleCommandLine::default();
    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        let flag = arg.trim_start_matches(['-', '/']);
        if flag.len() == arg.len() {
            continue;
        }
        if flag.eq_ignore_ascii_case("warp") {
            command_line.use_warp_device = true;
        } else if flag.eq_ignore_ascii_case("config") {
            let path = args
                .next()
                .ok_or_else(|| eyre!("{arg} expects a path"))?;
            command_line.config_path = Some(PathBuf::from(path.as_ref()));
        }
    }
    Ok(command_line)
}

impl SampleConfig {
    /// Defaults for a sample called `title`.
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn from_toml_str(text: &str) -> HelloResult<Self> {
        Self::default().with_overrides(text)
    }

    /// Keys present in `text` replace the matching fields of `self`; every
    /// other field keeps its current value.
    pub fn with_overrides(self, text: &str) -> HelloResult<Self> {
        let overrides: toml::Table = toml::from_str(text).wrap_err("failed to parse sample config")?;
        let mut merged = match toml::Value::try_from(&self).wrap_err("failed to encode sample config")? {
            toml::Value::Table(table) => table,
            other => return Err(eyre!("sample config encoded as {}, not a table", other.type_str()).into()),
        };
        merged.extend(overrides);
        let config: Self = toml::Value::Table(merged)
            .try_into()
            .wrap_err("failed to parse sample config")?;
        config.validate()?;
        Ok(config)
    }

    /// Layer the optional config file and the command line over `self`.
    ///
    /// Without `-config`, `sample.toml` in `exe_dir` is used when present.
    /// Fields the file leaves out keep the sample's own defaults.
    pub fn resolve(self, command_line: &SampleCommandLine, exe_dir: Option<&Path>) -> HelloResult<Self> {
        let file = match &command_line.config_path {
            Some(path) => Some(path.clone()),
            None => exe_dir
                .map(|dir| dir.join(CONFIG_FILE_NAME))
                .filter(|path| path.is_file()),
        };

        let mut config = match file {
            Some(path) => {
                debug!(path = %path.display(), "loading sample config");
                let text = std::fs::read_to_string(&path)
                    .wrap_err_with(|| format!("failed to read {}", path.display()))?;
                self.with_overrides(&text)?
            }
            None => self,
        };

        if command_line.use_warp_device {
            config.use_warp_device = true;
        }
        if config.use_warp_device {
            config.title.push_str(" (WARP)");
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HelloResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(eyre!("window size must be non-zero, got {}x{}", self.width, self.height).into());
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// `Present` sync interval.
    pub fn sync_interval(&self) -> u32 {
        u32::from(self.vsync)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_warp_in_either_style() -> HelloResult<()> {
        assert!(parse_command_line(["app", "-warp"])?.use_warp_device);
        assert!(parse_command_line(["app", "/WARP"])?.use_warp_device);
        assert!(!parse_command_line(["app", "warp"])?.use_warp_device);
        // The program name is never a flag.
        assert!(!parse_command_line(["-warp"])?.use_warp_device);
        Ok(())
    }

    #[test]
    fn parses_config_path() -> HelloResult<()> {
        let command_line = parse_command_line(["app", "-config", "my.toml", "/warp"])?;
        assert_eq!(command_line.config_path, Some(PathBuf::from("my.toml")));
        assert!(command_line.use_warp_device);
        assert!(parse_command_line(["app", "/config"]).is_err());
        Ok(())
    }

    #[test]
    fn partial_files_keep_defaults() -> HelloResult<()> {
        let config = SampleConfig::from_toml_str("width = 800\nvsync = false\n")?;
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 720);
        assert!(!config.vsync);
        assert_eq!(config.sync_interval(), 0);
        assert_eq!(config.clear_color, [0.0, 0.2, 0.4, 1.0]);
        Ok(())
    }

    #[test]
    fn partial_files_keep_sample_defaults() -> HelloResult<()> {
        let light_steel_blue = [0.690_196_1, 0.768_627_5, 0.870_588_3, 1.0];
        let defaults = SampleConfig {
            clear_color: light_steel_blue,
            ..SampleConfig::titled("D3D12 Hello Window")
        };
        let config = defaults.with_overrides("width = 800\n")?;
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 720);
        assert_eq!(config.title, "D3D12 Hello Window");
        assert_eq!(config.clear_color, light_steel_blue);
        Ok(())
    }

    #[test]
    fn rejects_zero_sized_windows() {
        assert!(SampleConfig::from_toml_str("height = 0").is_err());
        assert!(SampleConfig::from_toml_str("width = \"wide\"").is_err());
    }

    #[test]
    fn warp_appends_to_title() -> HelloResult<()> {
        let command_line = parse_command_line(["app", "-warp"])?;
        let config = SampleConfig::titled("D3D12 Hello Square").resolve(&command_line, None)?;
        assert!(config.use_warp_device);
        assert_eq!(config.title, "D3D12 Hello Square (WARP)");
        Ok(())
    }

    #[test]
    fn config_file_keeps_sample_title_unless_overridden() -> HelloResult<()> {
        let dir = std::env::temp_dir().join(format!("d3d12_hello_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).map_err(|error| eyre!(error))?;
        std::fs::write(dir.join(CONFIG_FILE_NAME), "width = 640\nheight = 480\n")
            .map_err(|error| eyre!(error))?;

        let defaults = SampleConfig {
            clear_color: [1.0, 0.0, 0.0, 1.0],
            ..SampleConfig::titled("Hello")
        };
        let config = defaults.resolve(&SampleCommandLine::default(), Some(&dir))?;
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.title, "Hello");
        assert_eq!(config.clear_color, [1.0, 0.0, 0.0, 1.0]);
        assert!((config.aspect_ratio() - 4.0 / 3.0).abs() < f32::EPSILON);

        let custom = dir.join("custom.toml");
        std::fs::write(&custom, "title = \"Custom\"\n").map_err(|error| eyre!(error))?;
        let command_line = SampleCommandLine {
            use_warp_device: false,
            config_path: Some(custom),
        };
        let config = SampleConfig::titled("Hello").resolve(&command_line, Some(&dir))?;
        assert_eq!(config.title, "Custom");
        assert_eq!(config.width, 1280);
        Ok(())
    }
}
