#[cfg(windows)]
mod populate_command_list;
#[cfg(windows)]
mod resources;
#[cfg(windows)]
mod sample;

#[cfg(windows)]
pub fn main() -> d3d12_hello_framework::hello_error::HelloResult<()> {
    use d3d12_hello_framework::assets::exe_dir;
    use d3d12_hello_framework::config::parse_command_line;
    use d3d12_hello_framework::config::SampleConfig;
    use d3d12_hello_framework::geometry::colors;
    use d3d12_hello_framework::logging;
    use d3d12_hello_framework::win32::sample_runner::run_sample;
    use tracing::info;

    let command_line = parse_command_line(std::env::args())?;
    let defaults = SampleConfig {
        clear_color: colors::LIGHT_STEEL_BLUE,
        ..SampleConfig::titled("D3D12 Hello Window")
    };
    let config = defaults.resolve(&command_line, exe_dir().as_deref())?;
    logging::init(&config.log_level)?;
    info!(?config, "starting");

    run_sample::<sample::Sample>(&config)
}

#[cfg(not(windows))]
pub fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    Err(eyre::eyre!("d3d12_hello_window needs Direct3D 12, which is only available on Windows"))
}
