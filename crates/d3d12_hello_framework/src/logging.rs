use eyre::eyre;
use eyre::WrapErr;
use tracing::Level;

use crate::hello_error::HelloResult;

pub fn parse_level(level: &str) -> HelloResult<Level> {
    let level = level
        .parse::<Level>()
        .wrap_err_with(|| format!("unknown log level {level:?}"))?;
    Ok(level)
}

/// Install color-eyre and the fmt subscriber every sample logs through.
pub fn init(level: &str) -> HelloResult<()> {
    color_eyre::install()?;
    let level = parse_level(level)?;
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_target(false)
        .with_max_level(level)
        .try_init()
        .map_err(|error| eyre!(error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() -> HelloResult<()> {
        assert_eq!(parse_level("debug")?, Level::DEBUG);
        assert_eq!(parse_level("WARN")?, Level::WARN);
        assert!(parse_level("loud").is_err());
        Ok(())
    }
}
