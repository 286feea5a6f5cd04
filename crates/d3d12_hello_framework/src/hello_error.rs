pub type HelloResult<T, E = HelloReport> = core::result::Result<T, E>;

/// Error type shared by every sample.
///
/// Wraps an [`eyre::Report`] so both eyre errors and `windows::core::Error`
/// values can be propagated with `?` from the same function.
pub struct HelloReport {
    inner: eyre::Report,
}

impl HelloReport {
    pub fn into_report(self) -> eyre::Report {
        self.inner
    }
}

impl From<eyre::Report> for HelloReport {
    fn from(report: eyre::Report) -> Self {
        Self { inner: report }
    }
}

impl std::fmt::Display for HelloReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl std::fmt::Debug for HelloReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.inner, f)
    }
}

#[cfg(windows)]
impl From<windows::core::Error> for HelloReport {
    fn from(error: windows::core::Error) -> Self {
        Self {
            inner: eyre::Report::new(WrappedWindowsError::from(error)),
        }
    }
}

/// `windows::core::Error` with the `Display`/`Debug` pair eyre expects.
#[cfg(windows)]
pub struct WrappedWindowsError {
    inner: windows::core::Error,
}

#[cfg(windows)]
impl From<windows::core::Error> for WrappedWindowsError {
    fn from(error: windows::core::Error) -> Self {
        Self { inner: error }
    }
}

#[cfg(windows)]
impl std::error::Error for WrappedWindowsError {}

#[cfg(windows)]
impl std::fmt::Display for WrappedWindowsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (HRESULT {:#010x})", self.inner.message(), self.inner.code().0)
    }
}

#[cfg(windows)]
impl std::fmt::Debug for WrappedWindowsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;

    fn parse_width(text: &str) -> HelloResult<u32> {
        let width = text
            .parse::<u32>()
            .wrap_err_with(|| format!("invalid width {text:?}"))?;
        Ok(width)
    }

    #[test]
    fn eyre_errors_convert_with_question_mark() {
        assert_eq!(parse_width("1280").ok(), Some(1280));
        let error = parse_width("wide").unwrap_err();
        assert!(error.to_string().contains("invalid width"));
    }

    #[test]
    fn report_can_be_unwrapped() {
        let report: HelloReport = eyre::eyre!("device removed").into();
        assert_eq!(report.into_report().to_string(), "device removed");
    }
}
