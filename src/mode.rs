// Authorization mode selection

/// Caller-selected policy choosing which strategy, or strategy chain, runs.
///
/// `Discover` is the only mode that chains strategies automatically; every
/// other mode attempts exactly one strategy, leaving anything further to
/// the final fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// No strategy is attempted.
    #[default]
    None,

    /// Token file, then service account, then (when prompting is allowed)
    /// interactive request, strictly in that order.
    Discover,

    /// Headless redirect flow.
    OAuth,

    /// Interactive consent-code request at the terminal.
    Request,

    /// Service account file or application default credentials.
    ServiceAccount,

    /// Token file only.
    Token,
}
