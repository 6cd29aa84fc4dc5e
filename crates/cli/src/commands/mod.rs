//! CLI command implementations.
//!
//! Each command opens a fresh cart store over the configured file storage,
//! the way a page load restores the cart from local storage.

pub mod cart;
pub mod products;

use rocketshoes_cart::{
    CartConfig, CartError, CartStore, CatalogError, FileStore, HttpCatalog, Notifier,
    TracingNotifier,
};
use thiserror::Error;

/// Errors that end a CLI command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The catalog client could not be created or a listing failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A cart operation failed (already reported to the user).
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

/// Prints shopper-facing messages to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn error(&self, message: &str) {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("error: {message}");
        }
    }
}

/// Where shopper-facing messages go.
///
/// With JSON logs, messages become structured `warn` events so a log
/// collector sees them alongside everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliNotifier {
    Terminal,
    Tracing,
}

impl CliNotifier {
    /// Pick the notifier matching the log output format.
    #[must_use]
    pub const fn for_output(json_logs: bool) -> Self {
        if json_logs { Self::Tracing } else { Self::Terminal }
    }
}

impl Notifier for CliNotifier {
    fn error(&self, message: &str) {
        match self {
            Self::Terminal => TerminalNotifier.error(message),
            Self::Tracing => TracingNotifier.error(message),
        }
    }
}

/// Cart store wired to the HTTP catalog and file storage.
pub type CliCartStore = CartStore<HttpCatalog, FileStore, CliNotifier>;

/// Open the cart store described by `config`.
///
/// # Errors
///
/// Returns `CommandError::Catalog` if the HTTP client cannot be built.
pub fn open_store(
    config: &CartConfig,
    notifier: CliNotifier,
) -> Result<CliCartStore, CommandError> {
    let catalog = HttpCatalog::new(config)?;
    let storage = FileStore::new(&config.storage_path);
    Ok(CartStore::open(catalog, storage, notifier))
}
