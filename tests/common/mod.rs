use deepsense::config::{LimitsConfig, QueryConfig};
use deepsense::query::{FallbackResponder, QueryClient};
use deepsense::session::{ChatController, SessionStore};
use deepsense::wallet::{NullWallet, WalletAdapter};

/// Build a controller over an in-memory store pointed at `base_url`.
///
/// The clock is fixed and the fallback selector pinned so assertions are
/// deterministic.
#[allow(dead_code)]
pub fn controller_for(base_url: &str) -> ChatController {
    controller_with_wallet(base_url, Box::new(NullWallet))
}

#[allow(dead_code)]
pub fn controller_with_wallet(
    base_url: &str,
    wallet: Box<dyn WalletAdapter>,
) -> ChatController {
    let store = SessionStore::in_memory();
    let query = QueryClient::new(&QueryConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
    })
    .expect("failed to build query client");

    ChatController::new(store, query, wallet, LimitsConfig::default())
        .expect("failed to build controller")
        .with_clock(|| 1_700_000_000_000)
        .with_fallback(FallbackResponder::with_selector(|_| 0))
}
