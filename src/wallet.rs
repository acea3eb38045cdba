//! Wallet collaborator interface
//!
//! The chat client never touches keys or signs anything; it only reads the
//! connection state and public address of an externally-managed wallet.
//! The address enriches outgoing queries and lets a swap quote target the
//! connected wallet.

/// Read-only view of an external wallet connection
pub trait WalletAdapter: Send {
    /// Whether a wallet is currently connected
    fn is_connected(&self) -> bool;

    /// Public address of the connected wallet
    fn address(&self) -> Option<String>;

    /// Contextual remark sent with outgoing queries when connected
    fn remark(&self) -> Option<String> {
        self.address()
            .map(|addr| format!("my solana wallet address is {}", addr))
    }
}

/// Wallet backed by a configured public address
pub struct ConfiguredWallet {
    address: String,
}

impl ConfiguredWallet {
    /// Create a wallet view over a known public address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl WalletAdapter for ConfiguredWallet {
    fn is_connected(&self) -> bool {
        true
    }

    fn address(&self) -> Option<String> {
        Some(self.address.clone())
    }
}

/// Disconnected wallet
pub struct NullWallet;

impl WalletAdapter for NullWallet {
    fn is_connected(&self) -> bool {
        false
    }

    fn address(&self) -> Option<String> {
        None
    }
}

/// Build the wallet adapter for an optional configured address
pub fn from_config(address: Option<&str>) -> Box<dyn WalletAdapter> {
    match address {
        Some(addr) if !addr.is_empty() => Box::new(ConfiguredWallet::new(addr)),
        _ => Box::new(NullWallet),
    }
}

/// Shorten an address for display: first four and last four characters
///
/// # Examples
///
/// ```
/// use deepsense::wallet::short_address;
///
/// assert_eq!(
///     short_address("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin"),
///     "9xQe...VFin"
/// );
/// ```
pub fn short_address(address: &str) -> String {
    if address.chars().count() <= 8 {
        return address.to_string();
    }
    let head: String = address.chars().take(4).collect();
    let tail: String = address
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{}...{}", head, tail)
}
