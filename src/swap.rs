//! Swap widget collaborator
//!
//! The swap surface is an external capability: something that can take a
//! widget configuration and present a swap flow. The core only builds the
//! configuration from a quote payload; it never depends on a concrete
//! widget at compile time. The terminal client ships a panel that renders
//! the quote as text.

use crate::config::SwapConfig;
use crate::error::Result;
use crate::session::message::SwapQuote;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// How the widget presents itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Modal,
    Integrated,
    Widget,
}

impl DisplayMode {
    /// Parse a display mode from its configuration string
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "modal" => Some(Self::Modal),
            "integrated" => Some(Self::Integrated),
            "widget" => Some(Self::Widget),
            _ => None,
        }
    }
}

/// Form parameters handed to the widget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapFormProps {
    pub fixed_input_mint: bool,
    pub fixed_output_mint: bool,
    pub initial_input_mint: String,
    pub initial_output_mint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_output_amount: Option<String>,
    pub slippage_bps: u32,
}

/// Full widget initialization payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapWidgetConfig {
    pub display_mode: DisplayMode,
    pub integrated_target_id: String,
    pub endpoint: String,
    pub form_props: SwapFormProps,
}

impl SwapWidgetConfig {
    /// Build a widget configuration from a quote and the client settings
    ///
    /// Mints are fixed to the quoted pair; amounts are carried through when
    /// the quote has them.
    pub fn from_quote(quote: &SwapQuote, config: &SwapConfig) -> Self {
        Self {
            display_mode: DisplayMode::parse_str(&config.display_mode)
                .unwrap_or(DisplayMode::Integrated),
            integrated_target_id: config.integrated_target_id.clone(),
            endpoint: config.rpc_endpoint.clone(),
            form_props: SwapFormProps {
                fixed_input_mint: true,
                fixed_output_mint: true,
                initial_input_mint: quote.input_mint.clone(),
                initial_output_mint: quote.output_mint.clone(),
                initial_amount: quote.in_amount.clone(),
                initial_output_amount: quote.out_amount.clone(),
                slippage_bps: quote.slippage_bps,
            },
        }
    }
}

/// An external capability that can present a swap flow
pub trait SwapWidget: Send {
    /// Initialize the widget with the given configuration
    fn init(&self, config: &SwapWidgetConfig) -> Result<()>;
}

/// Slippage in percent for display, e.g. 50 bps -> 0.5
pub fn slippage_percent(slippage_bps: u32) -> f64 {
    f64::from(slippage_bps) / 100.0
}

/// Terminal swap panel
///
/// Renders the quote as text in place of an embedded widget.
pub struct TerminalSwapPanel;

impl TerminalSwapPanel {
    fn label(info: Option<&crate::session::message::TokenInfo>, mint: &str) -> String {
        match info {
            Some(info) => info.symbol.clone(),
            None => crate::wallet::short_address(mint),
        }
    }
}

impl SwapWidget for TerminalSwapPanel {
    fn init(&self, config: &SwapWidgetConfig) -> Result<()> {
        let props = &config.form_props;
        println!();
        println!("{}", "  Swap suggestion".bold().cyan());
        println!(
            "  {} -> {}",
            crate::wallet::short_address(&props.initial_input_mint),
            crate::wallet::short_address(&props.initial_output_mint)
        );
        if let Some(amount) = &props.initial_amount {
            println!("  In amount:  {}", amount);
        }
        if let Some(amount) = &props.initial_output_amount {
            println!("  Out amount: {}", amount);
        }
        println!(
            "  {}",
            format!(
                "Slippage tolerance: {}%",
                slippage_percent(props.slippage_bps)
            )
            .dimmed()
        );
        println!();
        Ok(())
    }
}

/// Render a one-line description of a quote for the message stream
pub fn describe_quote(quote: &SwapQuote) -> String {
    let input = TerminalSwapPanel::label(quote.input_token_info.as_ref(), &quote.input_mint);
    let output = TerminalSwapPanel::label(quote.output_token_info.as_ref(), &quote.output_mint);
    format!(
        "{} -> {} (slippage tolerance: {}%)",
        input,
        output,
        slippage_percent(quote.slippage_bps)
    )
}
