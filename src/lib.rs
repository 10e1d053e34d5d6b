pub mod api_server_axum;
pub mod app_config;
pub mod config;
pub mod error;
pub mod html;
pub mod logging;
pub mod models;
pub mod nse_client;
pub mod processor;

// Re-exports for convenience
pub use error::FetchError;
pub use models::{OptionChain, OptionData, OptionDetail, Records};
pub use nse_client::NSEClient;
pub use processor::{build_view_model, Derived, MarketSnapshot, Totals, ViewModel, ViewRow};
