//! Business logic services.

pub mod engagement;
pub mod risk_summary;

#[allow(unused_imports)] // Re-exports for downstream use
pub use engagement::EngagementService;
#[allow(unused_imports)] // Re-exports for downstream use
pub use risk_summary::{RiskClient, RiskError, RiskSummary};
