//! Dashboard Data Core
//!
//! Consumes the stock dashboard's upstream data and produces:
//! - Rolling per-granularity price series for the real-time line chart
//! - Center-anchored fixed-width axis bounds per granularity
//! - Normalized news-bookmark records from loosely-shaped API payloads
//! - Ranked keyword frequencies over scrapped news titles (word cloud)
//!
//! The transport layers (STOMP broker, subscription gateway, REST API)
//! live outside this crate; it only sees decoded frames and payloads.
//!
//! # Architecture
//!
//! ```text
//! Price-update frames        News-list payloads
//!        │                          │
//!    ┌───▼───┐                 ┌────▼────┐
//!    │ Feed  │  ← decode /     │ Feed    │  ← shape
//!    │       │    lenient nums │         │    normalization
//!    └───┬───┘                 └────┬────┘
//!        │                          │ titles
//!   ┌────▼─────┐              ┌─────▼─────┐
//!   │ Sampler  │              │ WordCloud │
//!   └────┬─────┘              └─────┬─────┘
//!        │                          │
//!   chart series               ranked terms
//!   + axis bounds              (top 30, counted)
//! ```

pub mod feed;
pub mod granularity;
pub mod sampler;
pub mod wordcloud;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
