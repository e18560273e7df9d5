//! spider-functions - Built-in capability handlers
//!
//! Capabilities the embedding application can register out of the box:
//! - `get_weather` - demo capability returning canned weather data
//! - `fetch_webpage` - fetch a page through the shared [`PageFetcher`]
//! - `extract_page_text` - reduce HTML to visible text

pub mod weather;
pub mod webpage;

use spider_core::SharedFunction;
use std::sync::Arc;

pub use weather::GetWeather;
pub use webpage::{ExtractPageText, FetchWebpage, FetchedPage, PageFetcher};

/// Names of all built-in capabilities.
pub const BUILTIN_FUNCTION_NAMES: [&str; 3] = ["get_weather", "fetch_webpage", "extract_page_text"];

/// All built-in capabilities, ready for registry construction.
pub fn builtin_functions() -> Vec<SharedFunction> {
    vec![
        Arc::new(GetWeather),
        Arc::new(FetchWebpage),
        Arc::new(ExtractPageText),
    ]
}
