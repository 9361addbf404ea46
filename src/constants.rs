//! Endpoints, canned queries and tolerances shared by every scenario.

/// RFQ API paths, relative to the configured base URL
pub mod endpoints {
    pub const FREE_TEXT: &str = "/api/rfq/upload-free-text";
    pub const URL_HTML: &str = "/api/rfq/upload-url-html";
}

/// Request parameters used when a scenario has no reason to vary them
pub mod defaults {
    pub const TOP_K: i64 = 3;
    pub const THRESHOLD: f64 = 0.5;
    pub const ENABLE_PRIVATE_LABEL_RANKING: bool = false;
}

pub mod queries {
    pub const CUTTING_BOARD: &str = "Cutting Board";
    pub const CUTTING_BOARD_SPECIFIC: &str = "Plastic Cutting Board 24x18";
    pub const CONTAINER: &str = "container";
    pub const GREEN_BOARD: &str = "Green Polyethylene Board";
    pub const SPOON_BULK: &str = "Industrial Plastic Spoon Bulk 100 pack";
    pub const CAFE_CLEAN: &str = "Cafe & Restaurant Supplies";
    pub const CAFE_ACCENT: &str = "Caf\u{e9} & Restaurant Supplies";
    pub const QUOTES_MEASUREMENT: &str = "24\" x 18\" cutting board";
    pub const KITCHEN_KNIFE: &str = "kitchen knife";
}

/// JS-rendered kitchen knife product page. Server-side fetch of this page
/// yields no product text, which reproduces Bug P3.
pub const PRODUCT_PAGE_URL: &str = "https://www.amazon.com/dp/B0BVZLHNMB";

/// Host that never resolves
pub const UNREACHABLE_URL: &str = "https://this-domain-does-not-exist-xyz123.com/product";

pub const MALFORMED_URL: &str = "not-a-valid-url-format";

/// Maximum top-result score spread tolerated across repeated identical
/// requests, on the 0-100 percentage scale. Provisional values.
pub mod tolerance {
    /// 3 attempts
    pub const SHORT_RUN: f64 = 1.0;
    /// 5 attempts
    pub const LONG_RUN: f64 = 2.0;
}

/// Statuses accepted when the API cannot reach the submitted URL
pub const UNREACHABLE_STATUSES: &[u16] = &[400, 421, 422];
