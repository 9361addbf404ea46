//! Field groups every matched product must expose (Bug P5).
//!
//! The live API names some fields differently from the defect
//! report (`vendor.name` for vendor, `isStockProduct` for inStock, `images`
//! for imageUrl); the checks use the live names.

use crate::constants::queries;
use crate::core::contract::{
    constrain_field, expect_products, expect_success, require_field, FieldType, ScenarioFailure,
};
use crate::models::{FreeTextRequest, MatchedProduct};
use crate::services::RfqClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// `price`: positive number
    Price,
    /// `sku`: non-empty string
    Sku,
    /// `vendor.name`: non-empty string; `isStockProduct`: boolean
    VendorStock,
    /// `images`: non-empty array whose first `path` is an http(s) URL
    Images,
}

impl FieldGroup {
    pub fn validate(&self, product: &MatchedProduct, index: usize) -> Result<(), ScenarioFailure> {
        match self {
            FieldGroup::Price => {
                let price = require_field(product, index, "price", FieldType::Number)?;
                let positive = price.as_f64().is_some_and(|p| p > 0.0);
                constrain_field(index, "price", price, "number > 0", positive)
            }
            FieldGroup::Sku => {
                let sku = require_field(product, index, "sku", FieldType::String)?;
                let non_empty = sku.as_str().is_some_and(|s| !s.is_empty());
                constrain_field(index, "sku", sku, "non-empty string", non_empty)
            }
            FieldGroup::VendorStock => {
                require_field(product, index, "vendor", FieldType::Object)?;
                let name = require_field(product, index, "vendor.name", FieldType::String)?;
                let non_empty = name.as_str().is_some_and(|s| !s.is_empty());
                constrain_field(index, "vendor.name", name, "non-empty string", non_empty)?;
                require_field(product, index, "isStockProduct", FieldType::Boolean)?;
                Ok(())
            }
            FieldGroup::Images => {
                let images = require_field(product, index, "images", FieldType::Array)?;
                let non_empty = images.as_array().is_some_and(|a| !a.is_empty());
                constrain_field(index, "images", images, "non-empty array", non_empty)?;
                let path = require_field(product, index, "images.0.path", FieldType::String)?;
                let is_url = path.as_str().is_some_and(is_http_url);
                constrain_field(index, "images.0.path", path, "http(s) URL", is_url)
            }
        }
    }
}

fn is_http_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Run the fixed "Cutting Board" query and validate `group` on every product
pub async fn verify(client: &RfqClient, group: FieldGroup) -> Result<(), ScenarioFailure> {
    let request = FreeTextRequest::new(queries::CUTTING_BOARD);
    let envelope = expect_success(&client.upload_free_text(&request).await?)?;

    for (index, product) in expect_products(&envelope)?.iter().enumerate() {
        group.validate(product, index)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(value: serde_json::Value) -> MatchedProduct {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_live_shaped_product() {
        let p = product(json!({
            "name": "Cutting Board 18x24",
            "sku": "CB-1824",
            "vendor": { "name": "Acme" },
            "isStockProduct": true,
            "images": [{ "path": "https://cdn.test/cb.png" }]
        }));
        assert!(FieldGroup::Sku.validate(&p, 0).is_ok());
        assert!(FieldGroup::VendorStock.validate(&p, 0).is_ok());
        assert!(FieldGroup::Images.validate(&p, 0).is_ok());
        assert!(FieldGroup::Price.validate(&p, 0).is_err());
    }

    #[test]
    fn test_legacy_field_names_drift() {
        let p = product(json!({
            "vendor": "Acme",
            "inStock": true,
            "imageUrl": "https://cdn.test/a.png"
        }));
        let err = FieldGroup::VendorStock.validate(&p, 1).unwrap_err();
        assert!(err.to_string().contains("matchedInternalProducts[1].vendor"));
        assert!(FieldGroup::Images.validate(&p, 1).is_err());
    }

    #[test]
    fn test_constraints_reported() {
        let p = product(json!({ "price": 0, "sku": "", "images": [{ "path": "/local.png" }] }));
        assert_eq!(FieldGroup::Price.validate(&p, 0).unwrap_err().kind(), "schema-drift");
        let sku = FieldGroup::Sku.validate(&p, 0).unwrap_err();
        assert!(sku.to_string().contains("non-empty string"));
        let images = FieldGroup::Images.validate(&p, 0).unwrap_err();
        assert!(images.to_string().contains("http(s) URL"));
    }

    #[test]
    fn test_image_url_scheme() {
        assert!(is_http_url("http://cdn.test/a.png"));
        assert!(is_http_url("https://cdn.test/a.png"));
        assert!(!is_http_url("ftp://cdn.test/a.png"));
        assert!(!is_http_url("cdn.test/https://a.png"));
    }
}
