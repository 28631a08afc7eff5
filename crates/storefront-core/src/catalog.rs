use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::Product;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported catalog format for {path}: expected .json, .yaml, or .yml")]
    UnsupportedFormat { path: String },

    #[error("catalog validation error: {0}")]
    Validation(String),
}

/// Product snapshot exported from the document store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Load and validate a catalog from a `.json`, `.yaml`, or `.yml` file.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read, has an unknown
/// extension, fails to parse, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog = match extension.as_deref() {
        Some("json") => parse_json(&content)?,
        Some("yaml" | "yml") => parse_yaml(&content)?,
        _ => {
            return Err(CatalogError::UnsupportedFormat {
                path: path.display().to_string(),
            })
        }
    };

    tracing::debug!(path = %path.display(), products = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Parse and validate a JSON catalog document.
///
/// # Errors
///
/// Returns `CatalogError` on malformed JSON or failed validation.
pub fn parse_json(content: &str) -> Result<Catalog, CatalogError> {
    let catalog: Catalog = serde_json::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Parse and validate a YAML catalog document.
///
/// # Errors
///
/// Returns `CatalogError` on malformed YAML or failed validation.
pub fn parse_yaml(content: &str) -> Result<Catalog, CatalogError> {
    let catalog: Catalog = serde_yaml::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &Catalog) -> Result<(), CatalogError> {
    let mut seen_ids = HashSet::new();

    for product in &catalog.products {
        if product.id.trim().is_empty() {
            return Err(CatalogError::Validation(
                "product id must be non-empty".to_string(),
            ));
        }

        if product.name.trim().is_empty() {
            return Err(CatalogError::Validation(format!(
                "product '{}' has an empty name",
                product.id
            )));
        }

        if !seen_ids.insert(product.id.as_str()) {
            return Err(CatalogError::Validation(format!(
                "duplicate product id: '{}'",
                product.id
            )));
        }
    }

    Ok(())
}
