// ── Typed request payloads ──
//
// Form contents for create/update calls. Customers travel as JSON; products
// travel as multipart because of the image upload.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopdesk_api::{Body, FormPayload};

use crate::error::CoreError;
use crate::model::EntityId;

/// Largest accepted product image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5_000_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub zip_code: String,
}

impl CustomerInput {
    pub(crate) fn to_body(&self) -> Result<Body, CoreError> {
        Body::json(self).map_err(CoreError::from)
    }
}

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Sniff the format from the file's magic bytes.
    fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n']) {
            Some(Self::Png)
        } else {
            None
        }
    }
}

/// A validated product image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate raw bytes: JPEG or PNG, at most [`MAX_IMAGE_BYTES`].
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, CoreError> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(CoreError::validation(format!(
                "File size is too large (max: {}KB)",
                MAX_IMAGE_BYTES / 1000
            )));
        }
        let format = ImageFormat::detect(&bytes)
            .ok_or_else(|| CoreError::validation("Unsupported file format (JPEG or PNG only)"))?;
        Ok(Self {
            file_name: file_name.into(),
            format,
            bytes,
        })
    }

    /// Read and validate an image from disk.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path).map_err(|e| {
            CoreError::validation(format!("cannot read {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
        Self::new(file_name, bytes)
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub category_id: EntityId,
    pub price: Decimal,
    pub stock: i64,
    /// Required on create, optional on update.
    pub image: Option<ImageUpload>,
}

impl ProductInput {
    pub(crate) fn validate(&self, require_image: bool) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("Product name is required"));
        }
        if self.category_id.is_empty() {
            return Err(CoreError::validation("Category is required"));
        }
        if self.price < Decimal::ZERO {
            return Err(CoreError::validation("Minimum price is 0"));
        }
        if self.stock < 0 {
            return Err(CoreError::validation("Minimum stock is 0"));
        }
        if require_image && self.image.is_none() {
            return Err(CoreError::validation("Image is required"));
        }
        Ok(())
    }

    pub(crate) fn to_form(&self) -> FormPayload {
        let form = FormPayload::new()
            .text("name", &self.name)
            .text("category_id", &self.category_id)
            .text("price", self.price)
            .text("stock", self.stock);
        match &self.image {
            Some(image) => form.file(
                "image",
                image.file_name.clone(),
                image.format.mime_type(),
                image.bytes.clone(),
            ),
            None => form,
        }
    }
}
