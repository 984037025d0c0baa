// Resource descriptors and request bodies
//
// Every back-office entity is served from the same URL layout
// (`{base}/{path}/list`, `{base}/{path}/{id}`, ...). A `Resource` names the
// path and the envelope keys; the client does the rest.

use serde::Serialize;

use crate::error::Error;

/// HTTP verb used when updating an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    Put,
    /// Multipart uploads cannot ride on PUT with this backend.
    Post,
}

/// Where a resource lives and how its envelopes are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Path relative to the API base URL, without slashes at either end.
    pub path: &'static str,
    /// Key under `data` holding collections (`data.customers`).
    pub collection_key: &'static str,
    /// Key under `data` holding a single record (`data.customer`).
    pub record_key: &'static str,
    pub update_method: UpdateMethod,
}

impl Resource {
    pub const CUSTOMERS: Self = Self {
        path: "v1/customers",
        collection_key: "customers",
        record_key: "customer",
        update_method: UpdateMethod::Put,
    };

    pub const PRODUCTS: Self = Self {
        path: "v1/products",
        collection_key: "products",
        record_key: "product",
        update_method: UpdateMethod::Post,
    };

    pub const ORDERS: Self = Self {
        path: "v1/orders",
        collection_key: "orders",
        record_key: "order",
        update_method: UpdateMethod::Put,
    };

    pub(crate) fn collection_pointer(&self) -> String {
        format!("/data/{}", self.collection_key)
    }

    pub(crate) fn record_pointer(&self) -> String {
        format!("/data/{}", self.record_key)
    }
}

// ── Request bodies ───────────────────────────────────────────────────

/// Payload of a create/update call.
#[derive(Debug, Clone)]
pub enum Body {
    Json(serde_json::Value),
    Form(FormPayload),
}

impl Body {
    /// Serialize any value into a JSON body.
    pub fn json(value: &impl Serialize) -> Result<Self, Error> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| Error::Deserialization {
                message: format!("failed to serialize request body: {e}"),
                body: String::new(),
            })
    }
}

/// One value in a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
}

/// An ordered multipart form. Kept as plain data so callers can inspect it;
/// converted into a `reqwest::multipart::Form` only when sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    parts: Vec<(String, FormValue)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.parts
            .push((name.into(), FormValue::Text(value.to_string())));
        self
    }

    /// Append a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormValue::File {
                file_name: file_name.into(),
                mime_type: mime_type.into(),
                bytes,
            },
        ));
        self
    }

    pub fn parts(&self) -> &[(String, FormValue)] {
        &self.parts
    }

    /// Look up the first text value for a field name.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, v)| match v {
            FormValue::Text(t) if n == name => Some(t.as_str()),
            _ => None,
        })
    }

    pub(crate) fn into_form(self) -> Result<reqwest::multipart::Form, Error> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.parts {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File {
                    file_name,
                    mime_type,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime_type)
                        .map_err(|e| Error::Multipart(format!("{name}: {e}")))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_payload_keeps_insertion_order() {
        let form = FormPayload::new()
            .text("customer_id", 7)
            .text("products[0][product_id]", 3)
            .text("products[0][quantity]", 2);

        let names: Vec<&str> = form.parts().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            ["customer_id", "products[0][product_id]", "products[0][quantity]"]
        );
        assert_eq!(form.text_value("products[0][quantity]"), Some("2"));
    }

    #[test]
    fn text_value_skips_file_parts() {
        let form = FormPayload::new().file("image", "a.png", "image/png", vec![1, 2, 3]);
        assert_eq!(form.text_value("image"), None);
    }

    #[test]
    fn envelope_pointers_follow_resource_keys() {
        assert_eq!(Resource::CUSTOMERS.collection_pointer(), "/data/customers");
        assert_eq!(Resource::ORDERS.record_pointer(), "/data/order");
    }
}
