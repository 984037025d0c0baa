// ── Wire record → domain model conversions ──

use shopdesk_api::{
    CategoryRecord, CustomerRecord, OptionRecord, OrderCustomerRecord, OrderDetailRecord,
    OrderItemRecord, OrderRecord, ProductRecord,
};

use tracing::warn;

use crate::model::{
    Category, Customer, EntityId, OptionRef, OrderCustomer, OrderDetail, OrderItem, OrderSummary,
    Product, ProductOption, join_name,
};

impl From<CustomerRecord> for Customer {
    fn from(r: CustomerRecord) -> Self {
        Self {
            id: r.id.into(),
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            phone_number: r.phone_number,
            zip_code: r.zip_code,
            extra: r.extra,
        }
    }
}

impl From<ProductRecord> for Product {
    fn from(r: ProductRecord) -> Self {
        Self {
            id: r.id.into(),
            name: r.name,
            category_id: r.category_id.map(EntityId::from),
            category: r.category,
            price: r.price,
            stock: r.stock,
            image: r.image,
            extra: r.extra,
        }
    }
}

impl From<OrderRecord> for OrderSummary {
    fn from(r: OrderRecord) -> Self {
        Self {
            id: r.id.into(),
            order_number: r.order_number,
            customer_name: r.customer_name,
            quantity: r.quantity,
            price: r.price,
            extra: r.extra,
        }
    }
}

impl From<OrderCustomerRecord> for OrderCustomer {
    fn from(r: OrderCustomerRecord) -> Self {
        Self {
            id: r.id.map(EntityId::from),
            name: join_name(r.first_name.as_deref(), r.last_name.as_deref()),
            email: r.email,
            phone_number: r.phone_number,
            zip_code: r.zip_code,
        }
    }
}

impl From<OrderItemRecord> for OrderItem {
    fn from(r: OrderItemRecord) -> Self {
        Self {
            product_price: r.product_price,
            product_discount: r.product_discount,
            product_quantity: item_quantity(&r.product_name, r.product_quantity),
            product_name: r.product_name,
        }
    }
}

/// A missing or out-of-range quantity becomes 0, which prices the line at 0.
fn item_quantity(product: &str, raw: Option<i64>) -> u32 {
    match raw.map(u32::try_from) {
        Some(Ok(quantity)) => quantity,
        Some(Err(_)) => {
            warn!(product, quantity = ?raw, "order item quantity out of range, using 0");
            0
        }
        None => {
            warn!(product, "order item has no quantity, using 0");
            0
        }
    }
}

impl From<OrderDetailRecord> for OrderDetail {
    fn from(r: OrderDetailRecord) -> Self {
        Self {
            id: r.id.map(EntityId::from),
            order_number: r.order_number,
            created_at: r.created_at,
            customer: r.customer.map(OrderCustomer::from),
            items: r.items.into_iter().map(OrderItem::from).collect(),
        }
    }
}

impl From<OptionRecord> for OptionRef {
    fn from(r: OptionRecord) -> Self {
        Self {
            id: r.id.map(EntityId::from),
            label: r.label,
        }
    }
}

impl From<OptionRecord> for ProductOption {
    fn from(r: OptionRecord) -> Self {
        let price = r.price;
        Self {
            reference: OptionRef::from(r),
            price,
        }
    }
}

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Self {
            id: r.id.into(),
            name: r.name,
        }
    }
}
