//! Order command handlers: the order list, the order view rebuilt from
//! history, and order entry through the cart.

use std::fmt::Write as _;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use shopdesk_core::{
    AppState, CartLineItem, CoreError, EntityId, OptionRef, OrderDetail, OrderFormErrors,
    OrderSummary,
};

use crate::cli::{GlobalOpts, OrdersArgs, OrdersCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, ItemSpec};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&Arc<OrderSummary>> for OrderRow {
    fn from(o: &Arc<OrderSummary>) -> Self {
        Self {
            id: o.id.to_string(),
            number: output::cell(o.order_number.as_ref()),
            customer: output::cell(o.customer_name.as_ref()),
            quantity: output::cell(o.quantity.as_ref()),
            price: output::cell(o.price.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Price")]
    price: Decimal,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Discount %")]
    discount: Decimal,
    #[tabled(rename = "Total")]
    total: Decimal,
}

impl From<&CartLineItem> for LineRow {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product: item.product.label.clone(),
            price: item.price,
            quantity: item.quantity,
            discount: item.discount,
            total: item.total,
        }
    }
}

/// What `orders get` and `orders create` print.
#[derive(Serialize)]
struct OrderView {
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<OrderDetail>,
    items: Vec<CartLineItem>,
    grand_total: Decimal,
}

fn lines_table(items: &[CartLineItem]) -> String {
    let rows: Vec<LineRow> = items.iter().map(LineRow::from).collect();
    tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string()
}

fn detail(view: &OrderView) -> String {
    let mut out = String::new();
    if let Some(order) = &view.order {
        let _ = writeln!(out, "Order:     {}", output::cell(order.order_number.as_ref()));
        let _ = writeln!(out, "Created:   {}", output::cell(order.created_at.as_ref()));
        if let Some(customer) = &order.customer {
            let _ = writeln!(out, "Customer:  {}", customer.name);
            if let Some(email) = &customer.email {
                let _ = writeln!(out, "Email:     {email}");
            }
        }
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "{}", lines_table(&view.items));
    let _ = write!(out, "Grand total: {}", view.grand_total);
    out
}

fn cart_view(state: &AppState, order: Option<OrderDetail>) -> Result<OrderView, CliError> {
    let cart = state.orders().cart();
    Ok(OrderView {
        order,
        items: cart.items().iter().map(|i| (**i).clone()).collect(),
        grand_total: cart.grand_total()?,
    })
}

/// Collapse a rejected submission onto the order form's fields.
fn submit_error(err: CoreError) -> CliError {
    if err.fields().is_none() {
        return err.into();
    }
    let form = OrderFormErrors::from_error(&err);
    let mut details: Vec<String> = Vec::new();
    if let Some(customer) = form.customer {
        details.push(format!("customer: {customer}"));
    }
    if let Some(products) = form.products {
        details.push(format!("products: {products}"));
    }
    details.extend(form.other.iter().map(|(k, v)| format!("{k}: {v}")));
    CliError::FieldErrors {
        message: err.to_string(),
        details: details.join("\n"),
    }
}

// ── Order entry ─────────────────────────────────────────────────────

async fn fill_cart(state: &AppState, items: &[ItemSpec]) -> Result<(), CliError> {
    let cart = state.orders().cart();
    for spec in items {
        let product = state
            .products()
            .get_one(&spec.product)
            .await
            .map_err(|e| CliError::from(e).for_resource("product", &spec.product.to_string()))?;
        let price = product.price.ok_or_else(|| CliError::Validation {
            field: "item".into(),
            reason: format!("product {} has no price", spec.product),
        })?;
        let label = product
            .name
            .clone()
            .unwrap_or_else(|| spec.product.to_string());
        cart.add_item(
            OptionRef::new(spec.product.clone(), label),
            price,
            spec.quantity,
            spec.discount,
        )?;
    }
    Ok(())
}

async fn create(
    state: &AppState,
    customer: &str,
    items: &[String],
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let specs = items
        .iter()
        .map(|raw| util::parse_item(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let customer_id = EntityId::from(customer);
    let found = state
        .customers()
        .get_one(&customer_id)
        .await
        .map_err(|e| CliError::from(e).for_resource("customer", customer))?;
    let customer_ref = OptionRef::new(customer_id, found.full_name());

    fill_cart(state, &specs).await?;
    let view = cart_view(state, None)?;

    let spinner = output::spinner("Placing order...", global.quiet);
    let result = state.orders().cart().submit(&customer_ref).await;
    spinner.finish_and_clear();
    result.map_err(submit_error)?;

    let out = output::render_single(&global.output, &view, detail, |v| v.grand_total.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    state: &AppState,
    args: OrdersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        OrdersCommand::List => {
            let spinner = output::spinner("Loading orders...", global.quiet);
            let rows = state.orders().fetch_list().await;
            spinner.finish_and_clear();
            let rows = rows?;
            let out = output::render_list(
                &global.output,
                &rows,
                |o| OrderRow::from(o),
                |o| o.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrdersCommand::Get { id } => {
            let order = state
                .orders()
                .cart()
                .load_from_order(&EntityId::from(id.as_str()))
                .await
                .map_err(|e| CliError::from(e).for_resource("order", &id))?;
            let view = cart_view(state, Some(order))?;
            let out =
                output::render_single(&global.output, &view, detail, |v| v.grand_total.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrdersCommand::Create { customer, items } => create(state, &customer, &items, global).await,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn rejected_submission_lists_form_fields() {
        let err = CoreError::FieldErrors {
            status: 422,
            message: "The given data was invalid.".into(),
            fields: BTreeMap::from([
                ("customer_id".to_owned(), "The customer id field is required.".to_owned()),
                ("note".to_owned(), "Too long".to_owned()),
            ]),
        };
        let CliError::FieldErrors { message, details } = submit_error(err) else {
            panic!("expected field errors");
        };
        assert_eq!(message, "The given data was invalid.");
        assert_eq!(
            details,
            "customer: The customer id field is required.\n\
             products: Please select a product to edit\n\
             note: Too long"
        );
    }

    #[test]
    fn global_rejection_passes_through() {
        let err = CoreError::GlobalError {
            status: 500,
            message: "Server Error".into(),
        };
        assert!(matches!(
            submit_error(err),
            CliError::ApiError { status: 500, .. }
        ));
    }
}
