//! Product command handlers.

use std::sync::Arc;

use tabled::Tabled;

use shopdesk_core::{
    AppState, Category, EntityId, ImageUpload, Product, ProductInput, ProductOption,
};

use crate::cli::{GlobalOpts, ProductFields, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: String,
}

impl From<&Arc<Product>> for ProductRow {
    fn from(p: &Arc<Product>) -> Self {
        Self {
            id: p.id.to_string(),
            name: output::cell(p.name.as_ref()),
            category: output::cell(p.category.as_ref()),
            price: output::cell(p.price.as_ref()),
            stock: output::cell(p.stock.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct HitRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

fn detail(p: &Product) -> String {
    let mut lines = vec![
        format!("ID:        {}", p.id),
        format!("Name:      {}", output::cell(p.name.as_ref())),
        format!("Category:  {}", output::cell(p.category.as_ref())),
        format!("Price:     {}", output::cell(p.price.as_ref())),
        format!("Stock:     {}", output::cell(p.stock.as_ref())),
    ];
    if let Some(image) = &p.image {
        lines.push(format!("Image:     {image}"));
    }
    lines.join("\n")
}

fn product_input(fields: ProductFields) -> Result<ProductInput, CliError> {
    let image = fields
        .image
        .as_deref()
        .map(ImageUpload::from_path)
        .transpose()?;
    Ok(ProductInput {
        name: fields.name,
        category_id: EntityId::from(fields.category),
        price: util::parse_decimal("price", &fields.price)?,
        stock: fields.stock,
        image,
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    state: &AppState,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = state.products();
    match args.command {
        ProductsCommand::List => {
            let spinner = output::spinner("Loading products...", global.quiet);
            let rows = store.fetch_list().await;
            spinner.finish_and_clear();
            let rows = rows?;
            let out = output::render_list(
                &global.output,
                &rows,
                |p| ProductRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Get { id } => {
            let product = store
                .get_one(&EntityId::from(id.as_str()))
                .await
                .map_err(|e| CliError::from(e).for_resource("product", &id))?;
            let out =
                output::render_single(&global.output, &product, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Create(fields) => {
            let input = product_input(fields)?;
            let spinner = output::spinner("Uploading product...", global.quiet);
            let result = store.create_product(&input).await;
            spinner.finish_and_clear();
            result?;
            Ok(())
        }

        ProductsCommand::Update { id, fields } => {
            let input = product_input(fields)?;
            let spinner = output::spinner("Uploading product...", global.quiet);
            let result = store
                .update_product(&EntityId::from(id.as_str()), &input)
                .await;
            spinner.finish_and_clear();
            result.map_err(|e| CliError::from(e).for_resource("product", &id))?;
            Ok(())
        }

        ProductsCommand::Delete { id } => {
            let deleted = util::confirm_delete(state, store, EntityId::from(id.as_str()), global)
                .await
                .map_err(|e| e.for_resource("product", &id))?;
            if deleted.is_none() && !global.quiet {
                eprintln!("Aborted");
            }
            Ok(())
        }

        ProductsCommand::Search { query } => {
            let hits = store.search(&query).await?;
            let out = output::render_list(
                &global.output,
                &hits,
                |h: &ProductOption| HitRow {
                    id: output::cell(h.reference.id.as_ref()),
                    name: h.reference.label.clone(),
                    price: output::cell(h.price.as_ref()),
                },
                |h| output::cell(h.reference.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Categories => {
            let categories = store.categories().await?;
            let out = output::render_list(
                &global.output,
                &categories,
                |c: &Category| CategoryRow {
                    id: c.id.to_string(),
                    name: c.name.clone(),
                },
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
