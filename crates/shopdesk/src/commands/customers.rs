//! Customer command handlers.

use std::sync::Arc;

use tabled::Tabled;

use shopdesk_core::{AppState, Customer, CustomerInput, EntityId, OptionRef};

use crate::cli::{CustomerFields, CustomersArgs, CustomersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Zip")]
    zip: String,
}

impl From<&Arc<Customer>> for CustomerRow {
    fn from(c: &Arc<Customer>) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.full_name(),
            email: output::cell(c.email.as_ref()),
            phone: output::cell(c.phone_number.as_ref()),
            zip: output::cell(c.zip_code.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct OptionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
}

impl From<&OptionRef> for OptionRow {
    fn from(o: &OptionRef) -> Self {
        Self {
            id: output::cell(o.id.as_ref()),
            label: o.label.clone(),
        }
    }
}

fn detail(c: &Customer) -> String {
    [
        format!("ID:        {}", c.id),
        format!("Name:      {}", c.full_name()),
        format!("Email:     {}", output::cell(c.email.as_ref())),
        format!("Phone:     {}", output::cell(c.phone_number.as_ref())),
        format!("Zip code:  {}", output::cell(c.zip_code.as_ref())),
    ]
    .join("\n")
}

impl From<CustomerFields> for CustomerInput {
    fn from(f: CustomerFields) -> Self {
        Self {
            first_name: f.first_name,
            last_name: f.last_name,
            email: f.email,
            phone_number: f.phone_number,
            zip_code: f.zip_code,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    state: &AppState,
    args: CustomersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = state.customers();
    match args.command {
        CustomersCommand::List => {
            let spinner = output::spinner("Loading customers...", global.quiet);
            let rows = store.fetch_list().await;
            spinner.finish_and_clear();
            let rows = rows?;
            let out = output::render_list(
                &global.output,
                &rows,
                |c| CustomerRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Get { id } => {
            let customer = store
                .get_one(&EntityId::from(id.as_str()))
                .await
                .map_err(|e| CliError::from(e).for_resource("customer", &id))?;
            let out = output::render_single(&global.output, &customer, detail, |c| {
                c.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Create(fields) => {
            store.create_customer(&CustomerInput::from(fields)).await?;
            Ok(())
        }

        CustomersCommand::Update { id, fields } => {
            store
                .update_customer(&EntityId::from(id.as_str()), &CustomerInput::from(fields))
                .await
                .map_err(|e| CliError::from(e).for_resource("customer", &id))?;
            Ok(())
        }

        CustomersCommand::Delete { id } => {
            let deleted = util::confirm_delete(state, store, EntityId::from(id.as_str()), global)
                .await
                .map_err(|e| e.for_resource("customer", &id))?;
            if deleted.is_none() && !global.quiet {
                eprintln!("Aborted");
            }
            Ok(())
        }

        CustomersCommand::Search { query } => {
            let hits = store.search(&query).await?;
            let out = output::render_list(
                &global.output,
                &hits,
                |o| OptionRow::from(o),
                |o| output::cell(o.id.as_ref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
