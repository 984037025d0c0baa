//! Clap derive structures for the `shopdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Compiled into `build.rs` as well, so it may only depend on clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// shopdesk -- back-office administration from the command line
#[derive(Debug, Parser)]
#[command(
    name = "shopdesk",
    version,
    about = "Manage shop customers, products and orders from the command line",
    long_about = "A back-office client for the shop administration API.\n\n\
        Log in once with `shopdesk login`; the bearer token is kept per\n\
        profile and replayed on every request until the server refuses it.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile to use
    #[arg(long, short = 'p', env = "SHOPDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL, e.g. http://localhost:8000/api (overrides profile)
    #[arg(long, env = "SHOPDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SHOPDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SHOPDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),

    /// End the session
    Logout,

    /// Show the active profile and session state
    Status,

    /// Manage customers
    #[command(alias = "cust", alias = "c")]
    Customers(CustomersArgs),

    /// Manage products
    #[command(alias = "prod", alias = "p")]
    Products(ProductsArgs),

    /// View and place orders
    #[command(alias = "ord", alias = "o")]
    Orders(OrdersArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email, then SHOPDESK_EMAIL)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (falls back to SHOPDESK_PASSWORD, the keyring, then a prompt)
    #[arg(long)]
    pub password: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CUSTOMERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List customers
    #[command(alias = "ls")]
    List,

    /// Show one customer
    Get {
        /// Customer ID
        id: String,
    },

    /// Create a customer
    Create(CustomerFields),

    /// Replace a customer's fields
    Update {
        /// Customer ID
        id: String,

        #[command(flatten)]
        fields: CustomerFields,
    },

    /// Delete a customer (asks for confirmation)
    #[command(alias = "rm")]
    Delete {
        /// Customer ID
        id: String,
    },

    /// Type-ahead search by name
    Search {
        /// Search text
        query: String,
    },
}

#[derive(Debug, Args)]
pub struct CustomerFields {
    /// First name
    #[arg(long)]
    pub first_name: String,

    /// Last name
    #[arg(long)]
    pub last_name: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Phone number
    #[arg(long, default_value = "")]
    pub phone_number: String,

    /// Zip code
    #[arg(long, default_value = "")]
    pub zip_code: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List,

    /// Show one product
    Get {
        /// Product ID
        id: String,
    },

    /// Create a product (an image is required)
    Create(ProductFields),

    /// Replace a product's fields
    Update {
        /// Product ID
        id: String,

        #[command(flatten)]
        fields: ProductFields,
    },

    /// Delete a product (asks for confirmation)
    #[command(alias = "rm")]
    Delete {
        /// Product ID
        id: String,
    },

    /// Type-ahead search by name
    Search {
        /// Search text
        query: String,
    },

    /// List product categories
    Categories,
}

#[derive(Debug, Args)]
pub struct ProductFields {
    /// Product name
    #[arg(long)]
    pub name: String,

    /// Category ID (see `shopdesk products categories`)
    #[arg(long)]
    pub category: String,

    /// Unit price, e.g. 19.99
    #[arg(long)]
    pub price: String,

    /// Units in stock
    #[arg(long, default_value = "0")]
    pub stock: i64,

    /// JPEG or PNG image, at most 5 MB
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ORDERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List orders
    #[command(alias = "ls")]
    List,

    /// Show an order with its line items and grand total
    Get {
        /// Order ID
        id: String,
    },

    /// Build a cart and submit it as a new order
    Create {
        /// Customer ID
        #[arg(long)]
        customer: String,

        /// Line item as PRODUCT_ID:QTY[:DISCOUNT%] (repeatable)
        #[arg(long = "item", short = 'i', value_name = "ITEM", required = true)]
        items: Vec<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key: api_url, email, password_env, token_store, ca_cert, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
