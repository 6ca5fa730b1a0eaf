//! Interactive storefront session.
//!
//! Reads one command per line from stdin and prints a frame whenever the
//! storefront state changes. Each category selection is awaited before the
//! next line is read, so piped scripts behave deterministically.
//!
//! # Usage
//!
//! ```bash
//! printf 'category 1\nadd 4\nshow\nquit\n' | greenroot browse --json
//! ```

use greenroot_core::{CategoryId, Product, ProductId};
use greenroot_storefront::render::{CategoryPanel, DetailView, Frame, Presenter, ProductGrid};
use greenroot_storefront::{
    CatalogClient, CatalogSource, Error, Intent, Storefront, StorefrontConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::LocalSet;

use super::catalog::card_line;

const HELP: &str = "\
Commands:
  all                 show every tree
  category <id>       show the trees of one category
  add <product-id>    add one unit to the cart
  remove <product-id> remove a product's line from the cart
  clear               empty the cart
  detail <product-id> open the detail view
  close               close the detail view
  show                print the current frame again
  help                print this help
  quit                leave the session";

/// A parsed REPL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    All,
    Category(CategoryId),
    Add(String),
    Remove(ProductId),
    Clear,
    Detail(String),
    Close,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns a message for unknown commands or a missing argument.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let need = |arg: Option<&str>| {
        arg.map(str::to_string)
            .ok_or_else(|| format!("'{verb}' needs an id"))
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "all" => Command::All,
        "category" | "cat" => Command::Category(CategoryId::new(need(arg)?)),
        "add" => Command::Add(need(arg)?),
        "remove" | "rm" => Command::Remove(ProductId::new(need(arg)?)),
        "clear" => Command::Clear,
        "detail" => Command::Detail(need(arg)?),
        "close" => Command::Close,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

// =============================================================================
// Presenter
// =============================================================================

/// Prints frames to stdout as text or JSON lines.
pub struct TerminalPresenter {
    json: bool,
}

impl TerminalPresenter {
    #[must_use]
    pub const fn new(json: bool) -> Self {
        Self { json }
    }
}

impl Presenter for TerminalPresenter {
    #[allow(clippy::print_stdout)]
    fn present(&self, frame: &Frame) {
        if self.json {
            match serde_json::to_string(frame) {
                Ok(line) => println!("{line}"),
                Err(e) => Error::from(e).report(),
            }
        } else {
            println!("{}", format_frame(frame));
        }
    }
}

/// Render a frame as plain text.
#[must_use]
pub fn format_frame(frame: &Frame) -> String {
    let symbol = frame.currency_symbol;
    let mut lines = Vec::new();

    match &frame.categories {
        CategoryPanel::Loading => lines.push("Categories: loading...".to_string()),
        CategoryPanel::Failed(message) => lines.push(format!("Categories: {message}")),
        CategoryPanel::Ready(buttons) => {
            let labels: Vec<String> = buttons
                .iter()
                .map(|button| {
                    let id = button.id.as_ref().map_or_else(String::new, |id| format!("{id}:"));
                    if button.active {
                        format!("[{id}{}]", button.label)
                    } else {
                        format!("{id}{}", button.label)
                    }
                })
                .collect();
            lines.push(format!("Categories: {}", labels.join("  ")));
        }
    }

    match &frame.grid {
        ProductGrid::Loading => lines.push("Trees: loading...".to_string()),
        ProductGrid::Empty => lines.push("Trees: none in this category.".to_string()),
        ProductGrid::Error(message) => lines.push(format!("Trees: {message}")),
        ProductGrid::Cards(cards) => {
            lines.push(format!("Trees ({}):", cards.len()));
            lines.extend(cards.iter().map(|card| card_line(card, symbol)));
        }
    }

    if frame.cart.lines.is_empty() {
        lines.push("Cart: empty".to_string());
    } else {
        lines.push(format!("Cart ({} items):", frame.cart.item_count));
        lines.extend(frame.cart.lines.iter().map(|line| {
            format!(
                "  {} x{} @ {symbol}{} = {symbol}{}",
                line.name, line.quantity, line.unit_price, line.line_total
            )
        }));
    }
    lines.push(format!("Total: {symbol}{}", frame.cart.total));

    match &frame.detail {
        None => {}
        Some(DetailView::Loading) => lines.push("Detail: loading...".to_string()),
        Some(DetailView::Ready(detail)) => {
            lines.push(format!(
                "Detail: {} [{}] {symbol}{}",
                detail.name, detail.category, detail.price
            ));
            lines.push(format!("  {}", detail.image_url));
            lines.push(format!("  {}", detail.description));
        }
    }

    if let Some(notice) = &frame.notice {
        lines.push(format!("* {notice}"));
    }

    lines.join("\n")
}

// =============================================================================
// Session loop
// =============================================================================

/// Run an interactive session against the configured catalog API.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or stdin fails.
pub async fn run(config: &StorefrontConfig, json: bool) -> greenroot_storefront::Result<()> {
    let client = CatalogClient::new(&config.catalog)?;
    let store = Storefront::new(client, TerminalPresenter::new(json), config.display);

    LocalSet::new()
        .run_until(session_loop(&store, json))
        .await
}

#[allow(clippy::print_stdout)]
async fn session_loop<S, P>(store: &Storefront<S, P>, json: bool) -> greenroot_storefront::Result<()>
where
    S: CatalogSource + 'static,
    P: Presenter + 'static,
{
    store.start().await;
    if !json {
        println!("{HELP}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => println!("{HELP}"),
            Ok(Some(command)) => execute(store, command).await,
            Err(message) => tracing::warn!("{message}"),
        }
    }

    tracing::info!("Session ended");
    Ok(())
}

/// Apply one command, waiting for any fetch it starts.
pub async fn execute<S, P>(store: &Storefront<S, P>, command: Command)
where
    S: CatalogSource + 'static,
    P: Presenter + 'static,
{
    let intent = match command {
        Command::All => Intent::SelectCategory(None),
        Command::Category(id) => Intent::SelectCategory(Some(id)),
        Command::Remove(id) => Intent::RemoveFromCart(id),
        Command::Clear => Intent::ClearCart,
        Command::Close => Intent::CloseDetail,
        Command::Add(id) => match lookup(store, id) {
            Some(product) => Intent::AddToCart(product),
            None => return,
        },
        Command::Detail(id) => match lookup(store, id) {
            Some(product) => Intent::OpenDetail(product),
            None => return,
        },
        Command::Show => {
            store.refresh();
            return;
        }
        Command::Help | Command::Quit => return,
    };

    if let Some(handle) = store.dispatch(intent) {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Catalog load task failed");
        }
    }
}

/// Find a displayed product, reporting unknown ids.
fn lookup<S, P>(store: &Storefront<S, P>, id: String) -> Option<Product>
where
    S: CatalogSource + 'static,
    P: Presenter + 'static,
{
    let product = store.product(&id);
    if product.is_none() {
        Error::UnknownProduct(id).report();
    }
    product
}
