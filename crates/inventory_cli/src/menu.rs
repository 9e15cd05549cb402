//! Interactive menu dispatcher.
//!
//! # Responsibility
//! - Map a numeric menu choice to exactly one core use-case per iteration.
//! - Collect raw field text from the input and print rendered lines.
//!
//! # Invariants
//! - Each use-case runs inside its own `with_inventory` connection scope.
//! - Operation errors are printed and the loop continues; only I/O failures
//!   on the terminal itself end the session.
//! - End of input behaves like choosing Exit.

use inventory_core::{
    parse_id, render_low_stock, render_products, with_inventory, DeleteOutcome, Palette,
    ProductDraft, ProductId, SearchCriteria, ServiceError, Store, TableCaption,
};
use log::info;
use std::io::{self, BufRead, Write};

/// Top-level menu options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Register,
    List,
    UpdateQuantity,
    Delete,
    Search,
    LowStockReport,
    Exit,
}

impl Command {
    pub fn from_choice(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::Register),
            "2" => Some(Self::List),
            "3" => Some(Self::UpdateQuantity),
            "4" => Some(Self::Delete),
            "5" => Some(Self::Search),
            "6" => Some(Self::LowStockReport),
            "0" => Some(Self::Exit),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

/// One interactive session over generic input/output handles.
pub struct Session<R, W> {
    store: Store,
    palette: Palette,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(store: Store, palette: Palette, input: R, output: W) -> Self {
        Self {
            store,
            palette,
            input,
            output,
        }
    }

    /// Runs the menu loop until Exit or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("\nSelect an option: ")? else {
                break;
            };

            let flow = match Command::from_choice(&choice) {
                Some(command) => {
                    info!("event=menu_dispatch module=cli status=start command={command:?}");
                    self.dispatch(command)?
                }
                None => {
                    self.error("\nInvalid option. Please try again.")?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                break;
            }
            if self.prompt("\nPress Enter to continue...")?.is_none() {
                break;
            }
        }
        self.line(&self.palette.success("\nGoodbye!"))?;
        self.output.flush()
    }

    fn dispatch(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Register => self.register(),
            Command::List => self.list(),
            Command::UpdateQuantity => self.update_quantity(),
            Command::Delete => self.delete(),
            Command::Search => self.search(),
            Command::LowStockReport => self.low_stock_report(),
            Command::Exit => Ok(Flow::Exit),
        }
    }

    fn register(&mut self) -> io::Result<Flow> {
        self.title("\n=== REGISTER NEW PRODUCT ===\n")?;
        let mut draft = ProductDraft::default();
        for (label, slot) in [
            ("Product name: ", &mut draft.name),
            ("Description: ", &mut draft.description),
            ("Quantity available: ", &mut draft.quantity),
            ("Price: ", &mut draft.price),
            ("Category: ", &mut draft.category),
        ] {
            let Some(value) = self.prompt(label)? else {
                return Ok(Flow::Exit);
            };
            *slot = value;
        }

        match with_inventory(&self.store, |service| service.register(&draft)) {
            Ok(product) => self.success(&format!(
                "\nProduct '{}' registered with id {}.",
                product.name, product.id
            ))?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn list(&mut self) -> io::Result<Flow> {
        self.title("\n=== PRODUCT LIST ===\n")?;
        match with_inventory(&self.store, |service| service.list()) {
            Ok(products) => {
                let lines = render_products(&products, TableCaption::Inventory, self.palette);
                self.lines(&lines)?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn update_quantity(&mut self) -> io::Result<Flow> {
        self.title("\n=== UPDATE PRODUCT QUANTITY ===\n")?;
        let Some(id) = self.prompt_id("Product id to update: ")? else {
            return Ok(Flow::Continue);
        };

        let product = match with_inventory(&self.store, |service| service.require(id)) {
            Ok(product) => product,
            Err(err) => {
                self.report(&err)?;
                return Ok(Flow::Continue);
            }
        };
        self.info(&format!(
            "Product: {} | Current quantity: {}",
            product.name, product.quantity
        ))?;

        let Some(raw_quantity) = self.prompt("New quantity: ")? else {
            return Ok(Flow::Exit);
        };
        match with_inventory(&self.store, |service| {
            service.update_quantity(id, &raw_quantity)
        }) {
            Ok(change) => self.success(&format!(
                "\nQuantity updated: {} -> {}",
                change.previous, change.current
            ))?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> io::Result<Flow> {
        self.title("\n=== DELETE PRODUCT ===\n")?;
        let Some(id) = self.prompt_id("Product id to delete: ")? else {
            return Ok(Flow::Continue);
        };

        let product = match with_inventory(&self.store, |service| service.require(id)) {
            Ok(product) => product,
            Err(err) => {
                self.report(&err)?;
                return Ok(Flow::Continue);
            }
        };

        let question = self
            .palette
            .error(&format!("Delete '{}'? (s/n): ", product.name));
        let Some(token) = self.prompt_painted(&question)? else {
            return Ok(Flow::Exit);
        };

        match with_inventory(&self.store, |service| service.delete(id, &token)) {
            Ok(DeleteOutcome::Deleted(product)) => {
                self.success(&format!("\nProduct '{}' deleted.", product.name))?
            }
            Ok(DeleteOutcome::Cancelled(_)) => self.info("Operation cancelled.")?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self) -> io::Result<Flow> {
        self.title("\n=== SEARCH PRODUCTS ===\n")?;
        for (key, label) in [
            ("1.", " Search by id"),
            ("2.", " Search by name"),
            ("3.", " Search by category"),
            ("0.", " Back to main menu"),
        ] {
            let line = format!("{}{label}", self.palette.menu(key));
            self.line(&line)?;
        }

        let Some(choice) = self.prompt("\nSelect an option: ")? else {
            return Ok(Flow::Exit);
        };
        let criteria = match choice.trim() {
            "1" => match self.prompt_id("Enter the id: ")? {
                Some(id) => SearchCriteria::ById(id),
                None => return Ok(Flow::Continue),
            },
            "2" => match self.prompt("Enter the name to search: ")? {
                Some(needle) => SearchCriteria::NameContains(needle),
                None => return Ok(Flow::Exit),
            },
            "3" => match self.prompt("Enter the category to search: ")? {
                Some(needle) => SearchCriteria::CategoryContains(needle),
                None => return Ok(Flow::Exit),
            },
            "0" => return Ok(Flow::Continue),
            _ => {
                self.error("Invalid option.")?;
                return Ok(Flow::Continue);
            }
        };

        match with_inventory(&self.store, |service| service.search(&criteria)) {
            Ok(products) => {
                if !products.is_empty() {
                    self.title("\n=== SEARCH RESULTS ===\n")?;
                }
                let lines = render_products(&products, TableCaption::SearchResults, self.palette);
                self.lines(&lines)?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn low_stock_report(&mut self) -> io::Result<Flow> {
        self.title("\n=== LOW STOCK REPORT ===\n")?;
        let Some(raw_threshold) = self.prompt("Enter the stock threshold: ")? else {
            return Ok(Flow::Exit);
        };

        match with_inventory(&self.store, |service| {
            service.low_stock_report(&raw_threshold)
        }) {
            Ok(report) => {
                let lines = render_low_stock(&report, self.palette);
                self.lines(&lines)?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn print_menu(&mut self) -> io::Result<()> {
        self.title("\n=== INVENTORY MANAGEMENT SYSTEM ===\n")?;
        for (key, label) in [
            ("1.", " Register new product"),
            ("2.", " List all products"),
            ("3.", " Update product quantity"),
            ("4.", " Delete product"),
            ("5.", " Search products"),
            ("6.", " Low stock report"),
            ("0.", " Exit"),
        ] {
            let line = format!("{}{label}", self.palette.menu(key));
            self.line(&line)?;
        }
        Ok(())
    }

    /// Prompts for an id; a malformed id is reported and yields `None`.
    fn prompt_id(&mut self, label: &str) -> io::Result<Option<ProductId>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        match parse_id(&raw) {
            Ok(id) => Ok(Some(id)),
            Err(err) => {
                self.report(&ServiceError::Validation(err))?;
                Ok(None)
            }
        }
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        let painted = self.palette.info(label);
        self.prompt_painted(&painted)
    }

    /// Returns `None` at end of input.
    fn prompt_painted(&mut self, painted: &str) -> io::Result<Option<String>> {
        write!(self.output, "{painted}")?;
        self.output.flush()?;

        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn report(&mut self, err: &ServiceError) -> io::Result<()> {
        self.error(&format!("Error: {err}"))
    }

    fn title(&mut self, text: &str) -> io::Result<()> {
        let painted = self.palette.title(text);
        self.line(&painted)
    }

    fn info(&mut self, text: &str) -> io::Result<()> {
        let painted = self.palette.info(text);
        self.line(&painted)
    }

    fn success(&mut self, text: &str) -> io::Result<()> {
        let painted = self.palette.success(text);
        self.line(&painted)
    }

    fn error(&mut self, text: &str) -> io::Result<()> {
        let painted = self.palette.error(text);
        self.line(&painted)
    }

    fn lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            self.line(line)?;
        }
        Ok(())
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, Session};
    use inventory_core::{with_inventory, Palette, Store};
    use std::io::Cursor;

    fn run_script(store: &Store, script: &str) -> String {
        let mut output = Vec::new();
        Session::new(
            store.clone(),
            Palette::plain(),
            Cursor::new(script.as_bytes().to_vec()),
            &mut output,
        )
        .run()
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("inventario.db"));
        (dir, store)
    }

    #[test]
    fn choices_map_to_commands() {
        assert_eq!(Command::from_choice(" 1 "), Some(Command::Register));
        assert_eq!(Command::from_choice("6"), Some(Command::LowStockReport));
        assert_eq!(Command::from_choice("0"), Some(Command::Exit));
        assert_eq!(Command::from_choice("7"), None);
        assert_eq!(Command::from_choice(""), None);
    }

    #[test]
    fn register_then_list_shows_table() {
        let (_dir, store) = temp_store();
        let output = run_script(
            &store,
            "1\nBolt\nSteel bolt\n100\n0.15\nHardware\n\n2\n\n0\n",
        );

        assert!(output.contains("Product 'Bolt' registered with id 1."));
        assert!(output.contains("Total products: 1"));
        assert!(output.contains("$0.15"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn invalid_register_input_writes_nothing() {
        let (_dir, store) = temp_store();
        let output = run_script(&store, "1\nBolt\n\n-4\n1\n\n\n0\n");

        assert!(output.contains("Error: quantity cannot be negative"));
        let products = with_inventory(&store, |service| service.list()).unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn update_delete_and_low_stock_flow() {
        let (_dir, store) = temp_store();
        let output = run_script(
            &store,
            "1\nBolt\n\n100\n0.15\n\n\n\
             6\n50\n\n\
             3\n1\n0\n\n\
             6\n0\n\n\
             4\n1\nn\n\n\
             4\n1\ns\n\n\
             4\n1\n\n0\n",
        );

        assert!(output.contains("No products with stock at or below 50."));
        assert!(output.contains("Product: Bolt | Current quantity: 100"));
        assert!(output.contains("Quantity updated: 100 -> 0"));
        assert!(output.contains("<- OUT OF STOCK"));
        assert!(output.contains("Operation cancelled."));
        assert!(output.contains("Product 'Bolt' deleted."));
        assert!(output.contains("Error: no product found with id 1"));
    }

    #[test]
    fn search_by_name_and_bad_id() {
        let (_dir, store) = temp_store();
        let output = run_script(
            &store,
            "1\nWidget\n\n3\n2\nGadgets\n\n\
             5\n2\nWIDG\n\n\
             5\n1\nabc\n\n\
             5\n3\nnothing\n\n\
             9\n\n0\n",
        );

        assert!(output.contains("Products found: 1"));
        assert!(output.contains("Error: id must be an integer"));
        assert!(output.contains("No products matched the search criteria."));
        assert!(output.contains("Invalid option. Please try again."));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let (_dir, store) = temp_store();
        let output = run_script(&store, "1\nHalf");

        assert!(output.contains("Goodbye!"));
    }
}
