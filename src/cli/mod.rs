use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};

use crate::application::{InventoryWrite, LedgerService};
use crate::domain::{
    CustomerTransactionInput, InventoryInput, MaintenanceInput, RecordId, StockedItem, TripInput,
    format_cents,
};

/// Haulage - record keeping for small trucking operations
#[derive(Parser)]
#[command(name = "haulage")]
#[command(about = "Trips, maintenance, inventory, customer accounts and driver pay in one local ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "haulage.db", global = true)]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Trip management commands
    #[command(subcommand)]
    Trip(TripCommands),

    /// Vehicle maintenance commands
    #[command(subcommand)]
    Maintenance(MaintenanceCommands),

    /// Inventory commands
    Inventory {
        /// Quantity at or below which an item counts as low stock
        #[arg(short, long, default_value_t = crate::domain::DEFAULT_LOW_STOCK_THRESHOLD, allow_negative_numbers = true)]
        threshold: i64,

        #[command(subcommand)]
        command: InventoryCommands,
    },

    /// Customer ledger commands
    #[command(subcommand)]
    Customer(CustomerCommands),

    /// Show driver payments derived from trips
    Drivers {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show business totals
    Summary {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: trips, maintenance, inventory, customers, balances, drivers, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Copy the database into a timestamped backup file
    Backup {
        /// Directory to write the backup into
        #[arg(long, default_value = "backups")]
        dir: String,
    },
}

#[derive(Args)]
pub struct TripArgs {
    /// Trip date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// Client name
    #[arg(long)]
    client: String,

    /// Cargo type
    #[arg(long)]
    cargo: String,

    /// Route (e.g., "Chicago to Detroit")
    #[arg(long)]
    route: String,

    /// Trip income (e.g., "1200" or "1200.00")
    #[arg(long, allow_hyphen_values = true)]
    income: String,

    /// Fuel expense
    #[arg(long, allow_hyphen_values = true)]
    fuel: String,

    /// Driver name
    #[arg(long)]
    driver: String,
}

impl From<TripArgs> for TripInput {
    fn from(args: TripArgs) -> Self {
        TripInput {
            date: args.date.unwrap_or_else(today),
            client: args.client,
            cargo: args.cargo,
            route: args.route,
            income: args.income,
            fuel: args.fuel,
            driver: args.driver,
        }
    }
}

#[derive(Subcommand)]
pub enum TripCommands {
    /// Record a new trip
    Add(TripArgs),

    /// Replace every field of an existing trip
    Update {
        id: RecordId,

        #[command(flatten)]
        trip: TripArgs,
    },

    /// Delete a trip
    Delete { id: RecordId },

    /// List trips, most recent first
    List {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show a single trip
    Show { id: RecordId },
}

#[derive(Args)]
pub struct MaintenanceArgs {
    /// Vehicle plate number
    #[arg(long)]
    plate: String,

    /// Service date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// What was done
    #[arg(long)]
    description: String,

    /// Service cost
    #[arg(long, allow_hyphen_values = true)]
    cost: String,
}

impl From<MaintenanceArgs> for MaintenanceInput {
    fn from(args: MaintenanceArgs) -> Self {
        MaintenanceInput {
            plate: args.plate,
            service_date: args.date.unwrap_or_else(today),
            description: args.description,
            cost: args.cost,
        }
    }
}

#[derive(Subcommand)]
pub enum MaintenanceCommands {
    /// Record a service
    Add(MaintenanceArgs),

    /// Replace every field of an existing maintenance record
    Update {
        id: RecordId,

        #[command(flatten)]
        record: MaintenanceArgs,
    },

    /// Delete a maintenance record
    Delete { id: RecordId },

    /// List maintenance records, most recent first
    List {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show a single maintenance record
    Show { id: RecordId },
}

#[derive(Args)]
pub struct InventoryArgs {
    /// Item name (must be unique, case-sensitive)
    #[arg(long)]
    name: String,

    /// Units in stock
    #[arg(long, allow_hyphen_values = true)]
    quantity: String,

    /// Purchase price per unit
    #[arg(long, allow_hyphen_values = true)]
    purchase_price: String,

    /// Sale price per unit
    #[arg(long, allow_hyphen_values = true)]
    sale_price: String,
}

impl From<InventoryArgs> for InventoryInput {
    fn from(args: InventoryArgs) -> Self {
        InventoryInput {
            name: args.name,
            quantity: args.quantity,
            purchase_price: args.purchase_price,
            sale_price: args.sale_price,
        }
    }
}

#[derive(Subcommand)]
pub enum InventoryCommands {
    /// Add a stock item
    Add(InventoryArgs),

    /// Replace every field of an existing item
    Update {
        id: RecordId,

        #[command(flatten)]
        item: InventoryArgs,
    },

    /// Delete an item
    Delete { id: RecordId },

    /// List items with stock status
    List {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show a single item
    Show { id: RecordId },

    /// List items at or below the low-stock threshold
    Low,
}

#[derive(Args)]
pub struct CustomerArgs {
    /// Customer name
    #[arg(long)]
    customer: String,

    /// Transaction date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// Amount charged to the customer
    #[arg(long, allow_hyphen_values = true)]
    owed: String,

    /// Amount the customer paid
    #[arg(long, allow_hyphen_values = true)]
    paid: String,
}

impl From<CustomerArgs> for CustomerTransactionInput {
    fn from(args: CustomerArgs) -> Self {
        CustomerTransactionInput {
            customer: args.customer,
            date: args.date.unwrap_or_else(today),
            owed: args.owed,
            paid: args.paid,
        }
    }
}

#[derive(Subcommand)]
pub enum CustomerCommands {
    /// Record a charge and/or payment
    Add(CustomerArgs),

    /// Replace every field of an existing transaction
    Update {
        id: RecordId,

        #[command(flatten)]
        transaction: CustomerArgs,
    },

    /// Delete a transaction
    Delete { id: RecordId },

    /// List transactions, most recent first
    List {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show a single transaction
    Show { id: RecordId },

    /// Show outstanding balances per customer
    Balances {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Trip(cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_trip_command(&service, cmd).await?;
            }

            Commands::Maintenance(cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_maintenance_command(&service, cmd).await?;
            }

            Commands::Inventory { threshold, command } => {
                let mut service = LedgerService::connect(&self.database).await?;
                service.inventory_mut().set_threshold(threshold)?;
                run_inventory_command(&service, command).await?;
            }

            Commands::Customer(cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_customer_command(&service, cmd).await?;
            }

            Commands::Drivers { format } => {
                let service = LedgerService::connect(&self.database).await?;
                run_drivers_command(&service, &format).await?;
            }

            Commands::Summary { format } => {
                let service = LedgerService::connect(&self.database).await?;
                run_summary_command(&service, &format).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }

            Commands::Backup { dir } => {
                let service = LedgerService::connect(&self.database).await?;
                let path = service.backup(std::path::Path::new(&dir)).await?;
                println!("Database backed up to {}", path.display());
            }
        }

        Ok(())
    }
}

async fn run_trip_command(service: &LedgerService, cmd: TripCommands) -> Result<()> {
    let trips = service.trips();
    match cmd {
        TripCommands::Add(args) => {
            let trip = trips.add(&args.into()).await?;
            println!("Added trip {} for {}", trip.id, trip.data.client);
        }

        TripCommands::Update { id, trip } => {
            trips.update(id, &trip.into()).await?;
            println!("Updated trip {}", id);
        }

        TripCommands::Delete { id } => {
            trips.delete(id).await?;
            println!("Deleted trip {}", id);
        }

        TripCommands::List { format } => {
            let records = trips.list().await?;
            if is_json(&format)? {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No trips found.");
                return Ok(());
            }

            println!(
                "{:<6} {:<12} {:<20} {:<14} {:<24} {:>12} {:>10} {:<16}",
                "ID", "DATE", "CLIENT", "CARGO", "ROUTE", "INCOME", "FUEL", "DRIVER"
            );
            println!("{}", "-".repeat(121));
            for record in records {
                let t = &record.data;
                println!(
                    "{:<6} {:<12} {:<20} {:<14} {:<24} {:>12} {:>10} {:<16}",
                    record.id,
                    truncate(&t.date, 12),
                    truncate(&t.client, 20),
                    truncate(&t.cargo, 14),
                    truncate(&t.route, 24),
                    format_cents(t.income_cents),
                    format_cents(t.fuel_cents),
                    truncate(&t.driver, 16)
                );
            }
        }

        TripCommands::Show { id } => {
            let record = trips.get(id).await?;
            let t = &record.data;
            println!("Trip {}", record.id);
            println!("  Date:    {}", t.date);
            println!("  Client:  {}", t.client);
            println!("  Cargo:   {}", t.cargo);
            println!("  Route:   {}", t.route);
            println!("  Driver:  {}", t.driver);
            println!("  Income:  {}", format_cents(t.income_cents));
            println!("  Fuel:    {}", format_cents(t.fuel_cents));
            println!("  Net:     {}", format_cents(t.net_cents()));
        }
    }
    Ok(())
}

async fn run_maintenance_command(service: &LedgerService, cmd: MaintenanceCommands) -> Result<()> {
    let maintenance = service.maintenance();
    match cmd {
        MaintenanceCommands::Add(args) => {
            let record = maintenance.add(&args.into()).await?;
            println!(
                "Added maintenance record {} for {}",
                record.id, record.data.plate
            );
        }

        MaintenanceCommands::Update { id, record } => {
            maintenance.update(id, &record.into()).await?;
            println!("Updated maintenance record {}", id);
        }

        MaintenanceCommands::Delete { id } => {
            maintenance.delete(id).await?;
            println!("Deleted maintenance record {}", id);
        }

        MaintenanceCommands::List { format } => {
            let records = maintenance.list().await?;
            if is_json(&format)? {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No maintenance records found.");
                return Ok(());
            }

            println!(
                "{:<6} {:<12} {:<12} {:<36} {:>12}",
                "ID", "PLATE", "DATE", "DESCRIPTION", "COST"
            );
            println!("{}", "-".repeat(82));
            for record in records {
                let m = &record.data;
                println!(
                    "{:<6} {:<12} {:<12} {:<36} {:>12}",
                    record.id,
                    truncate(&m.plate, 12),
                    truncate(&m.service_date, 12),
                    truncate(&m.description, 36),
                    format_cents(m.cost_cents)
                );
            }
        }

        MaintenanceCommands::Show { id } => {
            let record = maintenance.get(id).await?;
            let m = &record.data;
            println!("Maintenance record {}", record.id);
            println!("  Plate:        {}", m.plate);
            println!("  Service date: {}", m.service_date);
            println!("  Description:  {}", m.description);
            println!("  Cost:         {}", format_cents(m.cost_cents));
        }
    }
    Ok(())
}

async fn run_inventory_command(service: &LedgerService, cmd: InventoryCommands) -> Result<()> {
    let inventory = service.inventory();
    match cmd {
        InventoryCommands::Add(args) => {
            let written = inventory.add(&args.into()).await?;
            println!(
                "Added item {}: {} (value {})",
                written.item.id,
                written.item.item.name,
                format_cents(written.item.total_value_cents)
            );
            print_low_stock_warning(&written);
        }

        InventoryCommands::Update { id, item } => {
            let written = inventory.update(id, &item.into()).await?;
            println!(
                "Updated item {}: {} (value {})",
                id,
                written.item.item.name,
                format_cents(written.item.total_value_cents)
            );
            print_low_stock_warning(&written);
        }

        InventoryCommands::Delete { id } => {
            inventory.delete(id).await?;
            println!("Deleted item {}", id);
        }

        InventoryCommands::List { format } => {
            let items = inventory.list().await?;
            if is_json(&format)? {
                return print_json(&items);
            }
            print_stock_table(&items, "No inventory items found.");
        }

        InventoryCommands::Show { id } => {
            let stocked = inventory.get(id).await?;
            let item = &stocked.item;
            println!("Item {}", stocked.id);
            println!("  Name:           {}", item.name);
            println!("  Quantity:       {}", item.quantity);
            println!("  Purchase price: {}", format_cents(item.purchase_price_cents));
            println!("  Sale price:     {}", format_cents(item.sale_price_cents));
            println!("  Total value:    {}", format_cents(stocked.total_value_cents));
            println!(
                "  Status:         {} (threshold {})",
                stocked.status,
                inventory.threshold()
            );
        }

        InventoryCommands::Low => {
            let items = inventory.check_low_stock().await?;
            print_stock_table(&items, "No items are low on stock.");
            if !items.is_empty() {
                println!();
                println!(
                    "{} item(s) at or below {} units.",
                    items.len(),
                    inventory.threshold()
                );
            }
        }
    }
    Ok(())
}

async fn run_customer_command(service: &LedgerService, cmd: CustomerCommands) -> Result<()> {
    let customers = service.customers();
    match cmd {
        CustomerCommands::Add(args) => {
            let tx = customers.add(&args.into()).await?;
            println!(
                "Added transaction {} for {} (balance {})",
                tx.id,
                tx.data.customer,
                format_cents(tx.data.balance_cents())
            );
        }

        CustomerCommands::Update { id, transaction } => {
            customers.update(id, &transaction.into()).await?;
            println!("Updated transaction {}", id);
        }

        CustomerCommands::Delete { id } => {
            customers.delete(id).await?;
            println!("Deleted transaction {}", id);
        }

        CustomerCommands::List { format } => {
            let transactions = customers.list().await?;
            if is_json(&format)? {
                return print_json(&transactions);
            }
            if transactions.is_empty() {
                println!("No customer transactions found.");
                return Ok(());
            }

            println!(
                "{:<6} {:<24} {:<12} {:>12} {:>12} {:>12}",
                "ID", "CUSTOMER", "DATE", "OWED", "PAID", "BALANCE"
            );
            println!("{}", "-".repeat(83));
            for tx in transactions {
                let c = &tx.data;
                println!(
                    "{:<6} {:<24} {:<12} {:>12} {:>12} {:>12}",
                    tx.id,
                    truncate(&c.customer, 24),
                    truncate(&c.date, 12),
                    format_cents(c.owed_cents),
                    format_cents(c.paid_cents),
                    format_cents(c.balance_cents())
                );
            }
        }

        CustomerCommands::Show { id } => {
            let tx = customers.get(id).await?;
            let c = &tx.data;
            println!("Transaction {}", tx.id);
            println!("  Customer: {}", c.customer);
            println!("  Date:     {}", c.date);
            println!("  Owed:     {}", format_cents(c.owed_cents));
            println!("  Paid:     {}", format_cents(c.paid_cents));
            println!("  Balance:  {}", format_cents(c.balance_cents()));
        }

        CustomerCommands::Balances { format } => {
            let balances = customers.balances().await?;
            if is_json(&format)? {
                return print_json(&balances);
            }
            if balances.is_empty() {
                println!("All customer accounts are settled.");
                return Ok(());
            }

            println!("{:<30} {:>14}", "CUSTOMER", "BALANCE");
            println!("{}", "-".repeat(45));
            for entry in balances {
                let note = if entry.balance > 0 { "owes" } else { "credit" };
                println!(
                    "{:<30} {:>14}  {}",
                    truncate(&entry.customer, 30),
                    format_cents(entry.balance),
                    note
                );
            }
        }
    }
    Ok(())
}

async fn run_drivers_command(service: &LedgerService, format: &str) -> Result<()> {
    let report = service.driver_payments().compute().await?;
    if is_json(format)? {
        return print_json(&report);
    }

    println!(
        "{:<24} {:>6} {:>14} {:>14} {:>14}",
        "DRIVER", "TRIPS", "INCOME", "FUEL", "NET PAYMENT"
    );
    println!("{}", "-".repeat(76));
    for line in report.lines() {
        if line.is_total() {
            println!("{}", "-".repeat(76));
        }
        let (income, fuel, net) = line.amounts();
        println!(
            "{:<24} {:>6} {:>14} {:>14} {:>14}",
            truncate(line.label(), 24),
            line.trip_count(),
            format_cents(income),
            format_cents(fuel),
            format_cents(net)
        );
    }
    Ok(())
}

async fn run_summary_command(service: &LedgerService, format: &str) -> Result<()> {
    let summary = service.summary().await?;
    if is_json(format)? {
        return print_json(&summary);
    }

    println!("Business summary");
    println!("  Trips:            {}", summary.trip_count);
    println!("  Income:           {}", format_cents(summary.total_income));
    println!("  Fuel:             {}", format_cents(summary.total_fuel));
    println!(
        "  Maintenance:      {} ({} record(s))",
        format_cents(summary.maintenance_cost),
        summary.maintenance_count
    );
    println!("  Net profit:       {}", format_cents(summary.net_profit));
    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let (count, what) = match export_type {
        "trips" => (exporter.export_trips_csv(writer).await?, "trips"),
        "maintenance" => (
            exporter.export_maintenance_csv(writer).await?,
            "maintenance records",
        ),
        "inventory" => (exporter.export_inventory_csv(writer).await?, "inventory items"),
        "customers" => (
            exporter.export_customer_transactions_csv(writer).await?,
            "customer transactions",
        ),
        "balances" => (exporter.export_balances_csv(writer).await?, "customer balances"),
        "drivers" => (
            exporter.export_driver_payments_csv(writer).await?,
            "driver payment rows",
        ),
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} trips, {} maintenance records, {} inventory items, {} customer transactions",
                    snapshot.trips.len(),
                    snapshot.maintenance.len(),
                    snapshot.inventory.len(),
                    snapshot.customer_transactions.len()
                );
            }
            return Ok(());
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: trips, maintenance, inventory, customers, balances, drivers, full",
                export_type
            );
        }
    };

    if output.is_some() {
        eprintln!("Exported {} {}", count, what);
    }
    Ok(())
}

fn print_low_stock_warning(written: &InventoryWrite) {
    if let Some(warning) = &written.low_stock {
        eprintln!("Warning: {}", warning);
    }
}

fn print_stock_table(items: &[StockedItem], empty_message: &str) {
    if items.is_empty() {
        println!("{}", empty_message);
        return;
    }

    println!(
        "{:<6} {:<24} {:>8} {:>12} {:>12} {:>14} {:<6}",
        "ID", "NAME", "QTY", "PURCHASE", "SALE", "VALUE", "STATUS"
    );
    println!("{}", "-".repeat(88));
    for stocked in items {
        let item = &stocked.item;
        println!(
            "{:<6} {:<24} {:>8} {:>12} {:>12} {:>14} {:<6}",
            stocked.id,
            truncate(&item.name, 24),
            item.quantity,
            format_cents(item.purchase_price_cents),
            format_cents(item.sale_price_cents),
            format_cents(stocked.total_value_cents),
            stocked.status
        );
    }
}

fn is_json(format: &str) -> Result<bool> {
    match format {
        "table" => Ok(false),
        "json" => Ok(true),
        other => anyhow::bail!("Invalid format '{}'. Valid formats: table, json", other),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer name", 10), "a much ...");
    }

    #[test]
    fn test_is_json_rejects_unknown_format() {
        assert!(!is_json("table").unwrap());
        assert!(is_json("json").unwrap());
        assert!(is_json("xml").is_err());
    }

    #[test]
    fn test_cli_parses_trip_add() {
        let cli = Cli::try_parse_from([
            "haulage", "trip", "add", "--date", "2024-05-05", "--client", "ABC Shipping",
            "--cargo", "Electronics", "--route", "NY to Boston", "--income", "1200",
            "--fuel", "250", "--driver", "John Smith",
        ])
        .unwrap();

        match cli.command {
            Commands::Trip(TripCommands::Add(args)) => {
                let input: TripInput = args.into();
                assert_eq!(input.client, "ABC Shipping");
                assert_eq!(input.date, "2024-05-05");
            }
            _ => panic!("expected trip add"),
        }
    }

    #[test]
    fn test_cli_inventory_threshold_defaults_to_five() {
        let cli = Cli::try_parse_from(["haulage", "inventory", "low"]).unwrap();
        match cli.command {
            Commands::Inventory { threshold, .. } => assert_eq!(threshold, 5),
            _ => panic!("expected inventory"),
        }
    }
}
