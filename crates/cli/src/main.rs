use std::io;

use anyhow::Context;
use clap::Parser;

use stockroom_cli::{Cli, demo};
use stockroom_inventory::Inventory;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    stockroom_observability::init(&cli.observability_config())
        .context("failed to initialize diagnostics")?;

    let mut inventory = Inventory::with_config(cli.inventory_config());
    let mut stdout = io::stdout().lock();
    demo::run(&mut inventory, &mut stdout)
}
