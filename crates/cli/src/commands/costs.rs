use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::commands::load_config;

#[derive(Debug, Serialize)]
pub struct CostEntry {
    pub mnemonic: String,
    pub cycles: u32,
}

/// Effective cost table: built-in worst-case counts plus config overrides.
pub fn cost_entries(config: Option<&Path>) -> Result<Vec<CostEntry>> {
    let table = load_config(config)?.cost_table();
    Ok(table
        .entries()
        .into_iter()
        .map(|(mnemonic, cycles)| CostEntry { mnemonic: mnemonic.to_string(), cycles })
        .collect())
}

/// Print the effective cost table.
pub fn costs_command(config: Option<&Path>, json: bool) -> Result<()> {
    let entries = cost_entries(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Instruction costs ({}):", entries.len());
    for entry in entries {
        println!("  {:<8} {}", entry.mnemonic, entry.cycles);
    }
    Ok(())
}
