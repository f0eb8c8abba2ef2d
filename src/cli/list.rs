use anyhow::Result;

use smash_stream::analysis::AnalysisRegistry;
use smash_stream::quantity;

/// Print registered analyses and the quantity catalog
pub fn run() -> Result<()> {
    let registry = AnalysisRegistry::global();

    println!("Analyses:");
    for name in registry.names() {
        let needs = registry
            .create(name)
            .map(|a| a.required_quantities().join(", "))
            .unwrap_or_default();
        if needs.is_empty() {
            println!("  {}", name);
        } else {
            println!("  {:<20} (default quantities: {})", name, needs);
        }
    }
    println!();

    println!("Quantities:");
    for (name, info) in quantity::catalog() {
        println!("  {:3}. {:<18} {}", info.quantity.tag(), name, info.ty);
    }
    Ok(())
}
