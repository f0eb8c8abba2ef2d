use anyhow::{Context, Result};
use std::path::PathBuf;

use smash_stream::accessor::NullAccessor;
use smash_stream::reader::BinaryReader;

#[cfg(feature = "colorized_output")]
fn heading(text: &str) -> String {
    console::style(text).bold().cyan().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn heading(text: &str) -> String {
    text.to_string()
}

/// Display header, layout and block counts of a particle stream
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let no_quantities: [&str; 0] = [];
    let mut reader = BinaryReader::new(&file, &no_quantities, NullAccessor)?;
    let stats = reader
        .read()
        .with_context(|| format!("Failed to read particle stream {}", file.display()))?;
    let header = reader
        .header()
        .context("Stream header missing after a successful read")?;

    println!("{}", heading("Particle Stream Information"));
    println!("===========================");
    println!("File: {}", file.display());
    println!();

    println!("{}", heading("Header:"));
    println!("  Format version: {}", header.format_version);
    println!("  Variant:        {}", header.variant);
    println!("  Generator:      {}", header.generator);
    println!("  Record stride:  {} bytes", header.layout.stride());
    if !header.unknown_tags.is_empty() {
        println!("  Unknown tags:   {:?}", header.unknown_tags);
    }
    println!();

    println!("{}", heading("Layout:"));
    for (i, entry) in header.layout.entries().iter().enumerate() {
        println!(
            "  {:3}. {:<18} {:<6} @ {}",
            i + 1,
            entry.name(),
            entry.ty.to_string(),
            entry.offset
        );
    }
    println!();

    println!("{}", heading("Blocks:"));
    println!("  Particle blocks:    {}", stats.particle_blocks);
    println!("  End-of-event:       {}", stats.end_blocks);
    println!("  Interaction blocks: {}", stats.interaction_blocks);
    println!("  Particles:          {}", stats.particles);
    println!("  Bytes read:         {}", stats.bytes_read);

    Ok(())
}
