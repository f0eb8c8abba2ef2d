use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use smash_stream::accessor::{CollectorAccessor, DictCollectorAccessor};
use smash_stream::reader::{BinaryReader, ReadStats};

#[derive(Serialize)]
struct ColumnDump {
    stats: ReadStats,
    event_sizes: Vec<usize>,
    columns: Map<String, Value>,
}

/// Decode the requested quantities and dump them as JSON
pub fn run(
    file: PathBuf,
    quantities: Vec<String>,
    dict: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let document = if dict {
        let mut collector = DictCollectorAccessor::new();
        let stats = BinaryReader::new(&file, &quantities, &mut collector)?
            .read()
            .with_context(|| format!("Failed to read {}", file.display()))?;
        info!("Collected {} particles", stats.particles);
        serde_json::to_value(collector.get_particle_dicts())?
    } else {
        let mut collector = CollectorAccessor::new();
        let stats = BinaryReader::new(&file, &quantities, &mut collector)?
            .read()
            .with_context(|| format!("Failed to read {}", file.display()))?;
        info!(
            "Collected {} particles in {} blocks",
            collector.total_particles(),
            collector.num_blocks()
        );

        let mut columns = Map::new();
        for column in collector.columns() {
            let values = match (column.as_doubles(), column.as_ints()) {
                (Some(doubles), _) => serde_json::to_value(doubles)?,
                (None, Some(ints)) => serde_json::to_value(ints)?,
                (None, None) => Value::Null,
            };
            columns.insert(column.name().to_string(), values);
        }
        serde_json::to_value(ColumnDump {
            stats,
            event_sizes: collector.get_event_sizes().to_vec(),
            columns,
        })?
    };

    let sink: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = BufWriter::new(sink);
    serde_json::to_writer_pretty(&mut sink, &document)?;
    writeln!(sink)?;
    sink.flush()?;

    if let Some(path) = output {
        info!("Wrote {}", path.display());
    }
    Ok(())
}
