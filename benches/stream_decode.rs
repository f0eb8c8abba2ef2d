use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use smash_stream::accessor::{CollectorAccessor, DictCollectorAccessor, NullAccessor};
use smash_stream::layout::RecordLayout;
use smash_stream::quantity::Quantity;
use smash_stream::reader::BinaryReader;
use smash_stream::writer::{Particle, StreamWriter};

const QUANTITIES: &[Quantity] = &[
    Quantity::T,
    Quantity::X,
    Quantity::Y,
    Quantity::Z,
    Quantity::Mass,
    Quantity::P0,
    Quantity::Px,
    Quantity::Py,
    Quantity::Pz,
    Quantity::PdgId,
    Quantity::Id,
    Quantity::Charge,
];

/// Build an in-memory stream with `events` blocks of `particles_per_event` particles
fn build_stream(events: usize, particles_per_event: usize) -> Vec<u8> {
    let layout = RecordLayout::packed(QUANTITIES).unwrap();
    let mut writer = StreamWriter::new(Vec::new(), layout).unwrap();
    for event in 0..events {
        let particles: Vec<Particle> = (0..particles_per_event)
            .map(|i| {
                let mut p = Particle::new();
                for q in QUANTITIES {
                    match q.quantity_type() {
                        smash_stream::quantity::QuantityType::Double => {
                            p.set(*q, (event * 31 + i) as f64 * 0.01)
                        }
                        smash_stream::quantity::QuantityType::Int32 => p.set(*q, i as i32),
                    }
                }
                p
            })
            .collect();
        writer
            .write_particle_block(event as i32, 0, &particles)
            .unwrap();
        writer
            .write_end_block(event as i32, 0, 3.0, false)
            .unwrap();
    }
    writer.into_inner().unwrap()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for events in [10, 100, 500] {
        let particles_per_event = 200;
        let data = build_stream(events, particles_per_event);
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(BenchmarkId::new("null", events), &data, |b, data| {
            b.iter(|| {
                let mut reader = BinaryReader::from_reader(
                    std::io::Cursor::new(data.clone()),
                    &["px"],
                    NullAccessor,
                )
                .unwrap();
                black_box(reader.read().unwrap())
            });
        });

        group.bench_with_input(BenchmarkId::new("columns", events), &data, |b, data| {
            b.iter(|| {
                let mut collector = CollectorAccessor::new();
                BinaryReader::from_reader(
                    std::io::Cursor::new(data.clone()),
                    &["px", "py", "pz", "pdg_id"],
                    &mut collector,
                )
                .unwrap()
                .read()
                .unwrap();
                black_box(collector.total_particles())
            });
        });

        group.bench_with_input(BenchmarkId::new("dicts", events), &data, |b, data| {
            b.iter(|| {
                let mut collector = DictCollectorAccessor::new();
                BinaryReader::from_reader(
                    std::io::Cursor::new(data.clone()),
                    &["px", "py", "pz", "pdg_id"],
                    &mut collector,
                )
                .unwrap()
                .read()
                .unwrap();
                black_box(collector.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
