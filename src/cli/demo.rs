use anyhow::{Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use smash_stream::layout::RecordLayout;
use smash_stream::quantity::Quantity;
use smash_stream::writer::{InteractionInfo, Particle, StreamWriter};

/// (pdg id, mass in GeV, charge) of the species the demo run produces
const SPECIES: &[(i32, f64, i32)] = &[
    (211, 0.138, 1),
    (-211, 0.138, -1),
    (111, 0.138, 0),
    (321, 0.494, 1),
    (-321, 0.494, -1),
    (2212, 0.938, 1),
    (2112, 0.938, 0),
];

const DEMO_QUANTITIES: &[Quantity] = &[
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
    Quantity::Ncoll,
];

/// Generate a synthetic particle stream
pub fn run(output: PathBuf, events: u32, ensembles: u32, seed: u64) -> Result<()> {
    info!("smash-stream - Synthetic Particle Stream Demo");
    info!("=============================================");

    let layout = RecordLayout::packed(DEMO_QUANTITIES).context("Failed to build demo layout")?;
    let mut writer = StreamWriter::create(&output, layout)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut rng = StdRng::seed_from_u64(seed);

    info!(
        "Generating {} events x {} ensembles into {}",
        events,
        ensembles,
        output.display()
    );

    for event in 0..events {
        let event_number = i32::try_from(event).context("Event number out of range")?;
        let impact_parameter = 14.0 * rng.gen::<f64>().sqrt();
        for ensemble in 0..ensembles {
            let ensamble_number = i32::try_from(ensemble).context("Ensemble number out of range")?;

            // Peripheral collisions produce fewer particles and sometimes nothing
            let centrality = 1.0 - impact_parameter / 14.0;
            let multiplicity = (centrality * 200.0 * (0.75 + 0.5 * rng.gen::<f64>())) as usize;
            let empty_event = multiplicity == 0;

            let particles: Vec<Particle> = (0..multiplicity)
                .map(|id| generate_particle(&mut rng, id as i32))
                .collect();

            if particles.len() >= 4 {
                writer.write_interaction_block(
                    &particles[..2],
                    &particles[2..4],
                    InteractionInfo {
                        density: rng.gen::<f64>() * 0.16,
                        total_cross_section: 20.0 + 20.0 * rng.gen::<f64>(),
                        partial_cross_section: 10.0 * rng.gen::<f64>(),
                        process_type: 2,
                    },
                )?;
            }
            writer.write_particle_block(event_number, ensamble_number, &particles)?;
            writer.write_end_block(event_number, ensamble_number, impact_parameter, empty_event)?;
        }

        if (event + 1) % 10 == 0 {
            info!("  Written {} events...", event + 1);
        }
    }

    let stats = writer.finish().context("Failed to finalize particle stream")?;

    info!("Generation complete!");
    info!("  Output file: {}", output.display());
    info!("  {}", stats);
    println!(
        "Wrote {} particles in {} blocks to {}",
        stats.particles,
        stats.particle_blocks,
        output.display()
    );
    Ok(())
}

fn generate_particle(rng: &mut StdRng, id: i32) -> Particle {
    let (pdg, mass, charge) = SPECIES[rng.gen_range(0..SPECIES.len())];

    // Exponential transverse momentum with T ~ 0.3 GeV, isotropic azimuth
    let pt = -0.3 * (1.0 - rng.gen::<f64>()).ln();
    let phi = std::f64::consts::TAU * rng.gen::<f64>();
    let pz = 2.0 * (rng.gen::<f64>() - 0.5);
    let (px, py) = (pt * phi.cos(), pt * phi.sin());
    let p0 = (mass * mass + px * px + py * py + pz * pz).sqrt();

    let t = 5.0 + 15.0 * rng.gen::<f64>();
    let (x, y, z) = (t * px / p0, t * py / p0, t * pz / p0);

    Particle::new()
        .with(Quantity::T, t)
        .with(Quantity::X, x)
        .with(Quantity::Y, y)
        .with(Quantity::Z, z)
        .with(Quantity::Mass, mass)
        .with(Quantity::P0, p0)
        .with(Quantity::Px, px)
        .with(Quantity::Py, py)
        .with(Quantity::Pz, pz)
        .with(Quantity::PdgId, pdg)
        .with(Quantity::Id, id)
        .with(Quantity::Charge, charge)
        .with(Quantity::Ncoll, rng.gen_range(0..6i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_particles() {
        let a = generate_particle(&mut StdRng::seed_from_u64(7), 0);
        let b = generate_particle(&mut StdRng::seed_from_u64(7), 0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_demo_particle_is_on_shell() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = generate_particle(&mut rng, 0);
        let get = |q| p.get(q).map(|v| v.as_f64()).unwrap();
        let (m, p0, px, py, pz) = (
            get(Quantity::Mass),
            get(Quantity::P0),
            get(Quantity::Px),
            get(Quantity::Py),
            get(Quantity::Pz),
        );
        assert!((p0 * p0 - px * px - py * py - pz * pz - m * m).abs() < 1e-9);
    }
}
