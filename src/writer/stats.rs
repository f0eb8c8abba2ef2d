use std::fmt;

/// Statistics from a completed write operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Particle blocks written
    pub particle_blocks: u64,
    /// End-of-event blocks written
    pub end_blocks: u64,
    /// Interaction blocks written
    pub interaction_blocks: u64,
    /// Particles written across particle blocks
    pub particles: u64,
    /// Total bytes written, header included
    pub bytes_written: u64,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} events ({} particles in {} blocks), {} bytes",
            self.end_blocks, self.particles, self.particle_blocks, self.bytes_written
        )
    }
}
