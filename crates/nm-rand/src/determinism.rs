use nm_core::derive_substream_seed;

/// Seed for the engine of a given replica chain.
pub fn replica_seed(master_seed: u64, replica_index: usize) -> u64 {
    derive_substream_seed(master_seed, replica_index as u64)
}

/// Seed mixed with a textual label, so differently labelled runs sharing a
/// master seed draw unrelated streams.
pub fn labelled_seed(master_seed: u64, label: &str) -> u64 {
    label
        .bytes()
        .fold(master_seed, |seed, byte| derive_substream_seed(seed, u64::from(byte)))
}

/// Seed for auxiliary sampling (slot subsampling, fixtures) tied to a run.
pub fn sampling_seed(master_seed: u64, run_index: usize) -> u64 {
    derive_substream_seed(master_seed ^ 0x5A5A_5A5A_5A5A_5A5A, run_index as u64)
}
