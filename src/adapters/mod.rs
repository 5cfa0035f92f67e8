// Adapters layer: concrete stores behind the domain ports.

pub mod flat_file;
