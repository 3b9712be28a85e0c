// Adapters layer: concrete readers for the external dataset formats.

pub mod dataset;
