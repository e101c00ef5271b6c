pub mod aggregator;
pub mod classifier;
pub mod error;
pub mod gazetteer;
pub mod model;
pub mod normalizer;
pub mod outputs;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod validity;
