pub mod analyzers;
pub mod config;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod response;
