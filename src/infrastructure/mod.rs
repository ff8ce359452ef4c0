// Infrastructure implementations for Loopnest Graph.

pub mod logging;
pub mod scanner;

pub use scanner::FeatureScanner;
