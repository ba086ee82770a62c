pub mod attribution;
pub mod instance;
pub mod sample;

pub use attribution::{CategoryAttribution, FunctionAttribution};
pub use instance::{Corpus, InstanceStats};
pub use sample::SampleEntry;
