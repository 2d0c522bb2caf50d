pub mod model;

pub use model::SampleData;
