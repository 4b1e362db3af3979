//! Core data types for the preparation pipelines.

mod bar;
mod dataset;
mod fractal;
mod group;
mod model;

pub use bar::{Bar, BarTable, SessionMark};
pub use dataset::{Dataset, Partition};
pub use fractal::{FeedKind, Fractal};
pub use group::Group;
pub use model::{FeatureSelection, ModelSpec, ModelType, WILDCARD};
