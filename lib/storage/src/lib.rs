pub mod artifacts;
pub mod catalog_csv;
pub mod images;
pub mod model;
pub mod npy;

pub use artifacts::{ArtifactPaths, Artifacts};
pub use catalog_csv::load_catalog;
pub use images::ImageIndex;
pub use model::ModelArtifact;
