pub use self::{catalog::ModelCatalog, trained_model::TrainedModel};

mod catalog;
mod trained_model;
