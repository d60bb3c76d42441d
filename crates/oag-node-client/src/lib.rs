pub mod emitters;
pub mod generator;
pub mod type_mapper;

pub use emitters::scaffold::ScaffoldOptions;
pub use generator::NodeClientGenerator;
