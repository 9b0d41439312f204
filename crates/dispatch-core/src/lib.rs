pub mod alert;
pub mod engine;
pub mod error;
pub mod ids;
pub mod model;
pub mod policy;
pub mod registry;
pub mod report;

pub use alert::*;
pub use engine::*;
pub use error::*;
pub use ids::*;
pub use model::*;
pub use policy::*;
pub use registry::*;
pub use report::*;
