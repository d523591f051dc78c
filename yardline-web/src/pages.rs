pub mod plan;
pub mod yard;

pub use plan::PlanPage;
pub use yard::YardPage;
