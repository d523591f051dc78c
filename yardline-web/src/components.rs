pub mod header;
pub mod notices;
pub mod plan_table;
pub mod status_table;
pub mod train_chip;
pub mod yard_view;

pub use header::Header;
pub use notices::Notices;
pub use plan_table::PlanTable;
pub use status_table::StatusTable;
pub use train_chip::TrainChip;
pub use yard_view::YardView;
