pub mod migration;

pub use migration::{Migratable, MigrateValue};
