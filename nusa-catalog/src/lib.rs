pub mod capacity;
pub mod inventory;
pub mod pricing;
pub mod product;

pub use capacity::{PartyCategory, PartySize};
pub use inventory::MemoryCatalog;
pub use pricing::PricingCalculator;
pub use product::{ProductCatalog, ProductRef, ProductSnapshot, ProductType};
