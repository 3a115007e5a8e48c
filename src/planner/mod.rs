//! Budget planning primitives: categories and the proportional allocator.

pub mod allocator;
pub mod category;

pub use allocator::{AllocatorAction, BudgetAllocator, FULL_SHARE, SUM_TOLERANCE};
pub use category::{BudgetCategory, BudgetLine, CategoryTemplate};
