pub mod categories;
pub mod check;
pub mod transactions;
