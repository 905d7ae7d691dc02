//! # Route Modules
//!
//! One module per API surface: check lifecycle, menu deposits, dish
//! catalog review, and rules CRUD.

pub mod catalog;
pub mod checks;
pub mod menus;
pub mod rules;
