pub mod form;
pub mod overtime;
