pub mod compensations;
pub mod employees;
