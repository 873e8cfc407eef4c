pub mod accessibility;
pub mod presentation;
