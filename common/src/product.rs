pub mod base;
pub mod enums;
pub mod input;
pub mod view;
