pub mod native_plants;
pub mod pages;
