pub mod document;
pub mod template;
