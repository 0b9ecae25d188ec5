pub mod accordion;
pub mod accordion_item;
pub mod dropdown;
