pub mod cut_paste;
pub mod prismation;
pub mod resize;
pub mod truncate;
