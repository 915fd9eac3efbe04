pub mod art;
pub mod track;
