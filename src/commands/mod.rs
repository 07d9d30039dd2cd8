pub mod inspect;
pub mod track;
