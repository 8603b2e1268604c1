pub mod haulbehavior;
pub mod movebehavior;
