pub mod agenda;
pub mod goal;
pub mod rule;
pub mod schedule;
pub mod task;
pub mod template;
