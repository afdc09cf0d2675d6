pub mod activity;
pub mod gear;
