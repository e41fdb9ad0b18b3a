pub mod dispatch;
pub mod hyperparams;
pub mod list;
pub mod show;

pub use dispatch::dispatch;
