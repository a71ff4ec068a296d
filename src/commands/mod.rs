pub mod badge;
pub mod check;
pub mod common;
pub mod history;
pub mod invalidate;
pub mod note;
pub mod run;
pub mod status;
pub mod sync;
pub mod verify;
