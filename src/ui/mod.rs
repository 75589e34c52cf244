mod app;
mod draw;
mod form;
mod runtime;
mod state;
mod view;

pub use app::App;
