pub mod print_listener;

pub use print_listener::PrintListener;
