pub mod py_interface;

pub use py_interface::PyExecutionConfig;
