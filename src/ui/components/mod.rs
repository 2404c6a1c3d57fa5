pub mod diff_view;
pub mod input_box;
pub mod session_header;
