pub mod clipboard;
pub mod logging;
pub mod session_id;
pub mod side_channel;
