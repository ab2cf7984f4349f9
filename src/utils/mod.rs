pub mod external_tools;
pub mod runlog;
