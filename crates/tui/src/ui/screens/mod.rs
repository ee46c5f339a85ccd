pub mod alarms;
pub mod settings;
