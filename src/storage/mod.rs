pub mod settings_io;
