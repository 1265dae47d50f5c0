pub mod jack;

pub use self::jack::JackSink;
