pub mod key;
pub mod lookup;
pub mod media;
pub mod watch;
