mod window;

pub use window::SpamWindow;
