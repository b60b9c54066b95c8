/// Capability to change the window title of whatever surface hosts the app.
pub trait WindowTitle: Send + Sync {
    fn set_window_title(&self, title: &str);
}
