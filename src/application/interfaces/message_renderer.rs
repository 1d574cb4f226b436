/// Presentation side of the chat: receives finished text and shows it.
///
/// The generation core never calls this directly; use cases hand results over
/// once a request has settled.
pub trait MessageRenderer: Send + Sync {
    fn render_user(&self, text: &str);

    fn render(&self, text: &str);

    fn render_error(&self, message: &str);
}
