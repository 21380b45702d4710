pub trait ResultPresenter {
    /// Called once per accepted capture. An empty string means nothing was
    /// recognized and the presenter decides how to say so.
    fn deliver_result(&self, text: &str);
}
