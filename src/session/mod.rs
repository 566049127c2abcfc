pub(crate) mod event;
pub(crate) mod scroll_session;
