//! Backend commands queued from the UI to the directory worker.

pub enum BackendCommand {
    /// The one-shot batch fetch, issued when the app starts. The UI re-issues
    /// it only as a manual retry after a failed fetch.
    FetchUsers,
    FetchAvatar { email: String, url: String },
}
